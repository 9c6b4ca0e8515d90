//! Command-line interface for shiptrack.
//!
//! This module provides the CLI structure for the `shiptrack` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{
    AlertsCommand, ConfigCommand, OutputFormat, PartnersCommand, RouteCommand, SettingsCommand,
    ShipmentsCommand, SummaryCommand, Switch,
};

/// shiptrack - Query shipments for the logistics dashboard
///
/// Lists and filters shipments by status and search text, summarizes the
/// fleet, and shows alerts, partner connections and routes.
#[derive(Debug, Parser)]
#[command(name = "shiptrack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List shipments matching a status filter and search text
    Shipments(ShipmentsCommand),

    /// Show fleet counts and utilization
    Summary(SummaryCommand),

    /// Show recent alerts
    Alerts(AlertsCommand),

    /// Show logistics partner connections
    Partners(PartnersCommand),

    /// Estimate the route for a shipment
    Route(RouteCommand),

    /// View or change stored preferences
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}
