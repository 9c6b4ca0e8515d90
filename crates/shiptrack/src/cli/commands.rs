//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::alerts::DASHBOARD_ALERT_LIMIT;
use crate::query::ALL_STATUSES;

/// Shipments command arguments.
#[derive(Debug, Args)]
pub struct ShipmentsCommand {
    /// Status filter ("All", "In-Transit", "Delayed", "Delivered")
    #[arg(short, long, default_value = ALL_STATUSES)]
    pub status: String,

    /// Search text matched against id, origin and destination
    #[arg(long, default_value = "")]
    pub search: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Summary command arguments.
#[derive(Debug, Args)]
pub struct SummaryCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Alerts command arguments.
#[derive(Debug, Args)]
pub struct AlertsCommand {
    /// Number of most recent alerts to show
    #[arg(short, long, default_value_t = DASHBOARD_ALERT_LIMIT)]
    pub limit: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Partners command arguments.
#[derive(Debug, Args)]
pub struct PartnersCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Route command arguments.
#[derive(Debug, Args)]
pub struct RouteCommand {
    /// Shipment to route
    #[arg(value_name = "SHIPMENT_ID")]
    pub shipment_id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Preference commands.
#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show stored preferences
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Change the dark-mode preference
    DarkMode {
        /// New value
        #[arg(value_enum)]
        mode: Switch,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// On/off argument for boolean preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    /// Enable
    On,
    /// Disable
    Off,
    /// Flip the current value
    Toggle,
}

impl Switch {
    /// Resolve against the current value.
    #[must_use]
    pub fn apply(self, current: bool) -> bool {
        match self {
            Self::On => true,
            Self::Off => false,
            Self::Toggle => !current,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_switch_apply() {
        assert!(Switch::On.apply(false));
        assert!(Switch::On.apply(true));
        assert!(!Switch::Off.apply(true));
        assert!(Switch::Toggle.apply(false));
        assert!(!Switch::Toggle.apply(true));
    }

    #[test]
    fn test_switch_value_names() {
        let names: Vec<String> = Switch::value_variants()
            .iter()
            .filter_map(|v| v.to_possible_value())
            .map(|v| v.get_name().to_string())
            .collect();
        assert_eq!(names, ["on", "off", "toggle"]);
    }

    #[test]
    fn test_shipments_command_debug() {
        let cmd = ShipmentsCommand {
            status: "Delayed".to_string(),
            search: "mum".to_string(),
            format: OutputFormat::Json,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Delayed"));
        assert!(debug_str.contains("mum"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        assert!(format!("{cmd:?}").contains("Show"));
    }
}
