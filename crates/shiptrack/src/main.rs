//! `shiptrack` - CLI for the shipment query engine
//!
//! This binary loads shipment data, applies the dashboard filters and prints
//! the results, along with alerts, partner connections, routes and stored
//! preferences.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fmt::Write as _;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{debug, warn};

use shiptrack::alerts::{shipment_for, Alert, AlertFeed};
use shiptrack::cli::{
    AlertsCommand, Cli, Command, ConfigCommand, OutputFormat, PartnersCommand, RouteCommand,
    SettingsCommand, ShipmentsCommand, SummaryCommand,
};
use shiptrack::partners::PartnerRegistry;
use shiptrack::predict::annotate;
use shiptrack::query::FilterCriteria;
use shiptrack::routing::route_for;
use shiptrack::settings::SettingsStore;
use shiptrack::storage::SqliteStore;
use shiptrack::summary::ShipmentSummary;
use shiptrack::{init_logging, Config, ShipmentLoader, ShipmentRecord};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Validation reports its own errors, so it must not depend on a good config
    if let Command::Config(ConfigCommand::Validate { file }) = &cli.command {
        return handle_validate(file.clone().or_else(|| cli.config.clone()));
    }

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Shipments(cmd) => handle_shipments(&config, &cmd),
        Command::Summary(cmd) => handle_summary(&config, &cmd),
        Command::Alerts(cmd) => handle_alerts(&config, &cmd),
        Command::Partners(cmd) => handle_partners(&cmd),
        Command::Route(cmd) => handle_route(&config, &cmd).await,
        Command::Settings(cmd) => handle_settings(&config, cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

/// Load shipments from the configured file and run delay prediction.
fn load_shipments(config: &Config) -> Result<Vec<ShipmentRecord>> {
    let path = config.shipments_path();
    let mut records = ShipmentLoader::new(config.load_mode())
        .load_file(&path)
        .with_context(|| format!("failed to load shipments from {}", path.display()))?;

    if config.prediction.enabled {
        annotate(&mut records, &mut config.delay_predictor());
    }
    Ok(records)
}

fn load_alerts(config: &Config) -> Result<AlertFeed> {
    match &config.data.alerts_path {
        Some(path) => AlertFeed::load_file(path)
            .with_context(|| format!("failed to load alerts from {}", path.display())),
        None => {
            debug!("No alerts file configured, using sample feed");
            Ok(AlertFeed::sample())
        }
    }
}

fn handle_shipments(config: &Config, cmd: &ShipmentsCommand) -> Result<()> {
    let records = load_shipments(config)?;
    let criteria = FilterCriteria::new(&cmd.status, cmd.search.as_str());
    if !criteria.status_filter.is_recognized() {
        warn!(status = %cmd.status, "Unrecognized status filter matches no shipments");
    }
    let matched = criteria.compile().apply(&records);

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&matched)?),
        OutputFormat::Plain => {
            for record in &matched {
                println!(
                    "{}  {} -> {}  {}{}",
                    record.id,
                    record.origin_or_empty(),
                    record.destination_or_empty(),
                    record.status_or_empty(),
                    delay_marker(record)
                );
            }
        }
        OutputFormat::Table => print!("{}", shipment_table(&matched)),
    }
    Ok(())
}

fn delay_marker(record: &ShipmentRecord) -> &'static str {
    if record.is_predicted_delay() {
        "  (delay risk)"
    } else {
        ""
    }
}

fn shipment_table(records: &[&ShipmentRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:<16} {:<16} {:<12} {}",
        "ID", "ORIGIN", "DESTINATION", "STATUS", "RISK"
    );
    for record in records {
        let _ = writeln!(
            out,
            "{:<12} {:<16} {:<16} {:<12} {}",
            record.id,
            record.origin_or_empty(),
            record.destination_or_empty(),
            record.status_or_empty(),
            if record.is_predicted_delay() { "yes" } else { "-" }
        );
    }
    let _ = writeln!(out, "{} shipment(s)", records.len());
    out
}

fn handle_summary(config: &Config, cmd: &SummaryCommand) -> Result<()> {
    let records = load_shipments(config)?;
    let summary = ShipmentSummary::from_records(&records);

    if cmd.json {
        let value = serde_json::json!({
            "summary": summary,
            "utilizationRate": summary.utilization_rate(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("Shipment summary");
        println!("----------------");
        println!("Total:            {}", summary.total);
        println!("In transit:       {}", summary.in_transit);
        println!("Delayed:          {}", summary.delayed);
        println!("Delivered:        {}", summary.delivered);
        if summary.unrecognized > 0 {
            println!("Unrecognized:     {}", summary.unrecognized);
        }
        println!("Predicted delays: {}", summary.predicted_delays);
        println!("Utilization:      {}%", summary.utilization_rate());
    }
    Ok(())
}

fn handle_alerts(config: &Config, cmd: &AlertsCommand) -> Result<()> {
    let feed = load_alerts(config)?;
    let recent = feed.recent(cmd.limit);

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(recent)?),
        OutputFormat::Plain | OutputFormat::Table => {
            // Route labels are best-effort; alerts still print without shipment data
            let records = load_shipments(config).unwrap_or_else(|e| {
                debug!(error = %e, "Shipments unavailable for alert context");
                Vec::new()
            });
            for alert in recent {
                println!("{}", alert_line(alert, &records));
            }
        }
    }
    Ok(())
}

fn alert_line(alert: &Alert, records: &[ShipmentRecord]) -> String {
    let mut line = format!(
        "[{}] {:<8} {}: {}",
        alert.timestamp.format(shiptrack::alerts::TIMESTAMP_FORMAT),
        alert.category().to_string(),
        alert.shipment_id,
        alert.message
    );
    if let Some(record) = shipment_for(alert, records) {
        let _ = write!(
            line,
            " ({} -> {})",
            record.origin_or_empty(),
            record.destination_or_empty()
        );
    }
    line
}

fn handle_partners(cmd: &PartnersCommand) -> Result<()> {
    let registry = PartnerRegistry::with_defaults(Utc::now());

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(registry.partners())?);
    } else {
        for partner in registry.partners() {
            let synced = partner
                .last_synced
                .map_or_else(|| "never".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());
            println!(
                "{:<10} {:<13} last sync: {:<17} {}",
                partner.name,
                partner.status.to_string(),
                synced,
                partner.description
            );
        }
        println!(
            "{} of {} partners connected",
            registry.connected_count(),
            registry.partners().len()
        );
    }
    Ok(())
}

async fn handle_route(config: &Config, cmd: &RouteCommand) -> Result<()> {
    let records = load_shipments(config)?;
    let record = records
        .iter()
        .find(|r| r.id.eq_ignore_ascii_case(&cmd.shipment_id))
        .with_context(|| format!("no shipment with id {}", cmd.shipment_id))?;

    let provider = config.route_provider();
    let route = route_for(&provider, record)
        .await
        .with_context(|| format!("failed to compute route for {}", record.id))?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&route)?);
    } else {
        println!("{}: {} -> {}", record.id, route.origin.label, route.destination.label);
        println!("Distance:  {:.1} km", route.distance_km);
        let minutes = route.duration_minutes();
        println!("Estimated: {}h {:02}m", minutes / 60, minutes % 60);
    }
    Ok(())
}

fn handle_settings(config: &Config, cmd: SettingsCommand) -> Result<()> {
    let path = config.settings_database_path();
    let store = SqliteStore::open(&path)
        .with_context(|| format!("failed to open settings database {}", path.display()))?;
    let mut settings = SettingsStore::load(store)?;

    match cmd {
        SettingsCommand::Show { json } => {
            let prefs = settings.preferences();
            if json {
                println!("{}", serde_json::to_string_pretty(&prefs)?);
            } else {
                println!("Dark mode: {}", on_off(prefs.dark_mode));
                println!("Database:  {}", settings.store().path().display());
            }
        }
        SettingsCommand::DarkMode { mode } => {
            let enabled = mode.apply(settings.dark_mode());
            settings.set_dark_mode(enabled)?;
            println!("Dark mode: {}", on_off(enabled));
        }
    }
    Ok(())
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Data]");
                println!("  Shipments path:     {}", config.shipments_path().display());
                println!(
                    "  Alerts path:        {}",
                    config
                        .data
                        .alerts_path
                        .as_ref()
                        .map_or_else(|| "(sample feed)".to_string(), |p| p.display().to_string())
                );
                println!("  Lenient loading:    {}", config.data.lenient);
                println!();
                println!("[Prediction]");
                println!("  Enabled:            {}", config.prediction.enabled);
                println!("  Delay probability:  {}", config.prediction.delay_probability);
                if let Some(seed) = config.prediction.seed {
                    println!("  Seed:               {seed}");
                }
                println!();
                println!("[Settings]");
                println!(
                    "  Database path:      {}",
                    config.settings_database_path().display()
                );
                println!();
                println!("[Routing]");
                println!("  Average speed:      {} km/h", config.routing.average_speed_kmh);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => return handle_validate(file),
    }
    Ok(())
}

fn handle_validate(file: Option<std::path::PathBuf>) -> Result<()> {
    let path = file.unwrap_or_else(Config::default_config_path);
    println!("Validating configuration: {}", path.display());
    match Config::load_from(Some(path.clone())) {
        Ok(_) => {
            println!("Configuration is valid.");
            Ok(())
        }
        Err(e) => bail!("configuration {} is invalid: {e}", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_validate_accepts_good_config() {
        let file = config_file("[routing]\naverage_speed_kmh = 60.0\n");
        assert!(handle_validate(Some(file.path().to_path_buf())).is_ok());
    }

    #[test]
    fn test_validate_fails_on_invalid_values() {
        let file = config_file("[prediction]\ndelay_probability = 3.0\n");
        let err = handle_validate(Some(file.path().to_path_buf())).unwrap_err();
        assert!(err.to_string().contains("delay_probability"));
    }

    #[test]
    fn test_validate_fails_on_malformed_file() {
        let file = config_file("[routing\n");
        assert!(handle_validate(Some(file.path().to_path_buf())).is_err());
    }
}
