//! Configuration management for shiptrack.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::loader::LoadMode;
use crate::predict::{RandomDelayPredictor, DEFAULT_DELAY_PROBABILITY};
use crate::routing::{GazetteerRouteProvider, DEFAULT_AVERAGE_SPEED_KMH, MIN_AVERAGE_SPEED_KMH};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "shiptrack";

/// Default settings database file name.
const DATABASE_FILE_NAME: &str = "settings.db";

/// Default shipment data file name.
const SHIPMENTS_FILE_NAME: &str = "shipments.json";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `SHIPTRACK_`)
/// 2. TOML config file at `~/.config/shiptrack/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Data source configuration.
    pub data: DataConfig,
    /// Delay prediction configuration.
    pub prediction: PredictionConfig,
    /// Preference storage configuration.
    pub settings: SettingsConfig,
    /// Route estimation configuration.
    pub routing: RoutingConfig,
}

/// Where shipment and alert data come from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the shipments JSON file.
    /// Defaults to `~/.local/share/shiptrack/shipments.json`
    pub shipments_path: Option<PathBuf>,
    /// Path to the alerts JSON file. The built-in sample feed is used when unset.
    pub alerts_path: Option<PathBuf>,
    /// Skip invalid records instead of failing the whole load.
    pub lenient: bool,
}

/// Delay prediction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Annotate shipments with a predicted delay flag.
    pub enabled: bool,
    /// Probability that a shipment is flagged.
    pub delay_probability: f64,
    /// Fixed seed for reproducible predictions.
    pub seed: Option<u64>,
}

/// Preference storage settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// Path to the settings database.
    /// Defaults to `~/.local/share/shiptrack/settings.db`
    pub database_path: Option<PathBuf>,
}

/// Route estimation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Average road speed in km/h.
    pub average_speed_kmh: f64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_probability: DEFAULT_DELAY_PROBABILITY,
            seed: None,
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            average_speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `SHIPTRACK_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing, or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let config: Config = Self::figment(&config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the layered provider for a config file.
    fn figment(config_file: &std::path::Path) -> Figment {
        // Sections are single words, so `__` separates them from field names
        // that contain underscores (SHIPTRACK_PREDICTION__DELAY_PROBABILITY).
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed("SHIPTRACK_").split("__"))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let p = self.prediction.delay_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(Error::config_validation(format!(
                "delay_probability ({p}) must be between 0 and 1"
            )));
        }

        let speed = self.routing.average_speed_kmh;
        if !speed.is_finite() || speed < MIN_AVERAGE_SPEED_KMH {
            return Err(Error::config_validation(format!(
                "average_speed_kmh ({speed}) must be a finite value of at least \
                 {MIN_AVERAGE_SPEED_KMH}"
            )));
        }

        if self
            .data
            .shipments_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(Error::config_validation("shipments_path cannot be empty"));
        }

        Ok(())
    }

    /// Get the shipments file path, resolving defaults if not set.
    #[must_use]
    pub fn shipments_path(&self) -> PathBuf {
        self.data
            .shipments_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(SHIPMENTS_FILE_NAME))
    }

    /// Get the settings database path, resolving defaults if not set.
    #[must_use]
    pub fn settings_database_path(&self) -> PathBuf {
        self.settings
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// How strictly shipment files are validated.
    #[must_use]
    pub fn load_mode(&self) -> LoadMode {
        if self.data.lenient {
            LoadMode::Lenient
        } else {
            LoadMode::Strict
        }
    }

    /// Build the delay predictor, seeded when a seed is configured.
    #[must_use]
    pub fn delay_predictor(&self) -> RandomDelayPredictor {
        let p = self.prediction.delay_probability;
        match self.prediction.seed {
            Some(seed) => RandomDelayPredictor::seeded(p, seed),
            None => RandomDelayPredictor::new(p),
        }
    }

    /// Build the route provider.
    #[must_use]
    pub fn route_provider(&self) -> GazetteerRouteProvider {
        GazetteerRouteProvider::with_builtin_places(self.routing.average_speed_kmh)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.prediction.enabled);
        assert!(config.prediction.seed.is_none());
        assert!(!config.data.lenient);
        assert!(config.data.alerts_path.is_none());
    }

    #[test]
    fn test_default_prediction_config() {
        let prediction = PredictionConfig::default();
        assert!((prediction.delay_probability - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_routing_config() {
        let routing = RoutingConfig::default();
        assert!((routing.average_speed_kmh - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_probability_bounds() {
        for p in [0.0, 1.0] {
            let mut config = Config::default();
            config.prediction.delay_probability = p;
            assert!(config.validate().is_ok(), "{p} should be accepted");
        }

        for p in [-0.1, 1.5, f64::NAN] {
            let mut config = Config::default();
            config.prediction.delay_probability = p;
            let err = config.validate().unwrap_err().to_string();
            assert!(err.contains("delay_probability"), "{p}: {err}");
        }
    }

    #[test]
    fn test_validate_speed() {
        for speed in [0.0, -10.0, 1e-20, 0.5, f64::INFINITY, f64::NAN] {
            let mut config = Config::default();
            config.routing.average_speed_kmh = speed;
            let err = config.validate().unwrap_err().to_string();
            assert!(err.contains("average_speed_kmh"), "{speed}: {err}");
        }
    }

    #[test]
    fn test_validate_minimum_speed_accepted() {
        let mut config = Config::default();
        config.routing.average_speed_kmh = MIN_AVERAGE_SPEED_KMH;
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_validated_speed_routes_without_panic() {
        use crate::routing::RouteProvider;

        let mut config = Config::default();
        config.routing.average_speed_kmh = MIN_AVERAGE_SPEED_KMH;
        config.validate().unwrap();

        let route = config
            .route_provider()
            .compute_route("Mumbai", "Delhi")
            .await
            .unwrap();
        assert!(route.estimated_duration.as_secs() > 0);
    }

    #[test]
    fn test_validate_empty_shipments_path() {
        let mut config = Config::default();
        config.data.shipments_path = Some(PathBuf::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_settings_database_path_default() {
        let path = Config::default().settings_database_path();
        assert!(path.to_string_lossy().contains("shiptrack"));
        assert!(path.to_string_lossy().ends_with("settings.db"));
    }

    #[test]
    fn test_settings_database_path_custom() {
        let mut config = Config::default();
        config.settings.database_path = Some(PathBuf::from("/custom/path/prefs.db"));

        assert_eq!(
            config.settings_database_path(),
            PathBuf::from("/custom/path/prefs.db")
        );
    }

    #[test]
    fn test_shipments_path_default() {
        let path = Config::default().shipments_path();
        assert!(path.to_string_lossy().ends_with("shipments.json"));
    }

    #[test]
    fn test_load_mode() {
        let mut config = Config::default();
        assert_eq!(config.load_mode(), LoadMode::Strict);
        config.data.lenient = true;
        assert_eq!(config.load_mode(), LoadMode::Lenient);
    }

    #[test]
    fn test_seeded_predictor_is_reproducible() {
        let mut config = Config::default();
        config.prediction.seed = Some(7);

        let record = crate::ShipmentRecord::new("SHIP-1", "Mumbai", "Delhi", "In-Transit");
        let run = || {
            let mut predictor = config.delay_predictor();
            (0..20)
                .map(|_| crate::predict::DelayPredictor::predict(&mut predictor, &record))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_route_provider_uses_speed() {
        let mut config = Config::default();
        config.routing.average_speed_kmh = 80.0;
        assert!((config.route_provider().average_speed_kmh() - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("shiptrack"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[data]
shipments_path = "/srv/shipments.json"
lenient = true

[prediction]
delay_probability = 0.5
seed = 42
"#
        )
        .unwrap();

        let config = Config::load_from(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.shipments_path(), PathBuf::from("/srv/shipments.json"));
        assert!(config.data.lenient);
        assert_eq!(config.prediction.seed, Some(42));
        assert!((config.prediction.delay_probability - 0.5).abs() < f64::EPSILON);
        assert!((config.routing.average_speed_kmh - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[prediction]\ndelay_probability = 2.0").unwrap();

        let err = Config::load_from(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[prediction\nenabled = yes").unwrap();

        let err = Config::load_from(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, Error::ConfigLoad(_)));
    }

    #[test]
    fn test_config_serialize_sections() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("delay_probability"));
        assert!(json.contains("average_speed_kmh"));
        assert!(json.contains("shipments_path"));
    }
}
