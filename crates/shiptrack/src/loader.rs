//! Shipment data loading.
//!
//! Shipment data arrives as a JSON array of objects with `id`, `origin`,
//! `destination`, `status` and optional `lat`/`lng`. The loader checks the
//! required fields before handing records to the rest of the crate.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::shipment::ShipmentRecord;

/// How the loader reacts to an invalid record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Fail the whole load on the first invalid record.
    #[default]
    Strict,
    /// Skip invalid records with a warning.
    Lenient,
}

/// Record as it appears in the source, before validation.
#[derive(Debug, Deserialize)]
struct RawShipment {
    id: Option<String>,
    origin: Option<String>,
    destination: Option<String>,
    status: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
}

impl RawShipment {
    fn validate(self, index: usize) -> Result<ShipmentRecord> {
        let id = match self.id {
            Some(id) if !id.trim().is_empty() => id,
            Some(_) => return Err(Error::invalid_record(index, "field `id` is empty")),
            None => return Err(Error::invalid_record(index, "missing field `id`")),
        };

        for (name, value) in [
            ("origin", &self.origin),
            ("destination", &self.destination),
            ("status", &self.status),
        ] {
            if value.is_none() {
                return Err(Error::invalid_record(
                    index,
                    format!("shipment {id}: missing field `{name}`"),
                ));
            }
        }

        let record = ShipmentRecord {
            id,
            origin: self.origin,
            destination: self.destination,
            status: self.status,
            lat: self.lat,
            lng: self.lng,
            predicted_delay: None,
        };

        if record.canonical_status().is_none() {
            debug!(
                id = %record.id,
                status = %record.status_or_empty(),
                "Unrecognized shipment status"
            );
        }

        Ok(record)
    }
}

/// Loads and validates shipment collections.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShipmentLoader {
    mode: LoadMode,
}

impl ShipmentLoader {
    /// Create a loader with the given mode.
    #[must_use]
    pub fn new(mode: LoadMode) -> Self {
        Self { mode }
    }

    /// The configured mode.
    #[must_use]
    pub fn mode(&self) -> LoadMode {
        self.mode
    }

    /// Parse shipments from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, or in strict mode if any
    /// record is missing a required field.
    pub fn parse(&self, json: &str) -> Result<Vec<ShipmentRecord>> {
        let raw: Vec<RawShipment> = serde_json::from_str(json)?;
        let total = raw.len();
        let mut records = Vec::with_capacity(total);

        for (index, entry) in raw.into_iter().enumerate() {
            match entry.validate(index) {
                Ok(record) => records.push(record),
                Err(err) if self.mode == LoadMode::Lenient => {
                    warn!(error = %err, "Skipping invalid shipment record");
                }
                Err(err) => return Err(err),
            }
        }

        debug!(total, kept = records.len(), "Parsed shipment records");
        Ok(records)
    }

    /// Read and parse shipments from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its content is invalid.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Vec<ShipmentRecord>> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::DataRead {
            path: path.to_path_buf(),
            source,
        })?;

        let records = self.parse(&json)?;
        info!(
            "Loaded {} shipments from {}",
            records.len(),
            path.display()
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::shipment::ShipmentStatus;

    const SAMPLE: &str = r#"[
        {"id": "SHIP-1023", "origin": "Mumbai", "destination": "Delhi",
         "status": "Delayed", "lat": 19.076, "lng": 72.8777},
        {"id": "SHIP-1017", "origin": "Bengaluru", "destination": "Chennai",
         "status": "In Transit", "lat": 12.9716, "lng": 77.5946},
        {"id": "SHIP-1009", "origin": "Chennai", "destination": "Pune",
         "status": "Delivered"}
    ]"#;

    #[test]
    fn test_parse_valid() {
        let records = ShipmentLoader::default().parse(SAMPLE).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, "SHIP-1023");
        assert_eq!(records[0].position(), Some((19.076, 72.8777)));
        assert_eq!(records[1].canonical_status(), Some(ShipmentStatus::InTransit));
        assert!(records[2].position().is_none());
        assert!(records.iter().all(|r| r.predicted_delay.is_none()));
    }

    #[test]
    fn test_parse_preserves_order_and_id_case() {
        let json = r#"[
            {"id": "ship-b", "origin": "a", "destination": "b", "status": "Delayed"},
            {"id": "SHIP-A", "origin": "a", "destination": "b", "status": "Delayed"}
        ]"#;
        let records = ShipmentLoader::default().parse(json).unwrap();
        assert_eq!(records[0].id, "ship-b");
        assert_eq!(records[1].id, "SHIP-A");
    }

    #[test]
    fn test_parse_empty_array() {
        let records = ShipmentLoader::default().parse("[]").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_malformed_json() {
        let result = ShipmentLoader::default().parse("{not json");
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_strict_rejects_missing_origin() {
        let json = r#"[
            {"id": "SHIP-1", "origin": "A", "destination": "B", "status": "Delayed"},
            {"id": "SHIP-2", "destination": "B", "status": "Delayed"}
        ]"#;
        let err = ShipmentLoader::new(LoadMode::Strict).parse(json).unwrap_err();
        match err {
            Error::InvalidRecord { index, message } => {
                assert_eq!(index, 1);
                assert!(message.contains("origin"));
                assert!(message.contains("SHIP-2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_strict_rejects_null_status() {
        let json = r#"[{"id": "SHIP-1", "origin": "A", "destination": "B", "status": null}]"#;
        let err = ShipmentLoader::default().parse(json).unwrap_err();
        assert!(err.is_invalid_record());
        assert!(err.to_string().contains("status"));
    }

    #[test]
    fn test_strict_rejects_empty_id() {
        let json = r#"[{"id": "  ", "origin": "A", "destination": "B", "status": "Delayed"}]"#;
        let err = ShipmentLoader::default().parse(json).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_lenient_skips_invalid() {
        crate::logging::init_test_logging();
        let json = r#"[
            {"origin": "A", "destination": "B", "status": "Delayed"},
            {"id": "SHIP-2", "origin": "A", "destination": "B", "status": "Delayed"},
            {"id": "SHIP-3", "origin": "A", "status": "Delayed"}
        ]"#;
        let records = ShipmentLoader::new(LoadMode::Lenient).parse(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "SHIP-2");
    }

    #[test]
    fn test_unrecognized_status_is_kept() {
        let json = r#"[{"id": "SHIP-1", "origin": "A", "destination": "B", "status": "Lost"}]"#;
        let records = ShipmentLoader::default().parse(json).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].canonical_status().is_none());
    }

    #[test]
    fn test_extra_fields_ignored() {
        let json = r#"[{"id": "SHIP-1", "origin": "A", "destination": "B",
                        "status": "Delivered", "carrier": "DHL", "weightKg": 12}]"#;
        let records = ShipmentLoader::default().parse(json).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let records = ShipmentLoader::default().load_file(file.path()).unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ShipmentLoader::default().load_file("/nonexistent/shipments.json");
        match result {
            Err(Error::DataRead { path, .. }) => {
                assert!(path.to_string_lossy().contains("shipments.json"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_loader_mode() {
        assert_eq!(ShipmentLoader::default().mode(), LoadMode::Strict);
        assert_eq!(
            ShipmentLoader::new(LoadMode::Lenient).mode(),
            LoadMode::Lenient
        );
    }
}
