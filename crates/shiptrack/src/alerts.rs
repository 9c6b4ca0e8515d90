//! Shipment alerts feed.
//!
//! Alerts are short notices about individual shipments (delays, reroutes,
//! predicted delays). The feed keeps them in the order they were supplied.

use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::shipment::ShipmentRecord;

/// Timestamp layout used by alert sources.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Number of alerts shown on the dashboard.
pub const DASHBOARD_ALERT_LIMIT: usize = 5;

/// Broad category of an alert, used for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    /// Actual or predicted delay.
    Delay,
    /// Shipment was sent along a different route.
    Reroute,
    /// Anything else.
    Notice,
}

impl AlertCategory {
    /// Classify free-text alert kinds such as `"Predicted Delay"` or `"Reroute"`.
    ///
    /// A kind mentioning a delay wins over one mentioning a reroute.
    #[must_use]
    pub fn classify(kind: &str) -> Self {
        let kind = kind.to_lowercase();
        if kind.contains("delay") {
            Self::Delay
        } else if kind.contains("reroute") {
            Self::Reroute
        } else {
            Self::Notice
        }
    }
}

impl std::fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Delay => write!(f, "delay"),
            Self::Reroute => write!(f, "reroute"),
            Self::Notice => write!(f, "notice"),
        }
    }
}

/// A notice about one shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Alert identifier.
    pub id: u32,
    /// Identifier of the shipment concerned.
    pub shipment_id: String,
    /// Free-text kind, e.g. `"Delay"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable message.
    pub message: String,
    /// When the alert was raised.
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
}

fn serialize_timestamp<S>(
    timestamp: &NaiveDateTime,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&timestamp.format(TIMESTAMP_FORMAT))
}

impl Alert {
    /// Category derived from the alert kind.
    #[must_use]
    pub fn category(&self) -> AlertCategory {
        AlertCategory::classify(&self.kind)
    }
}

/// Alert as it appears in the source, before timestamp parsing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAlert {
    id: u32,
    shipment_id: String,
    #[serde(rename = "type")]
    kind: String,
    message: String,
    timestamp: String,
}

impl TryFrom<RawAlert> for Alert {
    type Error = Error;

    fn try_from(raw: RawAlert) -> Result<Self> {
        let timestamp =
            NaiveDateTime::parse_from_str(&raw.timestamp, TIMESTAMP_FORMAT).map_err(|e| {
                Error::InvalidAlert {
                    id: raw.id,
                    message: format!("invalid timestamp '{}': {e}", raw.timestamp),
                }
            })?;

        Ok(Self {
            id: raw.id,
            shipment_id: raw.shipment_id,
            kind: raw.kind,
            message: raw.message,
            timestamp,
        })
    }
}

/// Ordered collection of alerts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertFeed {
    alerts: Vec<Alert>,
}

impl AlertFeed {
    /// Create a feed from alerts in display order.
    #[must_use]
    pub fn new(alerts: Vec<Alert>) -> Self {
        Self { alerts }
    }

    /// Parse a JSON array of alerts.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a timestamp is not in
    /// `YYYY-MM-DD HH:MM` form.
    pub fn parse(json: &str) -> Result<Self> {
        let raw: Vec<RawAlert> = serde_json::from_str(json)?;
        let alerts = raw
            .into_iter()
            .map(Alert::try_from)
            .collect::<Result<Vec<_>>>()?;
        debug!(count = alerts.len(), "Parsed alerts");
        Ok(Self::new(alerts))
    }

    /// Read alerts from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::DataRead {
            path: path.to_path_buf(),
            source,
        })?;
        let feed = Self::parse(&json)?;
        info!("Loaded {} alerts from {}", feed.len(), path.display());
        Ok(feed)
    }

    /// Built-in sample feed used when no alert source is configured.
    #[must_use]
    pub fn sample() -> Self {
        let entries = [
            (
                1,
                "SHIP-1023",
                "Predicted Delay",
                "High chance of delay on route Mumbai → Delhi",
                (2025, 9, 6, 14, 22),
            ),
            (
                2,
                "SHIP-1017",
                "Delay",
                "Shipment delayed near Bengaluru hub",
                (2025, 9, 5, 19, 40),
            ),
            (
                3,
                "SHIP-1009",
                "Reroute",
                "Shipment rerouted via Pune due to congestion",
                (2025, 9, 4, 9, 15),
            ),
        ];

        let alerts = entries
            .into_iter()
            .filter_map(|(id, shipment_id, kind, message, (y, mo, d, h, mi))| {
                let timestamp =
                    chrono::NaiveDate::from_ymd_opt(y, mo, d)?.and_hms_opt(h, mi, 0)?;
                Some(Alert {
                    id,
                    shipment_id: shipment_id.to_string(),
                    kind: kind.to_string(),
                    message: message.to_string(),
                    timestamp,
                })
            })
            .collect();
        Self::new(alerts)
    }

    /// All alerts in display order.
    #[must_use]
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// The first `limit` alerts.
    #[must_use]
    pub fn recent(&self, limit: usize) -> &[Alert] {
        &self.alerts[..limit.min(self.alerts.len())]
    }

    /// Alerts for one shipment, matched case-insensitively.
    pub fn for_shipment<'a>(
        &'a self,
        shipment_id: &'a str,
    ) -> impl Iterator<Item = &'a Alert> + 'a {
        self.alerts
            .iter()
            .filter(move |alert| alert.shipment_id.eq_ignore_ascii_case(shipment_id))
    }

    /// Number of alerts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// Whether the feed is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

/// Find the shipment an alert refers to.
#[must_use]
pub fn shipment_for<'a>(
    alert: &Alert,
    records: &'a [ShipmentRecord],
) -> Option<&'a ShipmentRecord> {
    records
        .iter()
        .find(|record| record.id.eq_ignore_ascii_case(&alert.shipment_id))
}
