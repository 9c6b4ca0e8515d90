//! Core shipment types for shiptrack.
//!
//! This module defines the record shape every shipment must have before it
//! reaches the query engine, and the closed set of lifecycle states.

use serde::{Deserialize, Serialize};

use crate::query::normalize_status;

/// Lifecycle state of a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipmentStatus {
    /// On the road between origin and destination.
    InTransit,
    /// Behind schedule.
    Delayed,
    /// Handed over at the destination.
    Delivered,
}

impl ShipmentStatus {
    /// All canonical states, in display order.
    pub const ALL: [Self; 3] = [Self::InTransit, Self::Delayed, Self::Delivered];

    /// Resolve raw status text (any spacing or casing) to a canonical state.
    ///
    /// Returns `None` for text that does not normalize to a known state.
    #[must_use]
    pub fn from_raw(raw: &str) -> Option<Self> {
        let key = normalize_status(Some(raw));
        Self::ALL.into_iter().find(|status| status.key() == key)
    }

    /// The normalized comparison key for this state.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::InTransit => "in-transit",
            Self::Delayed => "delayed",
            Self::Delivered => "delivered",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::InTransit => "In-Transit",
            Self::Delayed => "Delayed",
            Self::Delivered => "Delivered",
        }
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A tracked shipment.
///
/// `origin`, `destination` and `status` are optional at the type level so that
/// a partially populated record can still flow through the query engine, which
/// treats any absent text as empty. The loader is responsible for rejecting
/// records that miss required fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentRecord {
    /// Stable identifier such as `SHIP-1023`. Stored case-preserving.
    pub id: String,

    /// Where the shipment departed from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    /// Where the shipment is headed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// Raw status text as supplied by the data source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Latitude of the last known position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,

    /// Longitude of the last known position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,

    /// Derived delay-risk flag. Absent until the record has been annotated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_delay: Option<bool>,
}

impl ShipmentRecord {
    /// Create a record with the required fields set.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            origin: Some(origin.into()),
            destination: Some(destination.into()),
            status: Some(status.into()),
            lat: None,
            lng: None,
            predicted_delay: None,
        }
    }

    /// Attach coordinates.
    #[must_use]
    pub fn with_position(mut self, lat: f64, lng: f64) -> Self {
        self.lat = Some(lat);
        self.lng = Some(lng);
        self
    }

    /// Origin label, or `""` when absent.
    #[must_use]
    pub fn origin_or_empty(&self) -> &str {
        self.origin.as_deref().unwrap_or_default()
    }

    /// Destination label, or `""` when absent.
    #[must_use]
    pub fn destination_or_empty(&self) -> &str {
        self.destination.as_deref().unwrap_or_default()
    }

    /// Raw status text, or `""` when absent.
    #[must_use]
    pub fn status_or_empty(&self) -> &str {
        self.status.as_deref().unwrap_or_default()
    }

    /// The canonical status, if the raw text is recognized.
    #[must_use]
    pub fn canonical_status(&self) -> Option<ShipmentStatus> {
        self.status.as_deref().and_then(ShipmentStatus::from_raw)
    }

    /// Position as `(lat, lng)` when both coordinates are known.
    #[must_use]
    pub fn position(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lng)
    }

    /// Whether the record has been flagged as likely to be delayed.
    #[must_use]
    pub fn is_predicted_delay(&self) -> bool {
        self.predicted_delay.unwrap_or(false)
    }
}
