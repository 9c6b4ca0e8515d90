//! Third-party logistics partner connections.
//!
//! The registry holds the partner roster for a session. Connecting requires
//! an API key; the key itself is handed to the caller's integration layer and
//! is never stored here.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::routing::GeoPoint;

/// Connection state of a partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConnectionStatus {
    /// Data is flowing from the partner.
    Connected,
    /// No active connection.
    Disconnected,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connected => write!(f, "Connected"),
            Self::Disconnected => write!(f, "Disconnected"),
        }
    }
}

/// A logistics partner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    /// Partner identifier.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Current connection state.
    pub status: ConnectionStatus,
    /// Last successful sync, if connected.
    pub last_synced: Option<DateTime<Utc>>,
    /// Location of the partner's hub.
    pub hub: GeoPoint,
}

impl Partner {
    /// Whether the partner is connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }
}

/// In-memory partner roster.
#[derive(Debug, Clone, Default)]
pub struct PartnerRegistry {
    partners: Vec<Partner>,
}

impl PartnerRegistry {
    /// Create a registry from an existing roster.
    #[must_use]
    pub fn new(partners: Vec<Partner>) -> Self {
        Self { partners }
    }

    /// The default roster: DHL, FedEx and Blue Dart.
    ///
    /// `now` stands in for the last sync time of partners that start connected.
    #[must_use]
    pub fn with_defaults(now: DateTime<Utc>) -> Self {
        let partner = |id, name: &str, description: &str, connected: bool, hub| Partner {
            id,
            name: name.to_string(),
            description: description.to_string(),
            status: if connected {
                ConnectionStatus::Connected
            } else {
                ConnectionStatus::Disconnected
            },
            last_synced: connected.then_some(now),
            hub,
        };

        Self::new(vec![
            partner(
                1,
                "DHL",
                "Global logistics partner",
                true,
                GeoPoint::new(28.6139, 77.209),
            ),
            partner(
                2,
                "FedEx",
                "Express delivery solutions",
                false,
                GeoPoint::new(19.076, 72.8777),
            ),
            partner(
                3,
                "Blue Dart",
                "Domestic logistics network",
                true,
                GeoPoint::new(12.9716, 77.5946),
            ),
        ])
    }

    /// All partners in roster order.
    #[must_use]
    pub fn partners(&self) -> &[Partner] {
        &self.partners
    }

    /// Look up a partner.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&Partner> {
        self.partners.iter().find(|p| p.id == id)
    }

    fn get_mut(&mut self, id: u32) -> Result<&mut Partner> {
        self.partners
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(Error::PartnerNotFound { id })
    }

    /// Connect a partner using an API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the partner does not exist or the key is blank.
    pub fn connect(&mut self, id: u32, api_key: &str, now: DateTime<Utc>) -> Result<&Partner> {
        let partner = self.get_mut(id)?;
        if api_key.trim().is_empty() {
            return Err(Error::PartnerApiKeyMissing {
                name: partner.name.clone(),
            });
        }

        partner.status = ConnectionStatus::Connected;
        partner.last_synced = Some(now);
        info!(partner = %partner.name, "Partner connected");
        Ok(&*partner)
    }

    /// Disconnect a partner and forget its sync time.
    ///
    /// # Errors
    ///
    /// Returns an error if the partner does not exist.
    pub fn disconnect(&mut self, id: u32) -> Result<&Partner> {
        let partner = self.get_mut(id)?;
        partner.status = ConnectionStatus::Disconnected;
        partner.last_synced = None;
        info!(partner = %partner.name, "Partner disconnected");
        Ok(&*partner)
    }

    /// Record a sync with a connected partner.
    ///
    /// # Errors
    ///
    /// Returns an error if the partner does not exist or is disconnected.
    pub fn sync(&mut self, id: u32, now: DateTime<Utc>) -> Result<&Partner> {
        let partner = self.get_mut(id)?;
        if !partner.is_connected() {
            return Err(Error::PartnerNotConnected {
                name: partner.name.clone(),
            });
        }

        partner.last_synced = Some(now);
        debug!(partner = %partner.name, "Partner synced");
        Ok(&*partner)
    }

    /// Hub locations of every partner, for map display.
    pub fn hubs(&self) -> impl Iterator<Item = (&str, GeoPoint)> {
        self.partners.iter().map(|p| (p.name.as_str(), p.hub))
    }

    /// Number of connected partners.
    #[must_use]
    pub fn connected_count(&self) -> usize {
        self.partners.iter().filter(|p| p.is_connected()).count()
    }
}
