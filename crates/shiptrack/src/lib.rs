//! `shiptrack` - Shipment query engine for a logistics dashboard
//!
//! This library filters shipment records by status and free-text search, and
//! provides the data around them that the dashboard shows: summary counts,
//! alerts, logistics partner connections, routes and stored preferences.
//!
//! ```
//! use shiptrack::{filter_shipments, ShipmentRecord};
//!
//! let shipments = vec![
//!     ShipmentRecord::new("SHIP-1023", "Mumbai", "Delhi", "In-Transit"),
//!     ShipmentRecord::new("SHIP-1024", "Bengaluru", "Chennai", "Delayed"),
//! ];
//!
//! let delayed = filter_shipments(&shipments, "delayed", "");
//! assert_eq!(delayed.len(), 1);
//! assert_eq!(delayed[0].id, "SHIP-1024");
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod alerts;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod partners;
pub mod predict;
pub mod query;
pub mod routing;
pub mod settings;
pub mod shipment;
pub mod storage;
pub mod summary;

pub use alerts::{Alert, AlertFeed};
pub use config::Config;
pub use error::{Error, Result};
pub use loader::{LoadMode, ShipmentLoader};
pub use logging::init_logging;
pub use partners::PartnerRegistry;
pub use query::{filter_shipments, FilterCriteria, StatusFilter};
pub use settings::SettingsStore;
pub use shipment::{ShipmentRecord, ShipmentStatus};
pub use summary::ShipmentSummary;
