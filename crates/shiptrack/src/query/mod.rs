//! Shipment query engine.
//!
//! This module turns a loaded shipment collection plus user-supplied criteria
//! into the subset to display:
//!
//! - **Normalization**: status text is compared after collapsing whitespace
//!   runs to `-` and lower-casing; search text is compared lower-cased.
//!
//! - **Filtering**: a record is kept when it passes both the status predicate
//!   and the free-text search predicate. Input order is preserved and the input
//!   collection is never modified.
//!
//! # Example
//!
//! ```
//! use shiptrack::query::filter_shipments;
//! use shiptrack::ShipmentRecord;
//!
//! let records = vec![
//!     ShipmentRecord::new("SHIP-1023", "Mumbai", "Delhi", "Delayed"),
//!     ShipmentRecord::new("SHIP-1017", "Bengaluru", "Chennai", "In Transit"),
//! ];
//!
//! let delayed = filter_shipments(&records, "Delayed", "");
//! assert_eq!(delayed.len(), 1);
//!
//! let to_delhi = filter_shipments(&records, "All", "delhi");
//! assert_eq!(to_delhi[0].id, "SHIP-1023");
//! ```

mod filter;
mod normalize;

pub use filter::{filter_shipments, FilterCriteria, ShipmentQuery, StatusFilter, ALL_STATUSES};
pub use normalize::{normalize_search, normalize_status};
