//! Status and free-text filtering over shipment collections.

use tracing::trace;

use super::normalize::{normalize_search, normalize_status};
use crate::shipment::{ShipmentRecord, ShipmentStatus};

/// Sentinel status filter text that disables status filtering.
pub const ALL_STATUSES: &str = "All";

/// Which statuses to keep.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Keep every status, including unrecognized ones.
    #[default]
    All,

    /// Keep records whose status normalizes to the same key as this text.
    Status(String),
}

impl StatusFilter {
    /// Parse filter text as chosen in a status selector.
    ///
    /// Only the exact sentinel `"All"` selects every status; any other text is
    /// compared against record statuses after normalization.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        if text == ALL_STATUSES {
            Self::All
        } else {
            Self::Status(text.to_string())
        }
    }

    /// Whether this filter can match anything among the canonical states.
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        match self {
            Self::All => true,
            Self::Status(text) => ShipmentStatus::from_raw(text).is_some(),
        }
    }
}

impl From<ShipmentStatus> for StatusFilter {
    fn from(status: ShipmentStatus) -> Self {
        Self::Status(status.label().to_string())
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL_STATUSES),
            Self::Status(text) => f.write_str(text),
        }
    }
}

/// User-selected filter state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    /// Status selection.
    pub status_filter: StatusFilter,

    /// Free-text search term. Empty matches everything.
    pub search_term: String,
}

impl FilterCriteria {
    /// Create criteria from raw selector and search box text.
    #[must_use]
    pub fn new(status_filter: &str, search_term: impl Into<String>) -> Self {
        Self {
            status_filter: StatusFilter::parse(status_filter),
            search_term: search_term.into(),
        }
    }

    /// Normalize the criteria once for repeated matching.
    #[must_use]
    pub fn compile(&self) -> ShipmentQuery {
        ShipmentQuery::new(self)
    }
}

/// Criteria with their comparison keys precomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentQuery {
    /// Normalized status key, or `None` for every status.
    status_key: Option<String>,
    /// Lower-cased search term.
    term: String,
}

impl ShipmentQuery {
    /// Compile filter criteria.
    #[must_use]
    pub fn new(criteria: &FilterCriteria) -> Self {
        let status_key = match &criteria.status_filter {
            StatusFilter::All => None,
            StatusFilter::Status(text) => Some(normalize_status(Some(text))),
        };

        Self {
            status_key,
            term: normalize_search(&criteria.search_term),
        }
    }

    /// Check whether a record passes both the status and the search predicate.
    #[must_use]
    pub fn matches(&self, record: &ShipmentRecord) -> bool {
        self.matches_status(record) && self.matches_search(record)
    }

    fn matches_status(&self, record: &ShipmentRecord) -> bool {
        match &self.status_key {
            None => true,
            Some(key) => normalize_status(record.status.as_deref()) == *key,
        }
    }

    fn matches_search(&self, record: &ShipmentRecord) -> bool {
        if self.term.is_empty() {
            return true;
        }

        [
            record.id.as_str(),
            record.origin_or_empty(),
            record.destination_or_empty(),
        ]
        .into_iter()
        .any(|field| normalize_search(field).contains(&self.term))
    }

    /// Keep the matching records, in input order.
    pub fn apply<'a, I>(&self, records: I) -> Vec<&'a ShipmentRecord>
    where
        I: IntoIterator<Item = &'a ShipmentRecord>,
    {
        let matched: Vec<&ShipmentRecord> = records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect();
        trace!(
            status = ?self.status_key,
            term = %self.term,
            matched = matched.len(),
            "Applied shipment query"
        );
        matched
    }
}

/// Filter shipments by status selection and search term.
///
/// `status_filter` is either `"All"` or status text in any spacing or casing;
/// text that does not normalize to a known status yields an empty result.
/// `search_term` is matched case-insensitively as a substring of the id,
/// origin or destination. The input is left untouched and the output keeps
/// input order.
#[must_use]
pub fn filter_shipments(
    records: &[ShipmentRecord],
    status_filter: &str,
    search_term: &str,
) -> Vec<ShipmentRecord> {
    FilterCriteria::new(status_filter, search_term)
        .compile()
        .apply(records)
        .into_iter()
        .cloned()
        .collect()
}
