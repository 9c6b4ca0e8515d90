//! Dashboard statistics over a shipment collection.

use serde::Serialize;

use crate::shipment::{ShipmentRecord, ShipmentStatus};

/// Aggregate counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShipmentSummary {
    /// Number of shipments.
    pub total: usize,
    /// Shipments in transit.
    pub in_transit: usize,
    /// Shipments behind schedule.
    pub delayed: usize,
    /// Shipments delivered.
    pub delivered: usize,
    /// Shipments whose status is not recognized.
    pub unrecognized: usize,
    /// Shipments flagged by delay prediction.
    pub predicted_delays: usize,
}

impl ShipmentSummary {
    /// Tally a collection.
    #[must_use]
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ShipmentRecord>,
    {
        records.into_iter().fold(Self::default(), |mut summary, record| {
            summary.total += 1;
            match record.canonical_status() {
                Some(ShipmentStatus::InTransit) => summary.in_transit += 1,
                Some(ShipmentStatus::Delayed) => summary.delayed += 1,
                Some(ShipmentStatus::Delivered) => summary.delivered += 1,
                None => summary.unrecognized += 1,
            }
            if record.is_predicted_delay() {
                summary.predicted_delays += 1;
            }
            summary
        })
    }

    /// Count for one canonical status.
    #[must_use]
    pub fn count(&self, status: ShipmentStatus) -> usize {
        match status {
            ShipmentStatus::InTransit => self.in_transit,
            ShipmentStatus::Delayed => self.delayed,
            ShipmentStatus::Delivered => self.delivered,
        }
    }

    /// Percentage of shipments that are not delayed, rounded half up.
    ///
    /// Zero for an empty collection.
    #[must_use]
    pub fn utilization_rate(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let on_time = self.total - self.delayed;
        // Integer rounding of on_time * 100 / total, half up.
        let rate = (on_time * 200 + self.total) / (self.total * 2);
        u8::try_from(rate).unwrap_or(100)
    }
}
