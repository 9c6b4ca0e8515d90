//! Delay prediction for freshly loaded shipments.
//!
//! A [`DelayPredictor`] decides, once per record at load time, whether the
//! record should be flagged as likely to be delayed. The flag is display-only:
//! the query engine never reads it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::shipment::ShipmentRecord;

/// Default probability used by [`RandomDelayPredictor`].
pub const DEFAULT_DELAY_PROBABILITY: f64 = 0.3;

/// Policy deciding whether a shipment is likely to be delayed.
pub trait DelayPredictor {
    /// Predict a delay for this record.
    fn predict(&mut self, record: &ShipmentRecord) -> bool;
}

impl<F> DelayPredictor for F
where
    F: FnMut(&ShipmentRecord) -> bool,
{
    fn predict(&mut self, record: &ShipmentRecord) -> bool {
        self(record)
    }
}

/// Placeholder policy: flags each record independently with a fixed probability.
#[derive(Debug)]
pub struct RandomDelayPredictor {
    probability: f64,
    rng: StdRng,
}

impl RandomDelayPredictor {
    /// Create a predictor seeded from system entropy.
    ///
    /// `probability` is clamped to `[0, 1]`; NaN disables flagging.
    #[must_use]
    pub fn new(probability: f64) -> Self {
        Self::with_rng(probability, StdRng::from_entropy())
    }

    /// Create a reproducible predictor.
    #[must_use]
    pub fn seeded(probability: f64, seed: u64) -> Self {
        Self::with_rng(probability, StdRng::seed_from_u64(seed))
    }

    fn with_rng(probability: f64, rng: StdRng) -> Self {
        let probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        Self { probability, rng }
    }

    /// The probability of flagging a record.
    #[must_use]
    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Default for RandomDelayPredictor {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY_PROBABILITY)
    }
}

impl DelayPredictor for RandomDelayPredictor {
    fn predict(&mut self, _record: &ShipmentRecord) -> bool {
        self.rng.gen_bool(self.probability)
    }
}

/// Set `predicted_delay` on every record using the given policy.
///
/// Any existing flag is overwritten, so this belongs at load time only.
pub fn annotate<P>(records: &mut [ShipmentRecord], predictor: &mut P)
where
    P: DelayPredictor + ?Sized,
{
    let mut flagged = 0usize;
    for record in records.iter_mut() {
        let delayed = predictor.predict(record);
        flagged += usize::from(delayed);
        record.predicted_delay = Some(delayed);
    }
    debug!(total = records.len(), flagged, "Annotated delay predictions");
}
