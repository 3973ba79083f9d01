use serde::{Deserialize, Serialize};

use super::InstrumentRecord;

/// An eligible record plus the derived ranking metrics.
///
/// Produced by the ranker and consumed read-only by the allocator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredInstrument {
    pub record: InstrumentRecord,
    /// `historical_return_5yr / risk_level`
    pub risk_adjusted_return: f64,
    /// `rating / rating_scale_max`
    pub normalized_rating: f64,
    pub composite_score: f64,
}

impl ScoredInstrument {
    pub fn identifier(&self) -> &str {
        &self.record.identifier
    }
}
