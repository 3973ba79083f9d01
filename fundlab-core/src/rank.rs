//! Ranker — composite risk-adjusted scoring with a stable descending order.
//!
//! Per record:
//! - `risk_adjusted_return = historical_return_5yr / risk_level`
//! - `normalized_rating = rating / rating_scale_max` (missing rating → 0)
//! - `composite_score = return_weight * risk_adjusted_return + rating_weight * normalized_rating`
//!
//! Records are then sorted descending by composite score with a stable sort,
//! so equal scores keep their catalog order.

use crate::config::EngineConfig;
use crate::domain::{InstrumentRecord, ScoredInstrument};
use crate::error::DivisionError;

/// Score a single record.
///
/// Fails when `risk_level` is not strictly positive (NaN included), or when
/// the return, the rating, or the resulting score is not finite.
pub fn score(
    record: &InstrumentRecord,
    config: &EngineConfig,
) -> Result<ScoredInstrument, DivisionError> {
    if record.risk_level.is_nan() || record.risk_level <= 0.0 {
        return Err(DivisionError::NonPositiveRiskLevel {
            identifier: record.identifier.clone(),
            risk_level: record.risk_level,
        });
    }
    ensure_finite(record, "risk_level", record.risk_level)?;
    ensure_finite(record, "historical_return_5yr", record.historical_return_5yr)?;
    if let Some(rating) = record.rating {
        ensure_finite(record, "rating", rating)?;
    }

    let risk_adjusted_return = record.historical_return_5yr / record.risk_level;
    let normalized_rating = record.rating_weight() / config.rating_scale_max;
    let w = config.score_weights;
    let composite_score =
        w.return_weight * risk_adjusted_return + w.rating_weight * normalized_rating;
    ensure_finite(record, "composite_score", composite_score)?;

    Ok(ScoredInstrument {
        record: record.clone(),
        risk_adjusted_return,
        normalized_rating,
        composite_score,
    })
}

/// Score every eligible record and order them best first.
///
/// The first record that cannot be scored aborts the whole ranking.
pub fn rank(
    eligible: &[InstrumentRecord],
    config: &EngineConfig,
) -> Result<Vec<ScoredInstrument>, DivisionError> {
    let mut scored = eligible
        .iter()
        .map(|r| score(r, config))
        .collect::<Result<Vec<_>, _>>()?;

    // Every score is finite here, so total_cmp is a true total order.
    // sort_by is stable: ties stay in input order.
    scored.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));
    Ok(scored)
}

fn ensure_finite(
    record: &InstrumentRecord,
    field: &'static str,
    value: f64,
) -> Result<(), DivisionError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DivisionError::NonFiniteInput {
            identifier: record.identifier.clone(),
            field,
            value,
        })
    }
}
