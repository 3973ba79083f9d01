//! Allocator — converts a ranked list into percentage weights.
//!
//! Four passes over the full ranked list, in order:
//! 1. **Proportional sizing**: `min_lump_sum / total_investment * 100`, renormalized to 100.
//! 2. **Horizon tilt**: every percentage times one factor picked by tenure bracket.
//! 3. **Floor enforcement**: anything below the floor is raised to exactly the floor.
//! 4. **Rating reweighting**: `rating / Σrating * Σpct`, renormalized to 100.
//!
//! Passes 2 and 3 deliberately move the total away from 100 and do not correct
//! it; pass 4 always restores it. Ranked order is preserved throughout, only
//! the percentages change. Truncation of small weights is the caller's job.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::domain::{Allocation, ScoredInstrument};
use crate::error::AllocationError;

/// Percentages after each pass, index-aligned with the ranked list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationTrace {
    pub identifiers: Vec<String>,
    pub sized: Vec<f64>,
    pub tilt_factor: f64,
    pub tilted: Vec<f64>,
    pub floored: Vec<f64>,
    pub reweighted: Vec<f64>,
}

impl AllocationTrace {
    /// Final `(identifier, percentage)` pairs in ranked order.
    pub fn allocations(&self) -> Vec<Allocation> {
        self.identifiers
            .iter()
            .zip(&self.reweighted)
            .map(|(id, pct)| Allocation::new(id.clone(), *pct))
            .collect()
    }
}

/// Allocate across the ranked list, keeping every intermediate pass.
pub fn allocate_traced(
    ranked: &[ScoredInstrument],
    total_investment: f64,
    tenure: f64,
    config: &EngineConfig,
) -> Result<AllocationTrace, AllocationError> {
    if ranked.is_empty() {
        return Err(AllocationError::EmptyRankedList);
    }

    for s in ranked {
        ensure_finite(s, "min_lump_sum", s.record.min_lump_sum)?;
        if let Some(rating) = s.record.rating {
            ensure_finite(s, "rating", rating)?;
        }
    }

    let lump_sums: Vec<f64> = ranked.iter().map(|s| s.record.min_lump_sum).collect();
    let sized = proportional_sizing(&lump_sums, total_investment)?;

    let tilt_factor = config.horizon_tilt.factor_for(tenure);
    let tilted = apply_horizon_tilt(&sized, tilt_factor);

    let floored = enforce_floor(&tilted, config.floor_percentage);

    for s in ranked {
        let rating = s.record.rating_weight();
        if rating < 0.0 {
            return Err(AllocationError::NegativeRating {
                identifier: s.record.identifier.clone(),
                rating,
            });
        }
    }
    let ratings: Vec<f64> = ranked.iter().map(|s| s.record.rating_weight()).collect();
    let reweighted = rating_reweight(&floored, &ratings)?;

    Ok(AllocationTrace {
        identifiers: ranked.iter().map(|s| s.record.identifier.clone()).collect(),
        sized,
        tilt_factor,
        tilted,
        floored,
        reweighted,
    })
}

/// Allocate across the ranked list. Returns every ranked entry.
pub fn allocate(
    ranked: &[ScoredInstrument],
    total_investment: f64,
    tenure: f64,
    config: &EngineConfig,
) -> Result<Vec<Allocation>, AllocationError> {
    allocate_traced(ranked, total_investment, tenure, config).map(|t| t.allocations())
}

fn ensure_finite(
    scored: &ScoredInstrument,
    field: &'static str,
    value: f64,
) -> Result<(), AllocationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AllocationError::NonFiniteInput {
            identifier: scored.record.identifier.clone(),
            field,
            value,
        })
    }
}

/// Pass 1: size each entry by its minimum lump sum, then renormalize to 100.
pub fn proportional_sizing(
    min_lump_sums: &[f64],
    total_investment: f64,
) -> Result<Vec<f64>, AllocationError> {
    if min_lump_sums.is_empty() {
        return Err(AllocationError::EmptyRankedList);
    }
    if total_investment.is_nan() || total_investment <= 0.0 {
        return Err(AllocationError::NonPositiveInvestment { total_investment });
    }

    let raw: Vec<f64> = min_lump_sums
        .iter()
        .map(|lump| lump / total_investment * 100.0)
        .collect();
    normalize_to_hundred(&raw).ok_or(AllocationError::ZeroSizingWeight)
}

/// Pass 2: scale every percentage by the tenure bracket factor.
pub fn apply_horizon_tilt(pcts: &[f64], factor: f64) -> Vec<f64> {
    pcts.iter().map(|p| p * factor).collect()
}

/// Pass 3: raise anything below `floor` to exactly `floor`.
pub fn enforce_floor(pcts: &[f64], floor: f64) -> Vec<f64> {
    pcts.iter().map(|&p| if p < floor { floor } else { p }).collect()
}

/// Pass 4: redistribute the current total in proportion to rating, then
/// renormalize to 100.
///
/// `ratings` must be index-aligned with `pcts` and non-negative.
pub fn rating_reweight(pcts: &[f64], ratings: &[f64]) -> Result<Vec<f64>, AllocationError> {
    let rating_sum: f64 = ratings.iter().sum();
    if rating_sum.is_nan() || rating_sum <= 0.0 {
        return Err(AllocationError::ZeroRatingWeight);
    }

    let pct_sum: f64 = pcts.iter().sum();
    let weighted: Vec<f64> = ratings.iter().map(|r| r / rating_sum * pct_sum).collect();
    normalize_to_hundred(&weighted).ok_or(AllocationError::ZeroRatingWeight)
}

/// Rescale so the values sum to 100. `None` when the sum is not positive.
pub fn normalize_to_hundred(values: &[f64]) -> Option<Vec<f64>> {
    let sum: f64 = values.iter().sum();
    if sum.is_nan() || sum <= 0.0 {
        return None;
    }
    Some(values.iter().map(|v| v / sum * 100.0).collect())
}
