//! Request pipeline — one client request against one catalog snapshot.
//!
//! Flow: validate request → filter → rank → size the investment → allocate →
//! truncate. The engine crate does the arithmetic; this module owns the
//! decisions that sit around it (what total to invest, what to drop from the
//! output, how to classify failures).

use fundlab_core::{
    allocate_traced, filter, rank, Allocation, AllocationError, AllocationTrace, Catalog,
    DivisionError, EngineConfig, ScoredInstrument,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::RecommendSettings;

/// A client's investment horizon and capital.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendRequest {
    /// Investment horizon in years.
    pub tenure: f64,
    /// Capital available for the lump-sum leg.
    pub amount: f64,
}

impl RecommendRequest {
    pub fn new(tenure: f64, amount: f64) -> Self {
        Self { tenure, amount }
    }

    fn validate(&self) -> Result<(), RecommendError> {
        for (field, value) in [("tenure", self.tenure), ("amount", self.amount)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(RecommendError::InvalidRequest { field, value });
            }
        }
        Ok(())
    }
}

/// The answer to one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub tenure: f64,
    pub amount: f64,
    /// Records that passed the eligibility filter.
    pub eligible_count: usize,
    /// `min(amount, Σ min_lump_sum)` over the ranked list.
    pub total_investment: f64,
    pub tilt_factor: f64,
    /// Allocations above the truncation threshold, in ranked order.
    pub allocations: Vec<Allocation>,
    /// Allocations removed by truncation, in ranked order.
    pub dropped: Vec<Allocation>,
    pub catalog_fingerprint: String,
    /// Percentages after each allocation pass, before truncation.
    pub trace: AllocationTrace,
}

/// Ranked candidates for a request, without allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub tenure: f64,
    pub amount: f64,
    pub ranked: Vec<ScoredInstrument>,
    pub catalog_fingerprint: String,
}

/// Coarse classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// Nothing in the catalog matched the client's tenure and capital.
    NoEligibleFunds,
    /// The catalog holds values the engine cannot work with.
    DataIntegrity,
    /// The request itself was malformed.
    InvalidInput,
}

/// Errors from the request pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecommendError {
    #[error("{field} must be finite and > 0, got {value}")]
    InvalidRequest { field: &'static str, value: f64 },

    #[error("ranking failed: {0}")]
    Ranking(#[from] DivisionError),

    #[error("allocation failed: {0}")]
    Allocation(#[from] AllocationError),
}

impl RecommendError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidRequest { .. } => FailureKind::InvalidInput,
            Self::Allocation(e) if e.is_empty_selection() => FailureKind::NoEligibleFunds,
            Self::Ranking(_) | Self::Allocation(_) => FailureKind::DataIntegrity,
        }
    }
}

/// Score and order the eligible records for a request.
pub fn rank_only(
    catalog: &Catalog,
    request: &RecommendRequest,
    engine: &EngineConfig,
) -> Result<Ranking, RecommendError> {
    request.validate()?;
    let eligible = filter(catalog, request.tenure, request.amount);
    let ranked = rank(&eligible, engine)?;
    Ok(Ranking {
        tenure: request.tenure,
        amount: request.amount,
        ranked,
        catalog_fingerprint: catalog.fingerprint(),
    })
}

/// Run the full pipeline for one request.
pub fn recommend(
    catalog: &Catalog,
    request: &RecommendRequest,
    engine: &EngineConfig,
    settings: &RecommendSettings,
) -> Result<Recommendation, RecommendError> {
    recommend_with_fingerprint(catalog, &catalog.fingerprint(), request, engine, settings)
}

/// Run the full pipeline for one request, stamping the result with a
/// fingerprint the caller already computed for `catalog`.
pub fn recommend_with_fingerprint(
    catalog: &Catalog,
    catalog_fingerprint: &str,
    request: &RecommendRequest,
    engine: &EngineConfig,
    settings: &RecommendSettings,
) -> Result<Recommendation, RecommendError> {
    request.validate()?;

    let eligible = filter(catalog, request.tenure, request.amount);
    let eligible_count = eligible.len();
    let ranked = rank(&eligible, engine)?;
    let total_investment = investable_total(&ranked, request.amount);
    debug!(
        tenure = request.tenure,
        amount = request.amount,
        eligible = eligible_count,
        total_investment,
        "ranked catalog for request"
    );

    let trace = allocate_traced(&ranked, total_investment, request.tenure, engine)?;
    let (allocations, dropped) = truncate(trace.allocations(), settings.truncation_threshold);
    debug!(
        kept = allocations.len(),
        dropped = dropped.len(),
        tilt_factor = trace.tilt_factor,
        "allocation complete"
    );

    Ok(Recommendation {
        tenure: request.tenure,
        amount: request.amount,
        eligible_count,
        total_investment,
        tilt_factor: trace.tilt_factor,
        allocations,
        dropped,
        catalog_fingerprint: catalog_fingerprint.to_string(),
        trace,
    })
}

/// Evaluate many requests against one shared snapshot, in parallel.
///
/// Results are returned in request order. Each request succeeds or fails on
/// its own. The catalog is fingerprinted once for the whole batch.
pub fn recommend_batch(
    catalog: &Catalog,
    requests: &[RecommendRequest],
    engine: &EngineConfig,
    settings: &RecommendSettings,
) -> Vec<Result<Recommendation, RecommendError>> {
    let fingerprint = catalog.fingerprint();
    debug!(requests = requests.len(), "starting batch recommendation");
    requests
        .par_iter()
        .map(|request| recommend_with_fingerprint(catalog, &fingerprint, request, engine, settings))
        .collect()
}

/// `min(amount, Σ min_lump_sum)` over the ranked list.
pub fn investable_total(ranked: &[ScoredInstrument], amount: f64) -> f64 {
    let lump_sums: f64 = ranked.iter().map(|s| s.record.min_lump_sum).sum();
    amount.min(lump_sums)
}

/// Split allocations into those strictly above `threshold` and the rest.
///
/// The kept percentages are not renormalized, so they may sum to less than 100.
pub fn truncate(
    allocations: Vec<Allocation>,
    threshold: f64,
) -> (Vec<Allocation>, Vec<Allocation>) {
    allocations
        .into_iter()
        .partition(|a| a.allocation_percentage > threshold)
}
