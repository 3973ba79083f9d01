use serde::{Deserialize, Serialize};

/// Descriptive fields carried through from the catalog.
///
/// None of these take part in eligibility, scoring or allocation. They exist
/// so a scheme can be looked up and shown in full.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundDetails {
    pub amc_name: Option<String>,
    pub fund_manager: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub expense_ratio: Option<f64>,
    pub fund_size_cr: Option<f64>,
    pub fund_age_yr: Option<f64>,
    pub returns_1yr: Option<f64>,
    pub returns_3yr: Option<f64>,
    pub sharpe: Option<f64>,
    pub sortino: Option<f64>,
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub sd: Option<f64>,
}

/// One row of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentRecord {
    /// Unique key within a catalog snapshot (the scheme name).
    pub identifier: String,
    /// Minimum periodic contribution. Compared against the client's tenure.
    pub min_entry_contribution: f64,
    /// Minimum one-time capital. Compared against the client's capital.
    pub min_lump_sum: f64,
    /// Trailing 5-year return, percent. May be negative.
    pub historical_return_5yr: f64,
    /// Numeric risk score, larger is riskier. Must be strictly positive.
    pub risk_level: f64,
    /// Rating on a bounded scale. `None` when the catalog has no rating.
    pub rating: Option<f64>,
    #[serde(default)]
    pub details: FundDetails,
}

impl InstrumentRecord {
    pub fn new(
        identifier: impl Into<String>,
        min_entry_contribution: f64,
        min_lump_sum: f64,
        historical_return_5yr: f64,
        risk_level: f64,
        rating: Option<f64>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            min_entry_contribution,
            min_lump_sum,
            historical_return_5yr,
            risk_level,
            rating,
            details: FundDetails::default(),
        }
    }

    pub fn with_details(mut self, details: FundDetails) -> Self {
        self.details = details;
        self
    }

    /// Rating weight used by scoring and reweighting. A missing rating weighs zero.
    pub fn rating_weight(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }
}
