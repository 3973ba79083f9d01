//! Engine error kinds.
//!
//! Every failure is raised synchronously to the immediate caller. The engine
//! never repairs input or substitutes a default value for an undefined result.

use thiserror::Error;

/// A record reached the ranker with values that cannot be scored.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DivisionError {
    #[error("risk_level for '{identifier}' must be strictly positive, got {risk_level}")]
    NonPositiveRiskLevel { identifier: String, risk_level: f64 },

    #[error("{field} for '{identifier}' must be finite, got {value}")]
    NonFiniteInput {
        identifier: String,
        field: &'static str,
        value: f64,
    },
}

/// The allocator has no well-defined allocation for its input.
///
/// Each variant is a distinct condition so callers can tell "no eligible
/// funds" apart from data-integrity failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    #[error("nothing to allocate: the ranked list is empty")]
    EmptyRankedList,

    #[error("total investment must be strictly positive, got {total_investment}")]
    NonPositiveInvestment { total_investment: f64 },

    #[error("proportional sizing is undefined: every minimum lump sum is zero")]
    ZeroSizingWeight,

    #[error("rating for '{identifier}' is negative ({rating})")]
    NegativeRating { identifier: String, rating: f64 },

    #[error("rating reweighting is undefined: no record carries a positive rating")]
    ZeroRatingWeight,

    #[error("{field} for '{identifier}' must be finite, got {value}")]
    NonFiniteInput {
        identifier: String,
        field: &'static str,
        value: f64,
    },
}

impl AllocationError {
    /// True when the failure means "there was nothing to allocate" rather
    /// than "the data could not be allocated".
    pub fn is_empty_selection(&self) -> bool {
        matches!(self, Self::EmptyRankedList)
    }
}

/// Any failure of the filter → rank → allocate pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("division error: {0}")]
    Division(#[from] DivisionError),

    #[error("allocation error: {0}")]
    Allocation(#[from] AllocationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_record() {
        let e = DivisionError::NonPositiveRiskLevel {
            identifier: "Fund X".into(),
            risk_level: 0.0,
        };
        assert!(e.to_string().contains("Fund X"));

        let e = DivisionError::NonFiniteInput {
            identifier: "Fund Y".into(),
            field: "historical_return_5yr",
            value: f64::NAN,
        };
        let msg = e.to_string();
        assert!(msg.contains("Fund Y") && msg.contains("historical_return_5yr"));
    }

    #[test]
    fn engine_error_wraps_both_kinds() {
        let e: EngineError = AllocationError::ZeroRatingWeight.into();
        assert!(matches!(e, EngineError::Allocation(AllocationError::ZeroRatingWeight)));

        let e: EngineError = DivisionError::NonPositiveRiskLevel {
            identifier: "A".into(),
            risk_level: -1.0,
        }
        .into();
        assert!(matches!(e, EngineError::Division(_)));
    }

    #[test]
    fn empty_selection_is_distinguishable() {
        assert!(AllocationError::EmptyRankedList.is_empty_selection());
        assert!(!AllocationError::ZeroRatingWeight.is_empty_selection());
        assert!(!AllocationError::NonPositiveInvestment { total_investment: 0.0 }
            .is_empty_selection());
    }
}
