use serde::{Deserialize, Serialize};

/// One `(identifier, percentage)` pair of an allocation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub identifier: String,
    /// Percentage of the allocated total, expressed 0–100.
    pub allocation_percentage: f64,
}

impl Allocation {
    pub fn new(identifier: impl Into<String>, allocation_percentage: f64) -> Self {
        Self {
            identifier: identifier.into(),
            allocation_percentage,
        }
    }
}

/// Sum of percentages across a slice of allocations.
pub fn total_percentage(allocations: &[Allocation]) -> f64 {
    allocations.iter().map(|a| a.allocation_percentage).sum()
}
