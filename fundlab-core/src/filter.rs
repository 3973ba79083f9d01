//! Eligibility filter — selects catalog records the client can enter.
//!
//! A record is eligible iff `min_entry_contribution <= tenure` and
//! `min_lump_sum <= capital`. The contribution minimum is gated by tenure,
//! not by a currency amount; downstream allocation math depends on that.

use crate::domain::{Catalog, InstrumentRecord};

/// Eligibility predicate for a single record.
pub fn is_eligible(record: &InstrumentRecord, tenure: f64, capital: f64) -> bool {
    record.min_entry_contribution <= tenure && record.min_lump_sum <= capital
}

/// Eligible subsequence of the catalog, in catalog order.
///
/// Returns owned copies; the catalog is left untouched. An empty result is a
/// valid outcome, not an error.
pub fn filter(catalog: &Catalog, tenure: f64, capital: f64) -> Vec<InstrumentRecord> {
    catalog
        .iter()
        .filter(|r| is_eligible(r, tenure, capital))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        vec![
            InstrumentRecord::new("A", 1.0, 100.0, 10.0, 2.0, Some(4.0)),
            InstrumentRecord::new("B", 5.0, 100.0, 10.0, 2.0, Some(4.0)),
            InstrumentRecord::new("C", 1.0, 5000.0, 10.0, 2.0, Some(4.0)),
            InstrumentRecord::new("D", 0.0, 0.0, 10.0, 2.0, Some(4.0)),
        ]
        .into()
    }

    fn ids(records: &[InstrumentRecord]) -> Vec<&str> {
        records.iter().map(|r| r.identifier.as_str()).collect()
    }

    #[test]
    fn both_gates_must_pass() {
        let eligible = filter(&catalog(), 3.0, 1000.0);
        assert_eq!(ids(&eligible), vec!["A", "D"]);
    }

    #[test]
    fn gates_are_inclusive() {
        let eligible = filter(&catalog(), 5.0, 5000.0);
        assert_eq!(ids(&eligible), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn preserves_catalog_order() {
        let eligible = filter(&catalog(), 100.0, 1e9);
        assert_eq!(ids(&eligible), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn nothing_eligible_is_empty_not_error() {
        let c: Catalog = vec![InstrumentRecord::new("A", 10.0, 100.0, 1.0, 1.0, None)].into();
        assert!(filter(&c, 1.0, 10.0).is_empty());
    }

    #[test]
    fn catalog_is_not_mutated() {
        let c = catalog();
        let before = c.clone();
        let _ = filter(&c, 3.0, 1000.0);
        assert_eq!(c, before);
    }
}
