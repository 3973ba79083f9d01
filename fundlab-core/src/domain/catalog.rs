//! Catalog snapshot — the ordered, read-only table the engine works from.

use serde::{Deserialize, Serialize};

use super::InstrumentRecord;

/// An ordered sequence of instrument records.
///
/// The engine only ever borrows a catalog. Callers that share one snapshot
/// across threads hand out `&Catalog`; nothing in the engine mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    records: Vec<InstrumentRecord>,
}

impl Catalog {
    pub fn new(records: Vec<InstrumentRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[InstrumentRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InstrumentRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by identifier. First match wins.
    pub fn find(&self, identifier: &str) -> Option<&InstrumentRecord> {
        self.records.iter().find(|r| r.identifier == identifier)
    }

    /// Deterministic BLAKE3 digest over every record, in catalog order.
    ///
    /// Two snapshots with the same rows in the same order share a fingerprint.
    /// Descriptive details are excluded; only fields the engine reads are hashed.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.records.len() as u64).to_le_bytes());
        for r in &self.records {
            hasher.update(&(r.identifier.len() as u64).to_le_bytes());
            hasher.update(r.identifier.as_bytes());
            hasher.update(&r.min_entry_contribution.to_le_bytes());
            hasher.update(&r.min_lump_sum.to_le_bytes());
            hasher.update(&r.historical_return_5yr.to_le_bytes());
            hasher.update(&r.risk_level.to_le_bytes());
            match r.rating {
                Some(rating) => {
                    hasher.update(&[1]);
                    hasher.update(&rating.to_le_bytes());
                }
                None => {
                    hasher.update(&[0]);
                }
            }
        }
        hasher.finalize().to_hex().to_string()
    }
}

impl From<Vec<InstrumentRecord>> for Catalog {
    fn from(records: Vec<InstrumentRecord>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<InstrumentRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = InstrumentRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a InstrumentRecord;
    type IntoIter = std::slice::Iter<'a, InstrumentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
