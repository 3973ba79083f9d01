//! Domain types for FundLab

pub mod allocation;
pub mod catalog;
pub mod instrument;
pub mod scored;

pub use allocation::{total_percentage, Allocation};
pub use catalog::Catalog;
pub use instrument::{FundDetails, InstrumentRecord};
pub use scored::ScoredInstrument;
