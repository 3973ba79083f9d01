//! FundLab Core — the ranking and allocation engine.
//!
//! This crate is pure and deterministic: no I/O, no global state, no logging.
//! It provides:
//! - Domain types (instrument records, catalog snapshots, scored instruments, allocations)
//! - Eligibility filter (tenure and capital gates)
//! - Ranker (composite risk-adjusted score, stable descending order)
//! - Allocator (sizing → horizon tilt → floor → rating reweight)
//! - Engine configuration with TOML loading and validation

pub mod allocate;
pub mod config;
pub mod domain;
pub mod error;
pub mod filter;
pub mod rank;

pub use allocate::{allocate, allocate_traced, AllocationTrace};
pub use config::{ConfigError, EngineConfig, HorizonTilt, ScoreWeights, TiltBracket};
pub use domain::{Allocation, Catalog, FundDetails, InstrumentRecord, ScoredInstrument};
pub use error::{AllocationError, DivisionError, EngineError};
pub use filter::filter;
pub use rank::rank;
