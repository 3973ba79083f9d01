//! FundLab Runner — everything around the engine.
//!
//! This crate builds on `fundlab-core` to provide:
//! - Catalog loading from CSV with row validation and rejection reporting
//! - Deterministic synthetic catalogs for demos and benchmarks
//! - The request pipeline (sizing the investment, truncating small weights)
//! - Parallel batch recommendations over one shared catalog snapshot
//! - TOML configuration covering engine and runner settings
//! - JSON/CSV export of recommendation reports

pub mod catalog_loader;
pub mod config;
pub mod export;
pub mod recommend;
pub mod synthetic;

pub use catalog_loader::{
    load_catalog, parse_catalog, LoadError, LoadOptions, LoadedCatalog, RejectedRow, SchemeLookup,
};
pub use config::{FundlabConfig, RecommendSettings, ValidationPolicy, ValidationSettings};
pub use export::{
    export_allocations_csv, export_json, import_json, load_report, save_report,
    RecommendationReport, SCHEMA_VERSION,
};
pub use recommend::{
    rank_only, recommend, recommend_batch, recommend_with_fingerprint, FailureKind, Ranking,
    RecommendError, RecommendRequest, Recommendation,
};
pub use synthetic::synthetic_catalog;
