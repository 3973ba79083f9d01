//! Reporting and export — JSON and CSV artifacts for a recommendation.
//!
//! - **JSON**: the full report, with schema versioning
//! - **CSV**: the kept allocations, one row per scheme
//!
//! Persisted reports carry a `schema_version`. Newer versions are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use fundlab_core::Allocation;
use serde::{Deserialize, Serialize};

use crate::recommend::Recommendation;

/// Version of the persisted report layout.
pub const SCHEMA_VERSION: u32 = 1;

/// A recommendation plus the provenance needed to reproduce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub schema_version: u32,
    pub generated_at: DateTime<Utc>,
    pub catalog_fingerprint: String,
    pub recommendation: Recommendation,
}

impl RecommendationReport {
    pub fn new(recommendation: Recommendation) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            catalog_fingerprint: recommendation.catalog_fingerprint.clone(),
            recommendation,
        }
    }
}

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a report to pretty JSON.
pub fn export_json(report: &RecommendationReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize RecommendationReport to JSON")
}

/// Deserialize a report from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<RecommendationReport> {
    let report: RecommendationReport =
        serde_json::from_str(json).context("failed to deserialize RecommendationReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export allocations as CSV. Columns: rank, scheme_name, allocation_percentage
pub fn export_allocations_csv(allocations: &[Allocation]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["rank", "scheme_name", "allocation_percentage"])?;
    for (i, a) in allocations.iter().enumerate() {
        wtr.write_record([
            &(i + 1).to_string(),
            &a.identifier,
            &format!("{:.6}", a.allocation_percentage),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Write `recommendation.json` and `allocations.csv` into `output_dir`.
///
/// The directory is created if needed. Returns the directory path.
pub fn save_report(report: &RecommendationReport, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let json = export_json(report)?;
    let json_path = output_dir.join("recommendation.json");
    std::fs::write(&json_path, json)
        .with_context(|| format!("failed to write {}", json_path.display()))?;

    let csv = export_allocations_csv(&report.recommendation.allocations)?;
    let csv_path = output_dir.join("allocations.csv");
    std::fs::write(&csv_path, csv)
        .with_context(|| format!("failed to write {}", csv_path.display()))?;

    tracing::info!(dir = %output_dir.display(), "report saved");
    Ok(output_dir.to_path_buf())
}

/// Load a report from a directory written by [`save_report`].
pub fn load_report(dir: &Path) -> Result<RecommendationReport> {
    let path = dir.join("recommendation.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}
