//! Catalog loading and validation.
//!
//! Reads a fund catalog from CSV and validates every row before the engine
//! ever sees it. A row passes when:
//! 1. `scheme_name` is non-empty and not seen earlier in the file
//! 2. `min_sip` and `min_lumpsum` are present, finite and `>= 0`
//! 3. `returns_5yr` is present and finite
//! 4. `risk_level` is present, finite and `> 0`
//! 5. `rating`, when present, is finite and within `[0, rating_scale_max]`
//!
//! Cells that are empty or a lone `-` count as missing. What happens to a
//! failing row depends on the [`ValidationPolicy`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use fundlab_core::{Catalog, FundDetails, InstrumentRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ValidationPolicy;

/// Columns every catalog must have.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "scheme_name",
    "min_sip",
    "min_lumpsum",
    "returns_5yr",
    "risk_level",
    "rating",
];

/// Errors from the catalog loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open catalog '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("catalog is missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("invalid row at line {line} ('{identifier}'): {reason}")]
    InvalidRow {
        line: u64,
        identifier: String,
        reason: String,
    },

    #[error("duplicate scheme '{identifier}' at line {line}")]
    DuplicateIdentifier { line: u64, identifier: String },
}

/// Options controlling how a catalog is validated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOptions {
    pub policy: ValidationPolicy,
    /// Upper bound for the `rating` column.
    pub rating_scale_max: f64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            policy: ValidationPolicy::DropInvalid,
            rating_scale_max: 5.0,
        }
    }
}

/// A row that failed validation and was dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRow {
    /// 1-based line number in the source file (the header is line 1).
    pub line: u64,
    /// Scheme name, when the row had one.
    pub identifier: String,
    pub reason: String,
}

/// Result of loading a catalog, including what was dropped.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub rejected: Vec<RejectedRow>,
    /// BLAKE3 fingerprint of the validated catalog.
    pub fingerprint: String,
}

/// Where a scheme name ended up after loading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemeLookup<'a> {
    /// The scheme passed validation.
    Found(&'a InstrumentRecord),
    /// The scheme was in the file but its row was dropped.
    Rejected(&'a RejectedRow),
    /// No row carried this name.
    Missing,
}

impl LoadedCatalog {
    /// Look up a scheme by exact name, falling back to the rejected rows.
    ///
    /// A name that loaded once and was later dropped as a duplicate is `Found`.
    pub fn find_scheme(&self, identifier: &str) -> SchemeLookup<'_> {
        if let Some(record) = self.catalog.find(identifier) {
            return SchemeLookup::Found(record);
        }
        self.rejected
            .iter()
            .find(|row| row.identifier == identifier)
            .map_or(SchemeLookup::Missing, SchemeLookup::Rejected)
    }
}

/// One CSV row as text. Every column is optional at this stage so that a
/// missing cell becomes a validation failure rather than a parse error.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    scheme_name: Option<String>,
    min_sip: Option<String>,
    min_lumpsum: Option<String>,
    returns_5yr: Option<String>,
    risk_level: Option<String>,
    rating: Option<String>,
    amc_name: Option<String>,
    fund_manager: Option<String>,
    category: Option<String>,
    sub_category: Option<String>,
    expense_ratio: Option<String>,
    fund_size_cr: Option<String>,
    fund_age_yr: Option<String>,
    returns_1yr: Option<String>,
    returns_3yr: Option<String>,
    sharpe: Option<String>,
    sortino: Option<String>,
    alpha: Option<String>,
    beta: Option<String>,
    sd: Option<String>,
}

/// Load and validate a catalog from a CSV file.
pub fn load_catalog(path: &Path, opts: &LoadOptions) -> Result<LoadedCatalog, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let loaded = parse_catalog(file, opts)?;
    info!(
        path = %path.display(),
        records = loaded.catalog.len(),
        rejected = loaded.rejected.len(),
        fingerprint = %loaded.fingerprint,
        "catalog loaded"
    );
    Ok(loaded)
}

/// Parse and validate a catalog from any CSV reader.
pub fn parse_catalog<R: Read>(reader: R, opts: &LoadOptions) -> Result<LoadedCatalog, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn {
                column: column.to_string(),
            });
        }
    }

    let mut records: Vec<InstrumentRecord> = Vec::new();
    let mut rejected = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for result in rdr.records() {
        let raw = result?;
        let line = raw.position().map(|p| p.line()).unwrap_or(0);
        let row: CsvRow = raw.deserialize(Some(&headers))?;
        let identifier = row.scheme_name.clone().unwrap_or_default();

        let outcome = validate_row(row, opts.rating_scale_max).and_then(|record| {
            if seen.contains(&record.identifier) {
                Err(RowFailure::Duplicate)
            } else {
                Ok(record)
            }
        });

        match outcome {
            Ok(record) => {
                seen.insert(record.identifier.clone());
                records.push(record);
            }
            Err(failure) => {
                if opts.policy == ValidationPolicy::Strict {
                    return Err(failure.into_error(line, identifier));
                }
                let reason = failure.reason();
                warn!(
                    line,
                    identifier = %identifier,
                    reason = %reason,
                    "dropping invalid catalog row"
                );
                rejected.push(RejectedRow {
                    line,
                    identifier,
                    reason,
                });
            }
        }
    }

    let catalog = Catalog::new(records);
    let fingerprint = catalog.fingerprint();
    Ok(LoadedCatalog {
        catalog,
        rejected,
        fingerprint,
    })
}

enum RowFailure {
    Invalid(String),
    Duplicate,
}

impl RowFailure {
    fn reason(&self) -> String {
        match self {
            Self::Invalid(reason) => reason.clone(),
            Self::Duplicate => "duplicate scheme_name".to_string(),
        }
    }

    fn into_error(self, line: u64, identifier: String) -> LoadError {
        match self {
            Self::Invalid(reason) => LoadError::InvalidRow {
                line,
                identifier,
                reason,
            },
            Self::Duplicate => LoadError::DuplicateIdentifier { line, identifier },
        }
    }
}

fn validate_row(row: CsvRow, rating_scale_max: f64) -> Result<InstrumentRecord, RowFailure> {
    let identifier = text(row.scheme_name)
        .ok_or_else(|| RowFailure::Invalid("scheme_name is missing".into()))?;

    let min_sip = required("min_sip", row.min_sip.as_deref())?;
    let min_lumpsum = required("min_lumpsum", row.min_lumpsum.as_deref())?;
    for (name, value) in [("min_sip", min_sip), ("min_lumpsum", min_lumpsum)] {
        if value < 0.0 {
            return Err(RowFailure::Invalid(format!("{name} must be >= 0, got {value}")));
        }
    }

    let returns_5yr = required("returns_5yr", row.returns_5yr.as_deref())?;

    let risk_level = required("risk_level", row.risk_level.as_deref())?;
    if risk_level <= 0.0 {
        return Err(RowFailure::Invalid(format!(
            "risk_level must be > 0, got {risk_level}"
        )));
    }

    let rating = optional("rating", row.rating.as_deref())?;
    if let Some(r) = rating {
        if !(0.0..=rating_scale_max).contains(&r) {
            return Err(RowFailure::Invalid(format!(
                "rating must be within [0, {rating_scale_max}], got {r}"
            )));
        }
    }

    let details = FundDetails {
        amc_name: text(row.amc_name),
        fund_manager: text(row.fund_manager),
        category: text(row.category),
        sub_category: text(row.sub_category),
        expense_ratio: optional("expense_ratio", row.expense_ratio.as_deref())?,
        fund_size_cr: optional("fund_size_cr", row.fund_size_cr.as_deref())?,
        fund_age_yr: optional("fund_age_yr", row.fund_age_yr.as_deref())?,
        returns_1yr: optional("returns_1yr", row.returns_1yr.as_deref())?,
        returns_3yr: optional("returns_3yr", row.returns_3yr.as_deref())?,
        sharpe: optional("sharpe", row.sharpe.as_deref())?,
        sortino: optional("sortino", row.sortino.as_deref())?,
        alpha: optional("alpha", row.alpha.as_deref())?,
        beta: optional("beta", row.beta.as_deref())?,
        sd: optional("sd", row.sd.as_deref())?,
    };

    Ok(InstrumentRecord::new(
        identifier,
        min_sip,
        min_lumpsum,
        returns_5yr,
        risk_level,
        rating,
    )
    .with_details(details))
}

fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || cell == "-"
}

fn text(cell: Option<String>) -> Option<String> {
    cell.filter(|c| !is_missing(c)).map(|c| c.trim().to_string())
}

fn optional(column: &str, cell: Option<&str>) -> Result<Option<f64>, RowFailure> {
    match cell {
        None => Ok(None),
        Some(c) if is_missing(c) => Ok(None),
        Some(c) => {
            let value: f64 = c
                .trim()
                .parse()
                .map_err(|_| RowFailure::Invalid(format!("{column} is not a number: '{c}'")))?;
            if !value.is_finite() {
                return Err(RowFailure::Invalid(format!("{column} must be finite, got {c}")));
            }
            Ok(Some(value))
        }
    }
}

fn required(column: &str, cell: Option<&str>) -> Result<f64, RowFailure> {
    optional(column, cell)?.ok_or_else(|| RowFailure::Invalid(format!("{column} is missing")))
}
