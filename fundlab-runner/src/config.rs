//! File-level configuration: engine parameters plus runner settings.
//!
//! One TOML document with three optional tables: `[engine]`, `[recommend]`
//! and `[validation]`. Missing tables and fields fall back to defaults.

use std::path::Path;

use fundlab_core::{ConfigError, EngineConfig};
use serde::{Deserialize, Serialize};

use crate::catalog_loader::LoadOptions;

/// How the catalog loader treats rows that fail validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Drop the row, record it as rejected, keep loading.
    #[default]
    DropInvalid,
    /// Fail the whole load on the first invalid row.
    Strict,
}

/// Runner-side knobs for a single recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendSettings {
    /// Allocations at or below this percentage are dropped from the output.
    pub truncation_threshold: f64,
}

impl Default for RecommendSettings {
    fn default() -> Self {
        Self {
            truncation_threshold: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    pub policy: ValidationPolicy,
}

/// Complete configuration for one `fundlab` invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundlabConfig {
    pub engine: EngineConfig,
    pub recommend: RecommendSettings,
    pub validation: ValidationSettings,
}

impl FundlabConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        let t = self.recommend.truncation_threshold;
        if !t.is_finite() || t < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "recommend.truncation_threshold must be finite and >= 0, got {t}"
            )));
        }
        Ok(())
    }

    /// Loader options implied by this configuration.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            policy: self.validation.policy,
            rating_scale_max: self.engine.rating_scale_max,
        }
    }

    /// Render as TOML, for `fundlab config default`.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
