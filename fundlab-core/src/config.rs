//! Engine configuration — scoring weights, rating scale, horizon tilt table,
//! floor percentage.
//!
//! Every field has a default, so a TOML document only needs to name the values
//! it overrides. `validate()` is called by the loaders; callers that build a
//! config in code should call it themselves.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Weights of the two composite-score components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub return_weight: f64,
    pub rating_weight: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            return_weight: 0.6,
            rating_weight: 0.4,
        }
    }
}

/// One row of the horizon tilt table: applies to tenures `<= up_to`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TiltBracket {
    pub up_to: f64,
    pub factor: f64,
}

/// Tenure-bracketed multipliers applied to every allocation percentage.
///
/// Brackets are checked in ascending order of `up_to` (inclusive); tenures
/// above the last bracket use `beyond`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HorizonTilt {
    pub brackets: Vec<TiltBracket>,
    pub beyond: f64,
}

impl Default for HorizonTilt {
    fn default() -> Self {
        Self {
            brackets: vec![
                TiltBracket {
                    up_to: 3.0,
                    factor: 0.6,
                },
                TiltBracket {
                    up_to: 10.0,
                    factor: 0.8,
                },
            ],
            beyond: 0.9,
        }
    }
}

impl HorizonTilt {
    /// Factor for a tenure, in years.
    pub fn factor_for(&self, tenure: f64) -> f64 {
        self.brackets
            .iter()
            .find(|b| tenure <= b.up_to)
            .map(|b| b.factor)
            .unwrap_or(self.beyond)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.beyond.is_finite() && self.beyond > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "horizon_tilt.beyond must be finite and > 0, got {}",
                self.beyond
            )));
        }
        for b in &self.brackets {
            if !b.up_to.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "horizon_tilt bracket bound must be finite, got {}",
                    b.up_to
                )));
            }
            if !(b.factor.is_finite() && b.factor > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "horizon_tilt factor for up_to = {} must be finite and > 0, got {}",
                    b.up_to, b.factor
                )));
            }
        }
        for pair in self.brackets.windows(2) {
            if pair[1].up_to <= pair[0].up_to {
                return Err(ConfigError::Invalid(format!(
                    "horizon_tilt brackets must be strictly ascending ({} then {})",
                    pair[0].up_to, pair[1].up_to
                )));
            }
        }
        Ok(())
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum of the rating scale; ratings are divided by it.
    pub rating_scale_max: f64,
    pub score_weights: ScoreWeights,
    pub horizon_tilt: HorizonTilt,
    /// Minimum percentage after the floor pass.
    pub floor_percentage: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rating_scale_max: 5.0,
            score_weights: ScoreWeights::default(),
            horizon_tilt: HorizonTilt::default(),
            floor_percentage: 1.0,
        }
    }
}

impl EngineConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.rating_scale_max.is_finite() && self.rating_scale_max > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "rating_scale_max must be finite and > 0, got {}",
                self.rating_scale_max
            )));
        }

        let w = self.score_weights;
        let weights = [("return_weight", w.return_weight), ("rating_weight", w.rating_weight)];
        for (name, value) in weights {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "score_weights.{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        if w.return_weight == 0.0 && w.rating_weight == 0.0 {
            return Err(ConfigError::Invalid(
                "score_weights must not both be zero".into(),
            ));
        }

        self.horizon_tilt.validate()?;

        if !(self.floor_percentage.is_finite() && self.floor_percentage >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "floor_percentage must be finite and >= 0, got {}",
                self.floor_percentage
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_policy_constants() {
        let c = EngineConfig::default();
        assert_eq!(c.rating_scale_max, 5.0);
        assert_eq!(c.score_weights.return_weight, 0.6);
        assert_eq!(c.score_weights.rating_weight, 0.4);
        assert_eq!(c.floor_percentage, 1.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn default_tilt_brackets_are_inclusive() {
        let t = HorizonTilt::default();
        assert_eq!(t.factor_for(1.0), 0.6);
        assert_eq!(t.factor_for(3.0), 0.6);
        assert_eq!(t.factor_for(3.5), 0.8);
        assert_eq!(t.factor_for(10.0), 0.8);
        assert_eq!(t.factor_for(10.01), 0.9);
        assert_eq!(t.factor_for(40.0), 0.9);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let c = EngineConfig::from_toml("").unwrap();
        assert_eq!(c, EngineConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let c = EngineConfig::from_toml(
            r#"
floor_percentage = 2.0

[score_weights]
return_weight = 0.5
"#,
        )
        .unwrap();
        assert_eq!(c.floor_percentage, 2.0);
        assert_eq!(c.score_weights.return_weight, 0.5);
        assert_eq!(c.score_weights.rating_weight, 0.4);
        assert_eq!(c.horizon_tilt, HorizonTilt::default());
    }

    #[test]
    fn custom_tilt_table_parses() {
        let c = EngineConfig::from_toml(
            r#"
[horizon_tilt]
beyond = 1.0
brackets = [ { up_to = 5.0, factor = 0.5 } ]
"#,
        )
        .unwrap();
        assert_eq!(c.horizon_tilt.factor_for(5.0), 0.5);
        assert_eq!(c.horizon_tilt.factor_for(6.0), 1.0);
    }

    #[test]
    fn rejects_non_ascending_brackets() {
        let err = EngineConfig::from_toml(
            r#"
[horizon_tilt]
brackets = [ { up_to = 10.0, factor = 0.8 }, { up_to = 3.0, factor = 0.6 } ]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_rating_scale() {
        let c = EngineConfig {
            rating_scale_max: 0.0,
            ..EngineConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_all_zero_weights() {
        let c = EngineConfig {
            score_weights: ScoreWeights {
                return_weight: 0.0,
                rating_weight: 0.0,
            },
            ..EngineConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_negative_floor() {
        let c = EngineConfig {
            floor_percentage: -1.0,
            ..EngineConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = EngineConfig::from_toml("floor_percentage = \"high\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let c = EngineConfig::default();
        let s = toml::to_string(&c).unwrap();
        assert_eq!(EngineConfig::from_toml(&s).unwrap(), c);
    }
}
