//! Tunable rules loaded from TOML.
//!
//! ```toml
//! [psychology]
//! default_trust_threshold = 10
//! crack_multiplier = 5.0
//!
//! [clock]
//! start_minutes = 480
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from loading a rules file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// NPC psychology tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsychologyConfig {
    /// Trust distance from zero at which an NPC turns friendly or hostile.
    pub default_trust_threshold: i32,

    /// Crack threshold as a multiple of the trust threshold.
    pub crack_multiplier: f64,
}

impl Default for PsychologyConfig {
    fn default() -> Self {
        Self {
            default_trust_threshold: 10,
            crack_multiplier: 5.0,
        }
    }
}

/// Clock settings for a new game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Minutes since the start of day 0 when play begins.
    pub start_minutes: u64,
}

/// All tunable rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub psychology: PsychologyConfig,
    pub clock: ClockConfig,
}

impl RulesConfig {
    /// Parse a rules config from TOML text. Missing sections use defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a rules config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let psychology = &self.psychology;
        if psychology.default_trust_threshold <= 0 {
            return Err(ConfigError::Invalid {
                field: "psychology.default_trust_threshold",
                reason: format!("must be positive, got {}", psychology.default_trust_threshold),
            });
        }
        if !(psychology.crack_multiplier.is_finite() && psychology.crack_multiplier > 0.0) {
            return Err(ConfigError::Invalid {
                field: "psychology.crack_multiplier",
                reason: format!("must be a positive number, got {}", psychology.crack_multiplier),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = RulesConfig::from_toml_str("").unwrap();
        assert_eq!(config, RulesConfig::default());
        assert_eq!(config.psychology.default_trust_threshold, 10);
    }

    #[test]
    fn test_partial_override() {
        let config = RulesConfig::from_toml_str(
            r#"
            [psychology]
            crack_multiplier = 3.0

            [clock]
            start_minutes = 480
            "#,
        )
        .unwrap();

        assert_eq!(config.psychology.default_trust_threshold, 10);
        assert!((config.psychology.crack_multiplier - 3.0).abs() < 1e-9);
        assert_eq!(config.clock.start_minutes, 480);
    }

    #[test]
    fn test_rejects_non_positive_threshold() {
        let result = RulesConfig::from_toml_str("[psychology]\ndefault_trust_threshold = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let result = RulesConfig::from_toml_str("[psychology\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
