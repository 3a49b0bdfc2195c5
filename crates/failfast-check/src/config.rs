//! Checker configuration.
//!
//! Holds the default epsilons used by approximate float comparison. The
//! document form is JSON; missing fields keep their defaults.

use serde::{Deserialize, Serialize};

use failfast_core::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    pub f32_absolute_epsilon: f32,
    pub f32_relative_epsilon: f32,
    pub f64_absolute_epsilon: f64,
    pub f64_relative_epsilon: f64,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        CheckerConfig {
            f32_absolute_epsilon: 0.00001,
            f32_relative_epsilon: 0.000001,
            f64_absolute_epsilon: 0.00001,
            f64_relative_epsilon: 0.000001,
        }
    }
}

impl CheckerConfig {
    /// Parses a JSON document. Negative epsilons are stored as their
    /// absolute value.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: CheckerConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Copy with every epsilon replaced by its absolute value.
    pub fn normalized(self) -> Self {
        CheckerConfig {
            f32_absolute_epsilon: self.f32_absolute_epsilon.abs(),
            f32_relative_epsilon: self.f32_relative_epsilon.abs(),
            f64_absolute_epsilon: self.f64_absolute_epsilon.abs(),
            f64_relative_epsilon: self.f64_relative_epsilon.abs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CheckerConfig::default();
        assert_eq!(config.f64_absolute_epsilon, 0.00001);
        assert_eq!(config.f64_relative_epsilon, 0.000001);
        assert_eq!(config.f32_absolute_epsilon, 0.00001);
        assert_eq!(config.f32_relative_epsilon, 0.000001);
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let config = CheckerConfig::from_json(r#"{ "f64_absolute_epsilon": -0.01 }"#).unwrap();
        assert_eq!(config.f64_absolute_epsilon, 0.01);
        assert_eq!(config.f64_relative_epsilon, 0.000001);
    }

    #[test]
    fn malformed_document() {
        let err = CheckerConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
