//! Derivation parameters

use crate::error::{KdfError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Universe sizes must be strictly larger than this (the seed's bit width).
pub const MIN_UNIVERSE_SIZE: usize = 256;

/// Parameters of one derivation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfConfig {
    /// Number of cells in the universe; > 256 and a multiple of 8
    pub universe_size: usize,
    /// Initial ChaCha20 block counter used for every injection
    pub keystream_position: u32,
    /// Entropy change below which the MetaRule is mutated
    pub stagnation_threshold: f64,
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self {
            universe_size: 1024,
            keystream_position: 1,
            stagnation_threshold: 0.1,
        }
    }
}

impl KdfConfig {
    pub fn with_size(universe_size: usize) -> Self {
        Self {
            universe_size,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.universe_size <= MIN_UNIVERSE_SIZE {
            return Err(KdfError::Validation(format!(
                "universe size must be greater than {}, got {}",
                MIN_UNIVERSE_SIZE, self.universe_size
            )));
        }
        if self.universe_size % 8 != 0 {
            return Err(KdfError::Validation(format!(
                "universe size must be a multiple of 8, got {}",
                self.universe_size
            )));
        }
        if !self.stagnation_threshold.is_finite() || self.stagnation_threshold < 0.0 {
            return Err(KdfError::Validation(format!(
                "stagnation threshold must be a finite non-negative number, got {}",
                self.stagnation_threshold
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| KdfError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| KdfError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = KdfConfig::default();
        assert_eq!(config.universe_size, 1024);
        assert_eq!(config.keystream_position, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_size_bounds() {
        assert!(KdfConfig::with_size(256).validate().is_err());
        assert!(KdfConfig::with_size(0).validate().is_err());
        assert!(KdfConfig::with_size(260).validate().is_err());
        assert!(KdfConfig::with_size(264).validate().is_ok());
    }

    #[test]
    fn test_threshold_must_be_finite() {
        let config = KdfConfig {
            stagnation_threshold: f64::NAN,
            ..KdfConfig::default()
        };
        assert!(matches!(config.validate(), Err(KdfError::Validation(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = KdfConfig::from_json(r#"{ "universe_size": 512 }"#).unwrap();
        assert_eq!(config.universe_size, 512);
        assert_eq!(config.keystream_position, 1);
        assert_eq!(config.stagnation_threshold, 0.1);
    }

    #[test]
    fn test_json_errors() {
        assert!(matches!(KdfConfig::from_json("not json"), Err(KdfError::Config(_))));
        assert!(matches!(
            KdfConfig::from_json(r#"{ "universe_size": 100 }"#),
            Err(KdfError::Validation(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            KdfConfig::load("/nonexistent/caultron.json"),
            Err(KdfError::Config(_))
        ));
    }
}
