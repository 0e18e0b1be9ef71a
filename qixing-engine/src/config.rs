use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

pub const BASE_SCORE: f64 = 100.0;
pub const FREQUENCY_WEIGHT: f64 = 100.0;
pub const STREAK_CAP: u32 = 20;
pub const STREAK_WEIGHT: f64 = 2.0;
pub const REPEAT_PENALTY: f64 = 20.0;
pub const BALANCE_BONUS: f64 = 10.0;
pub const BALANCE_THRESHOLD: f64 = 0.4;
pub const MOD3_WEIGHT: f64 = 50.0;
pub const SPAN_WEIGHT: f64 = 50.0;
pub const SPAN_FALLBACK: f64 = 0.1;
pub const SAME_PERIOD_WEIGHT: f64 = 50.0;
pub const SCORE_DIVISOR: f64 = 5.0;
pub const MAX_SCORE: f64 = 100.0;

/// Fixed weights of the linear scoring heuristic. Every adjustment is added
/// to a running total that is divided by `divisor` once at the end, so a
/// weight's influence is relative to that divisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub base: f64,
    pub frequency: f64,
    pub streak_cap: u32,
    pub streak: f64,
    pub repeat_penalty: f64,
    pub big_small_bonus: f64,
    pub big_small_threshold: f64,
    pub odd_even_bonus: f64,
    pub odd_even_threshold: f64,
    pub mod3: f64,
    pub span: f64,
    pub span_fallback: f64,
    pub same_period: f64,
    pub divisor: f64,
    pub max_score: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            base: BASE_SCORE,
            frequency: FREQUENCY_WEIGHT,
            streak_cap: STREAK_CAP,
            streak: STREAK_WEIGHT,
            repeat_penalty: REPEAT_PENALTY,
            big_small_bonus: BALANCE_BONUS,
            big_small_threshold: BALANCE_THRESHOLD,
            odd_even_bonus: BALANCE_BONUS,
            odd_even_threshold: BALANCE_THRESHOLD,
            mod3: MOD3_WEIGHT,
            span: SPAN_WEIGHT,
            span_fallback: SPAN_FALLBACK,
            same_period: SAME_PERIOD_WEIGHT,
            divisor: SCORE_DIVISOR,
            max_score: MAX_SCORE,
        }
    }
}

impl ScoringWeights {
    pub fn load(path: &Path) -> Result<Self> {
        let config_err = |source: Box<dyn std::error::Error + Send + Sync>| EngineError::Config {
            path: path.to_path_buf(),
            source,
        };
        let json = std::fs::read_to_string(path).map_err(|e| config_err(e.into()))?;
        let weights: ScoringWeights = serde_json::from_str(&json).map_err(|e| config_err(e.into()))?;
        if weights.divisor <= 0.0 || weights.max_score <= 0.0 {
            return Err(config_err("divisor and max_score must be positive".into()));
        }
        Ok(weights)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let config_err = |source: Box<dyn std::error::Error + Send + Sync>| EngineError::Config {
            path: path.to_path_buf(),
            source,
        };
        let json = serde_json::to_string_pretty(self).map_err(|e| config_err(e.into()))?;
        std::fs::write(path, json).map_err(|e| config_err(e.into()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.base, 100.0);
        assert_eq!(weights.streak_cap, 20);
        assert_eq!(weights.divisor, 5.0);
        assert!((weights.big_small_threshold - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.json");
        let mut weights = ScoringWeights::default();
        weights.span = 25.0;
        weights.save(&path).unwrap();
        assert_eq!(ScoringWeights::load(&path).unwrap(), weights);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.json");
        std::fs::write(&path, r#"{ "repeat_penalty": 5.0 }"#).unwrap();
        let weights = ScoringWeights::load(&path).unwrap();
        assert_eq!(weights.repeat_penalty, 5.0);
        assert_eq!(weights.frequency, FREQUENCY_WEIGHT);
    }

    #[test]
    fn test_rejects_zero_divisor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.json");
        std::fs::write(&path, r#"{ "divisor": 0.0 }"#).unwrap();
        assert!(matches!(ScoringWeights::load(&path), Err(EngineError::Config { .. })));
    }

    #[test]
    fn test_missing_file() {
        let err = ScoringWeights::load(Path::new("/nonexistent/weights.json")).unwrap_err();
        assert!(err.to_string().contains("weights.json"));
    }
}
