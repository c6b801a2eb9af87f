use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::engine::evaluator::ScoringPolicy;
use crate::error::{Error, Result};

pub const DEFAULT_MAX_ATTEMPTS: usize = 100_000;
pub const DEFAULT_MAX_FAILURE_RATIO: f64 = 0.5;

/// Settings of one search run. Every field has a default, so an empty JSON
/// object is a valid config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    /// Number of trials to run.
    pub max_attempts: usize,

    /// Base seed for camper shuffling. Random when absent.
    pub seed: Option<u64>,
    pub threads: usize,
    pub time_limit_secs: Option<u64>,

    /// Share of failed trials above which the run is rejected.
    pub max_failure_ratio: f64,
    pub balance_required_classes: bool,

    /// Percent of progress between two observer callbacks.
    pub progress_step: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            seed: None,
            threads: 1,
            time_limit_secs: None,
            max_failure_ratio: DEFAULT_MAX_FAILURE_RATIO,
            balance_required_classes: true,
            progress_step: 1.0,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig("maxAttempts must be at least 1".to_string()));
        }
        if self.threads == 0 {
            return Err(Error::InvalidConfig("threads must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.max_failure_ratio) {
            return Err(Error::InvalidConfig(format!("maxFailureRatio must lie in [0, 1], got {}", self.max_failure_ratio)));
        }
        if !self.progress_step.is_finite() || self.progress_step < 0.0 {
            return Err(Error::InvalidConfig(format!("progressStep must be a non-negative number, got {}", self.progress_step)));
        }
        Ok(())
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs.map(Duration::from_secs)
    }

    pub fn scoring_policy(&self) -> ScoringPolicy {
        ScoringPolicy { balance_required_classes: self.balance_required_classes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_yields_defaults() {
        let config: SearchConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SearchConfig::default());
        assert_eq!(config.max_attempts, 100_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_overrides_fields() {
        let config: SearchConfig = serde_json::from_str(r#"{"maxAttempts": 50, "seed": 7, "timeLimitSecs": 2}"#).unwrap();

        assert_eq!(config.max_attempts, 50);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.time_limit(), Some(Duration::from_secs(2)));
        assert_eq!(config.threads, 1);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let zero_attempts = SearchConfig { max_attempts: 0, ..SearchConfig::default() };
        let zero_threads = SearchConfig { threads: 0, ..SearchConfig::default() };
        let bad_ratio = SearchConfig { max_failure_ratio: 1.5, ..SearchConfig::default() };

        assert!(matches!(zero_attempts.validate(), Err(Error::InvalidConfig(_))));
        assert!(matches!(zero_threads.validate(), Err(Error::InvalidConfig(_))));
        assert!(matches!(bad_ratio.validate(), Err(Error::InvalidConfig(_))));
    }
}
