//! Configuration for hybrid search.

use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{HybridQaError, Result};

/// Configuration for fusing lexical and semantic results.
///
/// `top_k` is both the number of candidates requested from each source and
/// the maximum number of fused results returned. The weights are linear
/// multipliers and are not required to sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Number of results requested from each source and returned overall.
    pub top_k: usize,
    /// Multiplier for lexical scores.
    pub lexical_weight: f32,
    /// Multiplier for negated semantic distances.
    pub semantic_weight: f32,
    /// Time budget for the lexical sub-search, in milliseconds.
    pub lexical_timeout_ms: u64,
    /// Time budget for the embed + vector sub-search, in milliseconds.
    pub semantic_timeout_ms: u64,
    /// What to do when one source fails.
    pub failure_policy: FailurePolicy,
    /// Per-source score normalization applied before weighting.
    pub normalization: ScoreNormalization,
    /// How documents returned by both sources are combined.
    pub duplicates: DuplicatePolicy,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            lexical_weight: 0.5,
            semantic_weight: 0.5,
            lexical_timeout_ms: 5_000,
            semantic_timeout_ms: 5_000,
            failure_policy: FailurePolicy::Degrade,
            normalization: ScoreNormalization::None,
            duplicates: DuplicatePolicy::KeepAll,
        }
    }
}

impl FusionConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of results.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the weights for lexical and semantic results.
    pub fn with_weights(mut self, lexical_weight: f32, semantic_weight: f32) -> Self {
        self.lexical_weight = lexical_weight;
        self.semantic_weight = semantic_weight;
        self
    }

    /// Set the same time budget for both sub-searches.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let millis = timeout.as_millis().min(u64::MAX as u128) as u64;
        self.lexical_timeout_ms = millis;
        self.semantic_timeout_ms = millis;
        self
    }

    /// Set the failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Set the normalization strategy.
    pub fn with_normalization(mut self, normalization: ScoreNormalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Set the duplicate handling policy.
    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    /// Time budget for the lexical sub-search.
    pub fn lexical_timeout(&self) -> Duration {
        Duration::from_millis(self.lexical_timeout_ms)
    }

    /// Time budget for the semantic sub-search.
    pub fn semantic_timeout(&self) -> Duration {
        Duration::from_millis(self.semantic_timeout_ms)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(HybridQaError::invalid_config(
                "top_k must be greater than 0",
            ));
        }

        if !self.lexical_weight.is_finite() {
            return Err(HybridQaError::invalid_config(format!(
                "lexical_weight must be a finite number, got {}",
                self.lexical_weight
            )));
        }

        if !self.semantic_weight.is_finite() {
            return Err(HybridQaError::invalid_config(format!(
                "semantic_weight must be a finite number, got {}",
                self.semantic_weight
            )));
        }

        if self.lexical_timeout_ms == 0 || self.semantic_timeout_ms == 0 {
            return Err(HybridQaError::invalid_config(
                "source timeouts must be greater than 0ms",
            ));
        }

        Ok(())
    }
}

/// Behaviour when a source is unavailable or times out.
///
/// Dimension mismatches are configuration faults and always fail the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Return the surviving source's results and log a warning.
    #[default]
    Degrade,
    /// Fail the whole query.
    FailFast,
}

/// Score normalization strategies applied per source before weighting.
///
/// `None` keeps the raw lexical score and the negated distance, which do not
/// share a scale. The other strategies change ranking outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreNormalization {
    /// No normalization - use raw scores.
    #[default]
    None,
    /// Min-max normalization to [0, 1] range.
    MinMax,
    /// Z-score normalization.
    ZScore,
    /// Rank-based normalization.
    Rank,
}

/// Handling of a document returned by both sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Keep one entry per source.
    #[default]
    KeepAll,
    /// Keep the first entry with the higher of the combined scores.
    Max,
    /// Keep the first entry with the sum of the combined scores.
    Sum,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fusion_config_default() {
        let config = FusionConfig::default();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.lexical_weight, 0.5);
        assert_eq!(config.semantic_weight, 0.5);
        assert_eq!(config.failure_policy, FailurePolicy::Degrade);
        assert_eq!(config.normalization, ScoreNormalization::None);
        assert_eq!(config.duplicates, DuplicatePolicy::KeepAll);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        let config = FusionConfig::new().with_top_k(0);
        assert!(matches!(
            config.validate(),
            Err(HybridQaError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite_weights() {
        for (lexical, semantic) in [(f32::NAN, 0.5), (0.5, f32::INFINITY), (f32::NEG_INFINITY, 0.0)] {
            let config = FusionConfig::new().with_weights(lexical, semantic);
            assert!(matches!(
                config.validate(),
                Err(HybridQaError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_weights_need_not_sum_to_one() {
        let config = FusionConfig::new().with_weights(2.0, 3.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = FusionConfig::new().with_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FusionConfig = serde_json::from_str(
            r#"{"top_k": 3, "failure_policy": "fail-fast", "normalization": "min-max"}"#,
        )
        .unwrap();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.lexical_weight, 0.5);
        assert_eq!(config.failure_policy, FailurePolicy::FailFast);
        assert_eq!(config.normalization, ScoreNormalization::MinMax);
        assert_eq!(config.semantic_timeout(), Duration::from_secs(5));
    }
}
