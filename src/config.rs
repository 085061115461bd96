//! Application configuration for the `hybridqa` binary.
//!
//! Loaded from an optional JSON file; every section falls back to its
//! defaults, so a file only needs the keys it changes:
//!
//! ```json
//! { "fusion": { "top_k": 3, "semantic_weight": 0.7 }, "semantic": { "dimension": 512 } }
//! ```

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{HybridQaError, Result};
use crate::hybrid_search::FusionConfig;
use crate::lexical::LexicalSourceConfig;
use crate::vector::DistanceMetric;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Fusion parameters.
    pub fusion: FusionConfig,
    /// In-memory lexical index settings.
    pub lexical: LexicalSourceConfig,
    /// Embedder and vector index settings.
    pub semantic: SemanticConfig,
    /// Interactive shell settings.
    pub shell: ShellConfig,
}

impl AppConfig {
    /// Load a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.fusion.validate()?;
        self.semantic.validate()
    }
}

/// Embedder and vector index settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticConfig {
    /// Embedding dimension of the hashing embedder.
    pub dimension: usize,
    /// Distance metric of the flat index.
    pub metric: DistanceMetric,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            dimension: 256,
            metric: DistanceMetric::SquaredEuclidean,
        }
    }
}

impl SemanticConfig {
    fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(HybridQaError::invalid_config(
                "semantic.dimension must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Interactive shell settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Prompt printed before each query.
    pub prompt: String,
    /// Input that ends the loop, compared case-insensitively.
    pub exit_token: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "Enter your question: ".to_string(),
            exit_token: "exit".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::lexical::Fuzziness;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"fusion": {{"top_k": 3}}, "lexical": {{"fuzziness": "off"}}}}"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.fusion.top_k, 3);
        assert_eq!(config.fusion.lexical_weight, 0.5);
        assert_eq!(config.lexical.fuzziness, Fuzziness::Off);
        assert_eq!(config.semantic, SemanticConfig::default());
        assert_eq!(config.shell.exit_token, "exit");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"semantic": {{"dimension": 0}}}}"#).unwrap();
        assert!(matches!(
            AppConfig::load(file.path()),
            Err(HybridQaError::InvalidConfig(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"fusion": {{"top_k": 0}}}}"#).unwrap();
        assert!(matches!(
            AppConfig::load(file.path()),
            Err(HybridQaError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::load("/nonexistent/hybridqa.json").unwrap_err();
        assert!(matches!(err, HybridQaError::Anyhow(_)));
        assert!(err.to_string().contains("failed to read config file"));
    }
}
