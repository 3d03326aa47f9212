//! Serializable expander configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::embedding::{Device, EmbedderConfig};
use crate::error::{Result, TermweaveError};
use crate::synonym::MergePolicy;

use super::expander::validate_threshold;
use super::types::{ExpansionPolicy, MatchMode, SemanticMode};

/// Model used when none is configured; runs locally without network access.
pub const DEFAULT_MODEL: &str = "hashing-trigram";

/// Minimum cosine similarity for a semantic match.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.75;

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Construction parameters for [`TermExpander::from_config`](super::TermExpander::from_config).
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```
/// use termweave::expansion::ExpanderConfig;
///
/// let config: ExpanderConfig = serde_json::from_str(r#"{
///     "threshold": 0.8,
///     "custom_synonyms": {"boston": ["Beantown", "The Hub"]}
/// }"#).unwrap();
///
/// assert_eq!(config.model, "hashing-trigram");
/// assert_eq!(config.threshold, 0.8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpanderConfig {
    /// Embedding model identifier.
    pub model: String,
    /// Minimum cosine similarity for semantic matches.
    pub threshold: f32,
    pub device: Device,
    /// Extra mappings merged on top of the base table.
    pub custom_synonyms: BTreeMap<String, Vec<String>>,
    /// JSON synonym file merged on top of the base table.
    pub synonyms_file: Option<PathBuf>,
    /// Seed the table with the built-in synonyms.
    pub use_default_synonyms: bool,
    pub include_original: bool,
    pub match_mode: MatchMode,
    pub semantic_mode: SemanticMode,
    pub merge_policy: MergePolicy,
    /// API key for remote models; falls back to `OPENAI_API_KEY`.
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            device: Device::Cpu,
            custom_synonyms: BTreeMap::new(),
            synonyms_file: None,
            use_default_synonyms: true,
            include_original: true,
            match_mode: MatchMode::Exact,
            semantic_mode: SemanticMode::Fallback,
            merge_policy: MergePolicy::Append,
            api_key: None,
            api_base_url: None,
        }
    }
}

impl ExpanderConfig {
    /// Load configuration from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            TermweaveError::invalid_config(format!(
                "Failed to parse config {}: {e}",
                path.display()
            ))
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(TermweaveError::invalid_config("model must not be empty"));
        }
        validate_threshold(self.threshold)
    }

    /// The expansion switches carried by this configuration.
    pub fn policy(&self) -> ExpansionPolicy {
        ExpansionPolicy {
            match_mode: self.match_mode,
            semantic_mode: self.semantic_mode,
            include_original: self.include_original,
        }
    }

    /// Provider settings, resolving the API key from the environment if unset.
    pub fn embedder_config(&self) -> EmbedderConfig {
        let api_key = self
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok());

        EmbedderConfig {
            model: self.model.clone(),
            device: self.device,
            api_key,
            api_base_url: self.api_base_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExpanderConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.threshold, 0.75);
        assert!(config.use_default_synonyms);
        assert_eq!(config.policy(), ExpansionPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config: ExpanderConfig = serde_json::from_str(
            r#"{
                "model": "text-embedding-3-small",
                "device": "cuda",
                "semantic_mode": "off",
                "match_mode": "substring"
            }"#,
        )
        .unwrap();

        assert_eq!(config.device, Device::Gpu);
        assert_eq!(config.semantic_mode, SemanticMode::Disabled);
        assert_eq!(config.match_mode, MatchMode::Substring);
        assert_eq!(config.threshold, DEFAULT_SIMILARITY_THRESHOLD);
    }

    #[test]
    fn test_validate_threshold() {
        let config = ExpanderConfig {
            threshold: 1.5,
            ..ExpanderConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TermweaveError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let config = ExpanderConfig {
            api_key: Some("sk-explicit".to_string()),
            api_base_url: Some("http://localhost:1234/v1".to_string()),
            ..ExpanderConfig::default()
        };
        let embedder_config = config.embedder_config();
        assert_eq!(embedder_config.api_key.as_deref(), Some("sk-explicit"));
        assert_eq!(
            embedder_config.api_base_url.as_deref(),
            Some("http://localhost:1234/v1")
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"threshold": 0.9, "custom_synonyms": {{"boston": ["Beantown"]}}}}"#
        )
        .unwrap();

        let config = ExpanderConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.threshold, 0.9);
        assert_eq!(config.custom_synonyms["boston"], ["Beantown"]);
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        assert!(matches!(
            ExpanderConfig::load_from_file(file.path()),
            Err(TermweaveError::InvalidConfig(_))
        ));
    }
}
