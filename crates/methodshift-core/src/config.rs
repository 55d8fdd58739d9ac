//! Configuration for methodshift-core
//!
//! Deduplication parameters: similarity threshold, fingerprint length, source
//! priority order and the similarity scorer to use.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::deduplication::ScorerChoice;
use crate::error::ConfigError;
use crate::text::DEFAULT_MAX_TOKENS;

/// Default minimum similarity for a fuzzy duplicate
pub const DEFAULT_SIMILARITY_THRESHOLD: u8 = 90;

/// Default source priority order (lower index = preferred primary)
pub const DEFAULT_SOURCE_PRIORITY: &[&str] =
    &["arxiv", "pubmed", "crossref", "openalex", "s2", "doaj"];

/// Deduplication configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupeConfig {
    /// Minimum score (0-100) for a bucket member to merge into the primary
    pub similarity_threshold: u8,
    /// Number of title tokens kept in a fingerprint
    pub max_fingerprint_tokens: usize,
    /// Source priority order; sources not listed rank last
    pub source_priority: Vec<String>,
    /// Similarity strategy
    pub scorer: ScorerChoice,
}

impl Default for DedupeConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_fingerprint_tokens: DEFAULT_MAX_TOKENS,
            source_priority: DEFAULT_SOURCE_PRIORITY.iter().map(|s| s.to_string()).collect(),
            scorer: ScorerChoice::Auto,
        }
    }
}

impl DedupeConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.similarity_threshold > 100 {
            return Err(ConfigError::OutOfRange(format!(
                "similarity_threshold must be between 0 and 100, got {}",
                self.similarity_threshold
            )));
        }

        if self.max_fingerprint_tokens == 0 {
            return Err(ConfigError::OutOfRange(
                "max_fingerprint_tokens must be positive".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for source in &self.source_priority {
            if !seen.insert(source.as_str()) {
                return Err(ConfigError::DuplicateSource(source.clone()));
            }
        }

        Ok(())
    }

    /// Rank of a source in the priority order; unlisted sources rank last
    pub fn source_rank(&self, source: &str) -> usize {
        self.source_priority
            .iter()
            .position(|s| s == source)
            .unwrap_or(self.source_priority.len())
    }
}

/// Default location of the config file: `<config dir>/methodshift/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("methodshift").join("config.toml"))
}
