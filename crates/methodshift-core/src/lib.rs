//! methodshift-core: record engine for the MethodShift corpus
//!
//! This library provides:
//! - Record validation and normalization for rows from any ingestion source
//! - Title fingerprinting and whitespace cleanup
//! - Deduplication by DOI, arXiv ID and fuzzy title match with
//!   source-priority primary selection
//! - Dictionary-based method tagging of deduplicated records
//!
//! Everything operates on in-memory records; fetching and persistence belong
//! to the callers.

pub mod config;
pub mod deduplication;
pub mod error;
pub mod record;
pub mod tagging;
pub mod text;

// Re-export main types for convenience
pub use config::{default_config_path, DedupeConfig};
pub use deduplication::{
    deduplicate_records, default_scorer, DedupeOutcome, DedupeStats, Deduplicator, GroupingKey,
    MergeDecision, ScorerChoice, SimilarityScorer, SortedTokenRatio,
};
#[cfg(feature = "rapidfuzz")]
pub use deduplication::TokenSetRatio;
pub use error::{ConfigError, MethodShiftError, Result, TaggingError, ValidationError};
pub use record::{
    validate, validate_table, validate_table_lenient, RawRecord, RawYear, Record, RejectedRow,
    ValidationReport,
};
pub use tagging::{tag_records, tag_text, MethodDictionary, TaggedRecord};
pub use text::{clean_text, fingerprint, fingerprint_title};

/// Returns the version of methodshift-core
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
