//! Deduplication of harmonized records
//!
//! Records are bucketed by DOI, arXiv ID or title fingerprint; within each
//! bucket a primary is chosen by source priority and the other members are
//! merged into it or kept, based on fingerprint similarity.

mod grouping;
mod normalization;
mod orchestration;
mod similarity;
mod stats;

pub use grouping::{group_records, Bucket, Buckets, GroupingKey, PreparedRecord};
pub use normalization::{normalize_arxiv_id, normalize_doi};
pub use orchestration::{deduplicate_records, DedupeOutcome, Deduplicator, MergeDecision};
#[cfg(feature = "rapidfuzz")]
pub use similarity::TokenSetRatio;
pub use similarity::{default_scorer, ScorerChoice, SimilarityScorer, SortedTokenRatio};
pub use stats::DedupeStats;
