//! Primary selection and merge resolution
//!
//! Groups records into buckets by identifier or fingerprint, picks a primary
//! per bucket by source priority, then merges or retains every other member
//! depending on its fingerprint similarity to the primary.
//!
//! Output order: buckets in first-appearance order; within a bucket the
//! primary first, then retained members in input order. Running the resolver
//! on its own output reproduces that output.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::grouping::{group_records, Bucket, PreparedRecord};
use super::similarity::{default_scorer, SimilarityScorer};
use super::stats::DedupeStats;
use crate::config::DedupeConfig;
use crate::error::{ConfigError, ValidationError};
use crate::record::{validate_table, RawRecord, Record};

/// What happened to one non-primary bucket member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeDecision {
    /// Grouping key of the bucket (`doi:…`, `arxiv:…` or `fp:…`)
    pub key: String,
    pub primary_id: String,
    pub member_id: String,
    /// Fingerprint similarity between primary and member (0-100)
    pub score: u8,
    /// True when the member was dropped as a duplicate
    pub merged: bool,
}

/// Deduplicated records plus run statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DedupeOutcome {
    pub records: Vec<Record>,
    pub stats: DedupeStats,
    pub decisions: Vec<MergeDecision>,
}

/// Deduplication engine with an injected similarity scorer
#[derive(Debug, Clone)]
pub struct Deduplicator {
    config: DedupeConfig,
    scorer: Arc<dyn SimilarityScorer>,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self {
            config: DedupeConfig::default(),
            scorer: default_scorer(),
        }
    }
}

impl Deduplicator {
    /// Build an engine with an explicit scorer; the config is validated
    pub fn new(
        config: DedupeConfig,
        scorer: Arc<dyn SimilarityScorer>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, scorer })
    }

    /// Build an engine from a config, resolving its scorer choice
    pub fn from_config(config: DedupeConfig) -> Result<Self, ConfigError> {
        let scorer = config.scorer.resolve()?;
        Self::new(config, scorer)
    }

    pub fn config(&self) -> &DedupeConfig {
        &self.config
    }

    pub fn scorer(&self) -> &dyn SimilarityScorer {
        self.scorer.as_ref()
    }

    /// Validate rows (fail-fast), then deduplicate
    pub fn deduplicate(&self, rows: &[RawRecord]) -> Result<DedupeOutcome, ValidationError> {
        let records = validate_table(rows)?;
        Ok(self.deduplicate_records(records))
    }

    /// Deduplicate already-validated records.
    ///
    /// No validation happens here: records must come from [`validate`] or
    /// [`validate_table`] (or be this engine's own output). Use
    /// [`Deduplicator::deduplicate`] for raw rows.
    ///
    /// [`validate`]: crate::record::validate
    pub fn deduplicate_records(&self, records: Vec<Record>) -> DedupeOutcome {
        if records.is_empty() {
            return DedupeOutcome::default();
        }

        let total = records.len();
        let prepared: Vec<PreparedRecord> = records
            .into_iter()
            .map(|r| PreparedRecord::new(r, self.config.max_fingerprint_tokens))
            .collect();
        let buckets = group_records(&prepared);

        tracing::debug!(
            records = total,
            buckets = buckets.len(),
            scorer = self.scorer.name(),
            "Grouped records for deduplication"
        );

        let mut selected: Vec<usize> = Vec::with_capacity(buckets.len());
        let mut decisions: Vec<MergeDecision> = Vec::new();
        let mut merged = 0;

        for bucket in &buckets {
            let resolution = self.resolve_bucket(bucket, &prepared);
            selected.push(resolution.primary);
            selected.extend(resolution.retained);
            merged += resolution.decisions.iter().filter(|d| d.merged).count();
            decisions.extend(resolution.decisions);
        }

        // Move the survivors out in output order
        let mut slots: Vec<Option<PreparedRecord>> = prepared.into_iter().map(Some).collect();
        let records: Vec<Record> = selected
            .into_iter()
            .filter_map(|i| slots[i].take())
            .map(|p| p.record)
            .collect();

        let stats = DedupeStats::from_counts(records.len(), merged);
        debug_assert_eq!(stats.total, total);

        DedupeOutcome {
            records,
            stats,
            decisions,
        }
    }

    /// Index of the preferred member: lowest source rank, first wins ties
    fn select_primary(&self, members: &[usize], prepared: &[PreparedRecord]) -> usize {
        let mut primary = members[0];
        let mut best_rank = self.config.source_rank(&prepared[primary].record.source);
        for &index in &members[1..] {
            let rank = self.config.source_rank(&prepared[index].record.source);
            if rank < best_rank {
                primary = index;
                best_rank = rank;
            }
        }
        primary
    }

    fn resolve_bucket(&self, bucket: &Bucket, prepared: &[PreparedRecord]) -> BucketResolution {
        if bucket.members.len() == 1 {
            return BucketResolution {
                primary: bucket.members[0],
                retained: Vec::new(),
                decisions: Vec::new(),
            };
        }

        let primary = self.select_primary(&bucket.members, prepared);
        let primary_record = &prepared[primary];
        let key = bucket.key.to_string();

        let mut retained = Vec::new();
        let mut decisions = Vec::with_capacity(bucket.members.len() - 1);

        for &index in bucket.members.iter().filter(|&&i| i != primary) {
            let member = &prepared[index];
            let score = self
                .scorer
                .score(&primary_record.fingerprint, &member.fingerprint);
            let is_duplicate = score >= self.config.similarity_threshold;

            tracing::debug!(
                key = %key,
                primary = %primary_record.record.id,
                member = %member.record.id,
                score,
                merged = is_duplicate,
                "Resolved bucket member"
            );

            if !is_duplicate {
                retained.push(index);
            }
            decisions.push(MergeDecision {
                key: key.clone(),
                primary_id: primary_record.record.id.clone(),
                member_id: member.record.id.clone(),
                score,
                merged: is_duplicate,
            });
        }

        BucketResolution {
            primary,
            retained,
            decisions,
        }
    }
}

struct BucketResolution {
    primary: usize,
    retained: Vec<usize>,
    decisions: Vec<MergeDecision>,
}

/// Validate and deduplicate rows with the default configuration and scorer
pub fn deduplicate_records(rows: &[RawRecord]) -> Result<DedupeOutcome, ValidationError> {
    Deduplicator::default().deduplicate(rows)
}
