//! Deduplication outcome counts

use std::fmt;

use serde::{Deserialize, Serialize};

/// Counts for one deduplication run
///
/// `unique + merged == total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupeStats {
    /// Input record count
    pub total: usize,
    /// Output record count
    pub unique: usize,
    /// Records dropped as duplicates
    pub merged: usize,
}

impl DedupeStats {
    pub(crate) fn from_counts(unique: usize, merged: usize) -> Self {
        Self {
            total: unique + merged,
            unique,
            merged,
        }
    }

    /// Fraction of input records that were merged away
    pub fn merge_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.merged as f64 / self.total as f64
        }
    }

    /// Emit the summary as a structured log event
    pub fn report(&self) {
        tracing::info!(
            total = self.total,
            unique = self.unique,
            merged = self.merged,
            "Deduplicated records: {}",
            self
        );
    }
}

impl fmt::Display for DedupeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={} unique={} merged={}",
            self.total, self.unique, self.merged
        )
    }
}
