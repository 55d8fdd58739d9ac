//! Blocking: partition records into duplicate-candidate buckets
//!
//! Keys are chosen by identifier priority: DOI, then arXiv ID, then the title
//! fingerprint. Identifier keys are exact; the fingerprint key is only a weak
//! heuristic and the resolver re-checks it with similarity scoring.

use std::collections::HashMap;
use std::fmt;

use super::normalization::{normalize_arxiv_id, normalize_doi};
use crate::record::Record;
use crate::text::fingerprint;

/// Derived grouping key for one record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupingKey {
    Doi(String),
    Arxiv(String),
    Fingerprint(String),
}

impl GroupingKey {
    /// Whether the key comes from an exact identifier
    pub fn is_identifier(&self) -> bool {
        !matches!(self, GroupingKey::Fingerprint(_))
    }
}

impl fmt::Display for GroupingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupingKey::Doi(doi) => write!(f, "doi:{}", doi),
            GroupingKey::Arxiv(id) => write!(f, "arxiv:{}", id),
            GroupingKey::Fingerprint(fp) => write!(f, "fp:{}", fp),
        }
    }
}

/// A validated record with its precomputed comparison data
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRecord {
    pub record: Record,
    pub normalized_doi: Option<String>,
    pub fingerprint: String,
}

impl PreparedRecord {
    pub fn new(record: Record, max_tokens: usize) -> Self {
        let normalized_doi = normalize_doi(record.doi.as_deref());
        let fingerprint = fingerprint(&record.title, max_tokens);
        Self {
            record,
            normalized_doi,
            fingerprint,
        }
    }

    /// Grouping key by priority: DOI > arXiv ID > fingerprint
    pub fn grouping_key(&self) -> GroupingKey {
        if let Some(doi) = &self.normalized_doi {
            return GroupingKey::Doi(doi.clone());
        }
        if let Some(arxiv) = normalize_arxiv_id(self.record.arxiv_id.as_deref()) {
            return GroupingKey::Arxiv(arxiv);
        }
        GroupingKey::Fingerprint(self.fingerprint.clone())
    }
}

/// One bucket: a key and the input indices that share it, in input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub key: GroupingKey,
    pub members: Vec<usize>,
}

/// Insertion-ordered map from grouping key to bucket
///
/// Buckets iterate in the order their key first appeared.
#[derive(Debug, Clone, Default)]
pub struct Buckets {
    slots: HashMap<GroupingKey, usize>,
    buckets: Vec<Bucket>,
}

impl Buckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an index to the bucket for `key`, creating it if needed
    pub fn insert(&mut self, key: GroupingKey, index: usize) {
        match self.slots.get(&key) {
            Some(&slot) => self.buckets[slot].members.push(index),
            None => {
                self.slots.insert(key.clone(), self.buckets.len());
                self.buckets.push(Bucket {
                    key,
                    members: vec![index],
                });
            }
        }
    }

    pub fn get(&self, key: &GroupingKey) -> Option<&Bucket> {
        self.slots.get(key).map(|&slot| &self.buckets[slot])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bucket> {
        self.buckets.iter()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl<'a> IntoIterator for &'a Buckets {
    type Item = &'a Bucket;
    type IntoIter = std::slice::Iter<'a, Bucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.iter()
    }
}

/// Bucket prepared records by grouping key
pub fn group_records(records: &[PreparedRecord]) -> Buckets {
    let mut buckets = Buckets::new();
    for (index, record) in records.iter().enumerate() {
        buckets.insert(record.grouping_key(), index);
    }
    buckets
}
