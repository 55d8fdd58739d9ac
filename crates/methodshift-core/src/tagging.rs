//! Dictionary-based method tagging
//!
//! A method dictionary maps a method name to the phrases that signal it. A
//! record is tagged with every method whose phrase occurs in its title or
//! abstract, case-insensitively.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::error::TaggingError;
use crate::record::Record;
use crate::text::clean_text;

/// Method name -> lowercase match phrases
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodDictionary {
    methods: BTreeMap<String, Vec<String>>,
}

impl MethodDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML mapping of method name to phrase list
    pub fn from_yaml_str(yaml: &str) -> Result<Self, TaggingError> {
        let raw: BTreeMap<String, Vec<String>> = serde_yaml::from_str(yaml)?;
        let mut dictionary = Self::new();
        for (method, phrases) in raw {
            dictionary.add(&method, phrases.iter().map(String::as_str));
        }
        Ok(dictionary)
    }

    /// Load a YAML dictionary file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TaggingError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Add phrases for a method.
    ///
    /// Phrases are folded to lowercase but keep surrounding spaces, so
    /// `" ols "` only matches the standalone word.
    pub fn add<'a>(&mut self, method: &str, phrases: impl IntoIterator<Item = &'a str>) {
        let entry = self.methods.entry(method.to_string()).or_default();
        for phrase in phrases {
            let folded = fold(phrase);
            if !folded.trim().is_empty() && !entry.contains(&folded) {
                entry.push(folded);
            }
        }
    }

    pub fn phrases(&self, method: &str) -> Option<&[String]> {
        self.methods.get(method).map(Vec::as_slice)
    }

    /// Method names in sorted order
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// A record with its detected methods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedRecord {
    #[serde(flatten)]
    pub record: Record,
    /// Sorted method names
    pub methods: Vec<String>,
}

/// Methods whose phrases occur in `text`
pub fn tag_text(text: &str, dictionary: &MethodDictionary) -> BTreeSet<String> {
    let haystack = fold(text);
    dictionary
        .methods
        .iter()
        .filter(|(_, phrases)| phrases.iter().any(|p| haystack.contains(p.as_str())))
        .map(|(method, _)| method.clone())
        .collect()
}

/// Tag each record from its title and abstract
pub fn tag_records(records: &[Record], dictionary: &MethodDictionary) -> Vec<TaggedRecord> {
    let tagged: Vec<TaggedRecord> = records
        .iter()
        .map(|record| {
            let corpus = [Some(record.title.as_str()), record.abstract_text.as_deref()]
                .into_iter()
                .flatten()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            let hits = tag_text(&clean_text(Some(&corpus)), dictionary);
            TaggedRecord {
                record: record.clone(),
                methods: hits.into_iter().collect(),
            }
        })
        .collect();

    tracing::debug!(
        records = tagged.len(),
        tagged = tagged.iter().filter(|t| !t.methods.is_empty()).count(),
        "Tagged records"
    );
    tagged
}

fn fold(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}
