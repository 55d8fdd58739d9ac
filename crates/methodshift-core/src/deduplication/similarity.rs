//! Similarity scoring for deduplication
//!
//! Two strategies compare title fingerprints on a 0–100 integer scale:
//!
//! - [`TokenSetRatio`]: order-independent token-set overlap (needs the
//!   `rapidfuzz` feature)
//! - [`SortedTokenRatio`]: sorted unique tokens compared by longest common
//!   subsequence, always available
//!
//! The process-wide default is chosen once from the compiled features and
//! never changes afterwards. Resolvers take the scorer explicitly so tests
//! can substitute either strategy.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A symmetric string similarity measure on a 0–100 scale
pub trait SimilarityScorer: Send + Sync {
    /// Score two fingerprints; `score(a, b) == score(b, a)`
    fn score(&self, a: &str, b: &str) -> u8;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

impl fmt::Debug for dyn SimilarityScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SimilarityScorer({})", self.name())
    }
}

/// Token-set ratio: compares the shared tokens against each side's leftovers.
///
/// A fingerprint whose tokens are a subset of the other's scores 100.
#[cfg(feature = "rapidfuzz")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSetRatio;

#[cfg(feature = "rapidfuzz")]
impl SimilarityScorer for TokenSetRatio {
    fn score(&self, a: &str, b: &str) -> u8 {
        let tokens_a = token_set(a);
        let tokens_b = token_set(b);
        if tokens_a.is_empty() || tokens_b.is_empty() {
            return 0;
        }

        let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
        let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
        let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

        if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
            return 100;
        }

        let diff_ab_joined = diff_ab.join(" ");
        let diff_ba_joined = diff_ba.join(" ");
        let mut best =
            rapidfuzz::fuzz::ratio(diff_ab_joined.chars(), diff_ba_joined.chars()) * 100.0;

        let sect_len = char_len(&intersection.join(" "));
        if sect_len > 0 {
            // "sect" vs "sect diff": the indel distance is the separator plus the diff
            let ab_dist = 1 + char_len(&diff_ab_joined);
            let ba_dist = 1 + char_len(&diff_ba_joined);
            best = best
                .max(indel_ratio(ab_dist, sect_len, sect_len + ab_dist))
                .max(indel_ratio(ba_dist, sect_len, sect_len + ba_dist));
        }

        truncate_score(best)
    }

    fn name(&self) -> &'static str {
        "token-set"
    }
}

/// Sorted-token LCS ratio: `2 * lcs / (len(a) + len(b))` over the sorted,
/// de-duplicated token strings.
///
/// Two empty fingerprints score 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortedTokenRatio;

impl SimilarityScorer for SortedTokenRatio {
    fn score(&self, a: &str, b: &str) -> u8 {
        let norm_a: Vec<char> = sorted_tokens(a).chars().collect();
        let norm_b: Vec<char> = sorted_tokens(b).chars().collect();

        let total = norm_a.len() + norm_b.len();
        if total == 0 {
            return 100;
        }

        let lcs = longest_common_subsequence(&norm_a, &norm_b);
        truncate_score(200.0 * lcs as f64 / total as f64)
    }

    fn name(&self) -> &'static str {
        "sorted-tokens"
    }
}

/// Which scorer a run should use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScorerChoice {
    /// The process default: token-set when available, otherwise sorted-tokens
    #[default]
    Auto,
    TokenSet,
    SortedTokens,
}

impl ScorerChoice {
    /// Resolve the choice into a scorer instance
    pub fn resolve(self) -> Result<Arc<dyn SimilarityScorer>, ConfigError> {
        match self {
            ScorerChoice::Auto => Ok(default_scorer()),
            ScorerChoice::SortedTokens => Ok(Arc::new(SortedTokenRatio)),
            ScorerChoice::TokenSet => token_set_scorer(),
        }
    }
}

impl fmt::Display for ScorerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScorerChoice::Auto => "auto",
            ScorerChoice::TokenSet => "token-set",
            ScorerChoice::SortedTokens => "sorted-tokens",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ScorerChoice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(ScorerChoice::Auto),
            "token-set" | "token_set" => Ok(ScorerChoice::TokenSet),
            "sorted-tokens" | "sorted_tokens" => Ok(ScorerChoice::SortedTokens),
            other => Err(ConfigError::Parse(format!("unknown scorer '{}'", other))),
        }
    }
}

lazy_static! {
    static ref DEFAULT_SCORER: Arc<dyn SimilarityScorer> = {
        let scorer = select_default_scorer();
        tracing::debug!(scorer = scorer.name(), "Selected default similarity scorer");
        scorer
    };
}

/// The process-wide default scorer, resolved once on first use
pub fn default_scorer() -> Arc<dyn SimilarityScorer> {
    Arc::clone(&DEFAULT_SCORER)
}

#[cfg(feature = "rapidfuzz")]
fn select_default_scorer() -> Arc<dyn SimilarityScorer> {
    Arc::new(TokenSetRatio)
}

#[cfg(not(feature = "rapidfuzz"))]
fn select_default_scorer() -> Arc<dyn SimilarityScorer> {
    Arc::new(SortedTokenRatio)
}

#[cfg(feature = "rapidfuzz")]
fn token_set_scorer() -> Result<Arc<dyn SimilarityScorer>, ConfigError> {
    Ok(Arc::new(TokenSetRatio))
}

#[cfg(not(feature = "rapidfuzz"))]
fn token_set_scorer() -> Result<Arc<dyn SimilarityScorer>, ConfigError> {
    Err(ConfigError::UnavailableScorer(
        "token-set scoring requires the `rapidfuzz` feature".to_string(),
    ))
}

fn token_set(text: &str) -> BTreeSet<&str> {
    text.split_whitespace().collect()
}

fn sorted_tokens(text: &str) -> String {
    token_set(text).into_iter().collect::<Vec<_>>().join(" ")
}

#[cfg(feature = "rapidfuzz")]
fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(feature = "rapidfuzz")]
fn indel_ratio(dist: usize, len_a: usize, len_b: usize) -> f64 {
    let total = len_a + len_b;
    if total == 0 {
        return 100.0;
    }
    100.0 * (1.0 - dist as f64 / total as f64)
}

fn truncate_score(score: f64) -> u8 {
    score.clamp(0.0, 100.0) as u8
}

/// Two-row dynamic programming LCS length
fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
