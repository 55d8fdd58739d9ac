//! Deduplication integration tests
//!
//! Covers primary selection, merge decisions and the run-level properties
//! (conservation, idempotence) with both similarity scorers.

mod common;

use std::sync::Arc;

use common::{arxiv_row, doi_row, mixed_corpus, row};
use methodshift_core::deduplication::{DedupeStats, Deduplicator, SimilarityScorer};
use methodshift_core::{
    deduplicate_records, fingerprint_title, validate, DedupeConfig, RawRecord, SortedTokenRatio,
};
use proptest::prelude::*;
use rstest::rstest;

fn engine(scorer: Arc<dyn SimilarityScorer>) -> Deduplicator {
    Deduplicator::new(DedupeConfig::default(), scorer).unwrap()
}

fn scorers() -> Vec<Arc<dyn SimilarityScorer>> {
    let mut scorers: Vec<Arc<dyn SimilarityScorer>> = vec![Arc::new(SortedTokenRatio)];
    #[cfg(feature = "rapidfuzz")]
    scorers.push(Arc::new(methodshift_core::TokenSetRatio));
    scorers
}

// === Identifier-Based Deduplication ===

#[test]
fn test_doi_priority_keeps_crossref_over_openalex() {
    let rows = vec![
        doi_row("doi:10.1/abc", "openalex", "Bayesian methods in ecology", "10.1/abc"),
        doi_row("doi:10.1/abc", "crossref", "Bayesian methods in ecology", "10.1/abc"),
    ];
    let outcome = deduplicate_records(&rows).unwrap();
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.stats.unique, 1);
    assert_eq!(outcome.records[0].source, "crossref");
}

#[rstest]
#[case("openalex", "crossref", "crossref")]
#[case("doaj", "arxiv", "arxiv")]
#[case("s2", "pubmed", "pubmed")]
#[case("arxiv", "crossref", "arxiv")]
#[case("unlisted", "doaj", "doaj")]
#[case("unlisted", "other", "unlisted")]
fn test_primary_source_by_priority(#[case] first: &str, #[case] second: &str, #[case] winner: &str) {
    let rows = vec![
        doi_row("1", first, "Shared Title", "10.5/shared"),
        doi_row("2", second, "Shared Title", "10.5/shared"),
    ];
    let outcome = deduplicate_records(&rows).unwrap();
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].source, winner);
}

#[test]
fn test_doi_normalization_groups_variants() {
    let rows = vec![
        doi_row("1", "s2", "Paper", "10.1234/ABC"),
        doi_row("2", "crossref", "Paper", "  https://doi.org/10.1234/abc "),
    ];
    let outcome = deduplicate_records(&rows).unwrap();
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.decisions[0].key, "doi:10.1234/abc");
}

#[test]
fn test_doi_outranks_arxiv_key() {
    // The DOI row never joins the arXiv bucket even with the same arXiv ID
    let rows = vec![
        arxiv_row("1", "arxiv", "Paper", "2301.00001"),
        arxiv_row("2", "crossref", "Paper", "2301.00001").with_doi("10.1/p"),
    ];
    let outcome = deduplicate_records(&rows).unwrap();
    assert_eq!(outcome.records.len(), 2);
    assert!(outcome.decisions.is_empty());
}

#[test]
fn test_mixed_corpus() {
    let outcome = deduplicate_records(&mixed_corpus()).unwrap();
    let ids: Vec<&str> = outcome.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["cr-1", "ax-1", "pm-1", "oa-2"]);
    assert_eq!(outcome.stats, DedupeStats { total: 7, unique: 4, merged: 3 });
}

// === Fingerprint Blocking ===

#[test]
fn test_fingerprint_case_insensitive() {
    let fp1 = fingerprint_title("Bayesian Inference for Logistic Regression");
    let fp2 = fingerprint_title("bayesian inference for logistic regression");
    assert_eq!(fp1, fp2);
    assert_eq!(fp1.split_whitespace().next(), Some("bayesian"));
}

#[test]
fn test_pass_through_unique_record() {
    let rows = vec![
        row("solo", "doaj", "An Entirely Unique Title"),
        doi_row("d1", "crossref", "Other", "10.1/o"),
        doi_row("d2", "openalex", "Other", "10.1/o"),
    ];
    let expected = validate(&rows[0]).unwrap();
    let outcome = deduplicate_records(&rows).unwrap();
    assert_eq!(outcome.records[0], expected);
    assert!(outcome.decisions.iter().all(|d| d.member_id != "solo" && d.primary_id != "solo"));
}

#[test]
fn test_weak_match_rejection_in_identifier_bucket() {
    // Shared arXiv ID but unrelated fingerprints: both survive
    for scorer in scorers() {
        let rows = vec![
            arxiv_row("1", "arxiv", "Quantum error correction codes", "2301.99999"),
            arxiv_row("2", "s2", "Hierarchical bayesian ecology", "2301.99999"),
        ];
        let outcome = engine(scorer.clone()).deduplicate(&rows).unwrap();
        assert_eq!(outcome.records.len(), 2, "scorer {}", scorer.name());
        assert_eq!(outcome.stats.merged, 0);
        assert!(!outcome.decisions[0].merged);
    }
}

#[test]
fn test_weak_match_rejection_below_threshold() {
    // Identical fingerprints clear even the strictest threshold; a low score keeps both
    let rows = vec![row("1", "arxiv", "Same Title"), row("2", "s2", "same title")];
    let mut config = DedupeConfig::default();
    config.similarity_threshold = 100;
    let strict = Deduplicator::new(config.clone(), Arc::new(SortedTokenRatio)).unwrap();
    assert_eq!(strict.deduplicate(&rows).unwrap().records.len(), 1);

    struct Pessimist;
    impl SimilarityScorer for Pessimist {
        fn score(&self, _: &str, _: &str) -> u8 {
            10
        }
        fn name(&self) -> &'static str {
            "pessimist"
        }
    }
    let outcome = Deduplicator::new(config, Arc::new(Pessimist))
        .unwrap()
        .deduplicate(&rows)
        .unwrap();
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.decisions[0].score, 10);
}

// === Configuration ===

#[test]
fn test_max_fingerprint_tokens_controls_blocking() {
    let rows = vec![
        row("1", "arxiv", "Sparse regression for genomic prediction"),
        row("2", "s2", "Sparse regression under measurement error"),
    ];
    let outcome = engine(Arc::new(SortedTokenRatio)).deduplicate(&rows).unwrap();
    assert_eq!(outcome.records.len(), 2);
    assert!(outcome.decisions.is_empty());

    // Two-token fingerprints put both titles in the "sparse regression" bucket
    let mut config = DedupeConfig::default();
    config.max_fingerprint_tokens = 2;
    let short = Deduplicator::new(config, Arc::new(SortedTokenRatio)).unwrap();
    let outcome = short.deduplicate(&rows).unwrap();
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].id, "1");
    assert_eq!(outcome.decisions[0].key, "fp:sparse regression");
    assert!(outcome.decisions[0].merged);
}

#[test]
fn test_custom_source_priority_changes_primary() {
    let rows = vec![
        doi_row("ax", "arxiv", "Shared Title", "10.7/p"),
        doi_row("s2", "s2", "Shared Title", "10.7/p"),
    ];
    let outcome = engine(Arc::new(SortedTokenRatio)).deduplicate(&rows).unwrap();
    assert_eq!(outcome.records[0].id, "ax");

    let mut config = DedupeConfig::default();
    config.source_priority = vec!["s2".to_string(), "arxiv".to_string()];
    let reordered = Deduplicator::new(config, Arc::new(SortedTokenRatio)).unwrap();
    let outcome = reordered.deduplicate(&rows).unwrap();
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].id, "s2");
    assert_eq!(outcome.decisions[0].primary_id, "s2");
}

// === Concurrency ===

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_engine_is_send_and_sync() {
    assert_send_sync::<Deduplicator>();
    assert_send_sync::<Arc<dyn SimilarityScorer>>();
}

#[test]
fn test_concurrent_runs_match_sequential() {
    let corpora: Vec<Vec<RawRecord>> = vec![
        mixed_corpus(),
        mixed_corpus().into_iter().rev().collect(),
        vec![
            doi_row("a", "s2", "Graph networks", "10.9/a"),
            doi_row("b", "pubmed", "Graph Networks", "10.9/A"),
            row("c", "doaj", "Protein folding"),
        ],
        Vec::new(),
    ];
    let expected: Vec<_> = corpora
        .iter()
        .map(|rows| Deduplicator::default().deduplicate(rows).unwrap())
        .collect();
    let default = methodshift_core::default_scorer();
    let shared = &default;

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = corpora
            .iter()
            .map(|rows| {
                scope.spawn(move || {
                    let scorer = methodshift_core::default_scorer();
                    let outcome = Deduplicator::default().deduplicate(rows).unwrap();
                    (Arc::ptr_eq(&scorer, shared), outcome)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for ((same_scorer, outcome), expected) in results.into_iter().zip(expected) {
        assert!(same_scorer);
        assert_eq!(outcome, expected);
    }
}

#[test]
fn test_shared_engine_across_threads() {
    let engine = Deduplicator::default();
    let corpus = mixed_corpus();
    let expected = engine.deduplicate(&corpus).unwrap();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                assert_eq!(engine.deduplicate(&corpus).unwrap(), expected);
            });
        }
    });
}

// === Empty Titles (degenerate fingerprint) ===

#[cfg(feature = "rapidfuzz")]
#[test]
fn test_empty_titles_retained_with_token_set() {
    let rows = vec![row("1", "arxiv", ""), row("2", "s2", "  ")];
    let outcome = engine(Arc::new(methodshift_core::TokenSetRatio))
        .deduplicate(&rows)
        .unwrap();
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.decisions[0].key, "fp:");
    assert_eq!(outcome.decisions[0].score, 0);
}

#[test]
fn test_empty_titles_merge_with_sorted_tokens() {
    let rows = vec![row("1", "arxiv", ""), row("2", "s2", "?!")];
    let outcome = engine(Arc::new(SortedTokenRatio)).deduplicate(&rows).unwrap();
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].id, "1");
    assert_eq!(outcome.decisions[0].score, 100);
}

// === Scoring ===

proptest! {
    #[test]
    fn test_self_similarity(title in "[a-zA-Z]{1,8}( [a-zA-Z]{1,8}){0,6}") {
        let fp = fingerprint_title(&title);
        for scorer in scorers() {
            prop_assert_eq!(scorer.score(&fp, &fp), 100, "scorer {}", scorer.name());
        }
    }

    #[test]
    fn test_score_symmetric(a in "[a-e ]{0,20}", b in "[a-e ]{0,20}") {
        for scorer in scorers() {
            prop_assert_eq!(scorer.score(&a, &b), scorer.score(&b, &a));
            prop_assert!(scorer.score(&a, &b) <= 100);
        }
    }
}

// === Run-Level Properties ===

fn arb_row() -> impl Strategy<Value = RawRecord> {
    (
        "[a-z0-9]{1,6}",
        prop::sample::select(vec!["arxiv", "pubmed", "crossref", "openalex", "s2", "doaj", "dblp"]),
        prop::sample::select(vec!["", "Graph networks", "graph Networks!", "Deep learning", "Causal trees"]),
        prop::option::of(prop::sample::select(vec!["10.1/a", "10.1/A", "10.1/b"])),
        prop::option::of(prop::sample::select(vec!["2301.1", "2301.2"])),
    )
        .prop_map(|(id, source, title, doi, arxiv)| {
            let mut row = RawRecord::new(&id, source, title);
            row.doi = doi.map(str::to_string);
            row.arxiv_id = arxiv.map(str::to_string);
            row
        })
}

proptest! {
    #[test]
    fn test_conservation(rows in prop::collection::vec(arb_row(), 0..25)) {
        for scorer in scorers() {
            let outcome = engine(scorer).deduplicate(&rows).unwrap();
            prop_assert_eq!(outcome.stats.total, rows.len());
            prop_assert_eq!(outcome.stats.unique, outcome.records.len());
            prop_assert_eq!(outcome.stats.unique + outcome.stats.merged, outcome.stats.total);
        }
    }

    #[test]
    fn test_idempotence(rows in prop::collection::vec(arb_row(), 0..25)) {
        for scorer in scorers() {
            let engine = engine(scorer);
            let once = engine.deduplicate(&rows).unwrap();
            let twice = engine.deduplicate_records(once.records.clone());
            prop_assert_eq!(&twice.records, &once.records);
            prop_assert_eq!(twice.stats.merged, 0);
        }
    }
}
