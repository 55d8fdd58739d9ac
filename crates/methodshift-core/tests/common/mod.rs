//! Shared row builders for integration tests

#![allow(dead_code)]

use methodshift_core::RawRecord;

/// A row with the required fields plus a year
pub fn row(id: &str, source: &str, title: &str) -> RawRecord {
    RawRecord::new(id, source, title).with_year(2021)
}

/// A row carrying a DOI
pub fn doi_row(id: &str, source: &str, title: &str, doi: &str) -> RawRecord {
    row(id, source, title).with_doi(doi)
}

/// A row carrying an arXiv ID
pub fn arxiv_row(id: &str, source: &str, title: &str, arxiv_id: &str) -> RawRecord {
    row(id, source, title).with_arxiv_id(arxiv_id)
}

/// A small mixed corpus with DOI, arXiv and fingerprint duplicates
pub fn mixed_corpus() -> Vec<RawRecord> {
    vec![
        doi_row("oa-1", "openalex", "Bayesian methods in ecology", "10.1/abc"),
        doi_row("cr-1", "crossref", "Bayesian Methods in Ecology", "https://doi.org/10.1/ABC"),
        arxiv_row("ax-1", "arxiv", "Causal forests for heterogeneous effects", "2301.00001"),
        arxiv_row("s2-1", "s2", "Causal Forests for Heterogeneous Effects", "2301.00001"),
        row("dj-1", "doaj", "A survey of changepoint detection"),
        row("pm-1", "pubmed", "A Survey of Changepoint Detection!"),
        row("oa-2", "openalex", "Mixed-effects models for longitudinal data"),
    ]
}
