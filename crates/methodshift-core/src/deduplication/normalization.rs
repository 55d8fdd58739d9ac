//! Identifier normalization for grouping

const DOI_URL_PREFIX: &str = "https://doi.org/";

/// Normalize a DOI for comparison
///
/// - Trims and lowercases
/// - Strips a leading `https://doi.org/`
///
/// Returns `None` when nothing is left.
pub fn normalize_doi(doi: Option<&str>) -> Option<String> {
    let lowered = doi?.trim().to_lowercase();
    let stripped = lowered.strip_prefix(DOI_URL_PREFIX).unwrap_or(&lowered);
    let stripped = stripped.trim();
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}

/// Normalize an arXiv ID for grouping (trim only; versions stay distinct)
pub fn normalize_arxiv_id(arxiv_id: Option<&str>) -> Option<String> {
    let trimmed = arxiv_id?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
