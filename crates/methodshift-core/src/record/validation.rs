//! Row validation and normalization

use serde::{Deserialize, Serialize};

use super::{RawRecord, RawYear, Record};
use crate::error::ValidationError;

/// Earliest accepted publication year
pub const YEAR_MIN: i64 = 1800;
/// Latest accepted publication year
pub const YEAR_MAX: i64 = 2100;

/// Normalize and check one row.
///
/// Trims the required strings, drops blank optional strings, de-duplicates
/// list fields (first-seen order) and bounds-checks the year.
pub fn validate(row: &RawRecord) -> Result<Record, ValidationError> {
    let id = required_str(&row.id);
    if id.is_empty() {
        return Err(ValidationError::EmptyId);
    }

    Ok(Record {
        id,
        source: required_str(&row.source),
        title: required_str(&row.title),
        abstract_text: maybe_str(&row.abstract_text),
        year: coerce_year(row.year.as_ref())?,
        venue: maybe_str(&row.venue),
        fields: normalize_list(&row.fields),
        authors: normalize_list(&row.authors),
        doi: maybe_str(&row.doi),
        arxiv_id: maybe_str(&row.arxiv_id),
        language: maybe_str(&row.language),
    })
}

/// Validate every row in order, failing the batch on the first bad row
pub fn validate_table(rows: &[RawRecord]) -> Result<Vec<Record>, ValidationError> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| validate(row).map_err(|e| e.at_row(index)))
        .collect()
}

/// A row rejected by lenient validation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RejectedRow {
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

/// Outcome of lenient validation: good rows plus quarantined ones
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub records: Vec<Record>,
    pub rejected: Vec<RejectedRow>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Validate every row, quarantining bad rows instead of aborting
pub fn validate_table_lenient(rows: &[RawRecord]) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (index, row) in rows.iter().enumerate() {
        match validate(row) {
            Ok(record) => report.records.push(record),
            Err(err) => {
                tracing::warn!(row = index, id = ?row.id, "Rejected row: {}", err);
                report.rejected.push(RejectedRow {
                    index,
                    id: row.id.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    report
}

fn required_str(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

fn maybe_str(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn normalize_list(values: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let token = value.trim();
        if !token.is_empty() && !cleaned.iter().any(|seen| seen == token) {
            cleaned.push(token.to_string());
        }
    }
    cleaned
}

fn coerce_year(value: Option<&RawYear>) -> Result<Option<i32>, ValidationError> {
    let year = match value {
        None => return Ok(None),
        Some(RawYear::Integer(year)) => *year,
        Some(RawYear::Float(year)) => {
            if !year.is_finite() {
                return Err(ValidationError::InvalidYear(year.to_string()));
            }
            // Truncates toward zero
            year.trunc() as i64
        }
        Some(RawYear::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<i64>()
                .map_err(|_| ValidationError::InvalidYear(text.to_string()))?
        }
    };

    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return Err(ValidationError::YearOutOfBounds(year));
    }
    // Bounds check above guarantees the value fits
    Ok(Some(year as i32))
}
