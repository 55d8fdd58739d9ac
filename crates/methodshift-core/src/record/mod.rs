//! Record domain model
//!
//! `RawRecord` is the loosely-typed row handed over by ingestion connectors.
//! `Record` is the validated, normalized form every other module works on.

mod validation;

pub use validation::{
    validate, validate_table, validate_table_lenient, RejectedRow, ValidationReport, YEAR_MAX,
    YEAR_MIN,
};

use serde::{Deserialize, Deserializer, Serialize};

/// Canonical representation of a single scholarly record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub source: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub year: Option<i32>,
    pub venue: Option<String>,
    pub fields: Vec<String>,
    pub authors: Vec<String>,
    pub doi: Option<String>,
    pub arxiv_id: Option<String>,
    pub language: Option<String>,
}

impl Record {
    /// Convert back into a row so the record can be re-validated
    pub fn to_row(&self) -> RawRecord {
        RawRecord {
            id: Some(self.id.clone()),
            source: Some(self.source.clone()),
            title: Some(self.title.clone()),
            abstract_text: self.abstract_text.clone(),
            year: self.year.map(|y| RawYear::Integer(i64::from(y))),
            venue: self.venue.clone(),
            fields: self.fields.clone(),
            authors: self.authors.clone(),
            doi: self.doi.clone(),
            arxiv_id: self.arxiv_id.clone(),
            language: self.language.clone(),
        }
    }
}

/// A year as it arrives from a source payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawYear {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<i32> for RawYear {
    fn from(year: i32) -> Self {
        RawYear::Integer(i64::from(year))
    }
}

impl From<&str> for RawYear {
    fn from(year: &str) -> Self {
        RawYear::Text(year.to_string())
    }
}

/// Unvalidated row mapping
///
/// Missing or null values are tolerated; `validate` decides what is acceptable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub year: Option<RawYear>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub fields: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub authors: Vec<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub arxiv_id: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl RawRecord {
    /// Create a row with the required fields
    pub fn new(id: &str, source: &str, title: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            source: Some(source.to_string()),
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    pub fn with_doi(mut self, doi: &str) -> Self {
        self.doi = Some(doi.to_string());
        self
    }

    pub fn with_arxiv_id(mut self, arxiv_id: &str) -> Self {
        self.arxiv_id = Some(arxiv_id.to_string());
        self
    }

    pub fn with_year(mut self, year: impl Into<RawYear>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_abstract(mut self, text: &str) -> Self {
        self.abstract_text = Some(text.to_string());
        self
    }

    pub fn with_authors(mut self, authors: &[&str]) -> Self {
        self.authors = authors.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }
}

/// Accept `null`, a missing list, or a list with `null` holes
fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(values.unwrap_or_default().into_iter().flatten().collect())
}
