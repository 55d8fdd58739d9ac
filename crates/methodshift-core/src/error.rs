//! Error types for methodshift-core

use thiserror::Error;

/// Result type alias for methodshift operations
pub type Result<T> = std::result::Result<T, MethodShiftError>;

/// Main error type for methodshift operations
#[derive(Error, Debug)]
pub enum MethodShiftError {
    /// Row validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Method dictionary errors
    #[error("Tagging error: {0}")]
    Tagging(#[from] TaggingError),
}

/// Errors raised while validating a record row
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Record id is empty after trimming
    #[error("Record id must not be empty")]
    EmptyId,

    /// Year value could not be coerced to an integer
    #[error("Invalid integer value: {0}")]
    InvalidYear(String),

    /// Year lies outside the accepted range
    #[error("Year {0} is outside expected bounds")]
    YearOutOfBounds(i64),

    /// A row in a batch failed validation
    #[error("Row {index}: {source}")]
    Row {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Attach the position of the failing row in a batch.
    pub fn at_row(self, index: usize) -> Self {
        ValidationError::Row {
            index,
            source: Box::new(self),
        }
    }

    /// The underlying cause, with any row wrapper stripped.
    pub fn root(&self) -> &ValidationError {
        match self {
            ValidationError::Row { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Value out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    /// Source listed more than once in the priority order
    #[error("Duplicate source in priority order: {0}")]
    DuplicateSource(String),

    /// Requested similarity scorer was not compiled in
    #[error("Similarity scorer unavailable: {0}")]
    UnavailableScorer(String),

    /// Config text could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Method dictionary errors
#[derive(Error, Debug)]
pub enum TaggingError {
    /// Dictionary file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Dictionary YAML is malformed
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}
