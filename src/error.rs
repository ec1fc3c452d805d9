//! Error types for dataset loading and store operations

use std::fmt;
use thiserror::Error;

use crate::quint::ReactiveResult;

/// Result type alias for quint store operations
pub type Result<T> = std::result::Result<T, QuintError>;

/// Main error type for quint store operations
#[derive(Error, Debug)]
pub enum QuintError {
    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with a non-success status
    #[error("Failed to fetch {uri}: {message}")]
    Fetch { uri: String, message: String },

    /// Parse error when reading RDF data
    #[error("Parse error: {0}")]
    Parse(String),

    /// Underlying storage engine error
    #[error("Store error: {0}")]
    Store(String),

    /// Invalid IRI
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    /// Unsupported or unknown serialization format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Fetch and parse did not complete within the configured timeout
    #[error("Loading {uri} timed out after {secs}s")]
    Timeout { uri: String, secs: u64 },
}

impl From<reqwest::Error> for QuintError {
    fn from(err: reqwest::Error) -> Self {
        QuintError::Http(err.to_string())
    }
}

impl From<oxigraph::store::StorageError> for QuintError {
    fn from(err: oxigraph::store::StorageError) -> Self {
        QuintError::Store(err.to_string())
    }
}

impl From<oxigraph::store::LoaderError> for QuintError {
    fn from(err: oxigraph::store::LoaderError) -> Self {
        QuintError::Parse(err.to_string())
    }
}

impl From<oxigraph::model::IriParseError> for QuintError {
    fn from(err: oxigraph::model::IriParseError) -> Self {
        QuintError::InvalidIri(err.to_string())
    }
}

/// A failed remote load, paired with the reactive result of the query that triggered it.
///
/// The result handle is still live: a later successful load of the same dataset
/// refreshes it in place, so callers may keep it even when they report the error.
pub struct ReactiveLoadError {
    result: ReactiveResult,
    source: QuintError,
}

impl ReactiveLoadError {
    pub fn new(result: ReactiveResult, source: QuintError) -> Self {
        Self { result, source }
    }

    /// The (possibly empty) reactive result for the requested query
    pub fn result(&self) -> &ReactiveResult {
        &self.result
    }

    /// The error raised while fetching or parsing the dataset
    pub fn error(&self) -> &QuintError {
        &self.source
    }

    pub fn into_parts(self) -> (ReactiveResult, QuintError) {
        (self.result, self.source)
    }
}

impl fmt::Debug for ReactiveLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveLoadError")
            .field("result_len", &self.result.len())
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for ReactiveLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for ReactiveLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
