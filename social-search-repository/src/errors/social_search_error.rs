//! Social search error types.

use thiserror::Error;

/// Unified errors from social search operations.
///
/// Used by the collaborator traits and by `SocialSearchService`. Index resolution
/// failures never reach callers (they degrade to "no index"); `Configuration` errors
/// always do, because no query-time fallback can correct a broken configuration.
#[derive(Debug, Clone, Error)]
pub enum SocialSearchError {
    /// Missing, malformed or inconsistent configuration.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Failed to establish connection to the search backend.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// No index, or more than one index, matched during resolution.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// Failed to execute a query against the index.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Failed to re-index a document.
    #[error("Update error: {0}")]
    UpdateError(String),

    /// Failed to create the search index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// Failed to read from the partition data store.
    #[error("Store error: {0}")]
    StoreError(String),

    /// Failed to parse a response or a stored document.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl SocialSearchError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index not found error.
    pub fn index_not_found(msg: impl Into<String>) -> Self {
        Self::IndexNotFound(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create an update error.
    pub fn update(msg: impl Into<String>) -> Self {
        Self::UpdateError(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create a store error.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::StoreError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Returns true for configuration errors.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::ConfigurationError(_))
    }
}
