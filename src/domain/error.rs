//! Error types for the admingrid engine.
//!
//! This module defines the centralized error type [`GridError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! Engine operations themselves are total once an engine is constructed; every
//! variant here is raised either while building a [`Config`](crate::Config) or
//! while decoding a record payload handed over by the record source.

use thiserror::Error;

/// The main error type for admingrid operations.
///
/// # Examples
///
/// ```
/// use admingrid::GridError;
///
/// fn validate_page_size(size: usize) -> Result<(), GridError> {
///     if size == 0 {
///         return Err(GridError::Config("page_size must be greater than zero".to_string()));
///     }
///     Ok(())
/// }
///
/// assert!(validate_page_size(0).is_err());
/// ```
#[derive(Debug, Error)]
pub enum GridError {
    /// Screen configuration is invalid.
    ///
    /// Raised at engine construction: unknown field types, a zero page size,
    /// empty or duplicate field declarations, or a default sort on a field
    /// that is not declared sortable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading a configuration file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A TOML configuration document could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A record payload was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record payload was valid JSON but not an array of objects.
    #[error("Invalid record payload: {0}")]
    InvalidRecord(String),
}

/// A specialized `Result` type for admingrid operations.
pub type Result<T> = std::result::Result<T, GridError>;
