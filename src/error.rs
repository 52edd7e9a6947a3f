//! Error types for the storefront library.

use thiserror::Error;

/// Errors that can occur while fetching, caching or listing catalog data.
#[derive(Debug, Error)]
pub enum Error {
  /// Transport-level HTTP failure (connect, timeout, TLS, body read).
  #[error("HTTP error: {0}")]
  Http(#[from] reqwest::Error),

  /// The store API answered with a non-success status.
  #[error("Store API returned {status} for {url}")]
  Status { status: u16, url: String },

  /// A response or cache entry could not be decoded.
  #[error("Malformed payload: {0}")]
  Decode(#[from] serde_json::Error),

  /// The configured base URL or an endpoint path is not a valid URL.
  #[error("Invalid URL: {0}")]
  Url(#[from] url::ParseError),

  /// Durable storage failed.
  #[error("Storage error: {0}")]
  Storage(#[from] rusqlite::Error),

  /// The storage connection lock was poisoned by a panicking holder.
  #[error("Storage lock poisoned")]
  StorageLock,

  /// I/O error.
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  /// Listing criteria violate the pagination contract.
  #[error("Invalid criteria: {0}")]
  InvalidCriteria(String),
}

impl Error {
  /// True for failures of the remote service rather than local faults.
  pub fn is_network(&self) -> bool {
    matches!(self, Error::Http(_) | Error::Status { .. } | Error::Decode(_))
  }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
