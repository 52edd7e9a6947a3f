//! Core types for the caching system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A cached payload as persisted in the key-value store.
///
/// The whole entry is serialized to JSON and written under its key in one
/// `set` call, so a reader never sees a payload from one write paired with
/// the timestamp of another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
  /// The cached collection, opaque to the cache
  pub payload: T,
  /// When the payload was fetched from the network and stored
  pub stored_at: DateTime<Utc>,
}

/// Result from a cache operation, including data and metadata about the source.
#[derive(Debug)]
pub struct CacheResult<T> {
  /// The actual data (empty when the source is `Unavailable`)
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
  /// When the data was cached (if from cache)
  pub cached_at: Option<DateTime<Utc>>,
  /// The network failure behind a degraded or failed outcome
  pub error: Option<Error>,
}

impl<T> CacheResult<T> {
  /// Create a new cache result from fresh network data.
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
      cached_at: None,
      error: None,
    }
  }

  /// Create a new cache result from cached data that is still fresh.
  pub fn from_cache(data: T, cached_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source: CacheSource::Cache,
      cached_at: Some(cached_at),
      error: None,
    }
  }

  /// Create a new cache result for offline mode (stale fallback).
  pub fn offline(data: T, cached_at: DateTime<Utc>, error: Error) -> Self {
    Self {
      data,
      source: CacheSource::Offline,
      cached_at: Some(cached_at),
      error: Some(error),
    }
  }

  /// The network failed and nothing was cached.
  pub fn unavailable(error: Error) -> Self
  where
    T: Default,
  {
    Self {
      data: T::default(),
      source: CacheSource::Unavailable,
      cached_at: None,
      error: Some(error),
    }
  }

  /// Stale data served because the refresh failed.
  pub fn is_degraded(&self) -> bool {
    self.source == CacheSource::Offline
  }

  /// No data at all could be produced.
  pub fn is_failed(&self) -> bool {
    self.source == CacheSource::Unavailable
  }
}

/// Indicates where cached data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Fresh data from network
  Network,
  /// Data from cache, still within its TTL
  Cache,
  /// Offline mode - network failed, serving expired cached data
  Offline,
  /// Network failed and no cached data exists
  Unavailable,
}
