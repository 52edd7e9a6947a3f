//! Cache layer that orchestrates caching logic with network fetching.

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::storage::CacheStorage;
use super::traits::{CacheEntry, CacheResult};
use crate::error::{Error, Result};

/// Cache layer that manages caching logic and network fetching.
///
/// This layer sits between the application and the network client,
/// providing transparent caching with offline support. Storage faults never
/// escape it: a failed read is a miss and a failed write is dropped.
///
/// Concurrent calls on the same key are not coordinated. Two cold loads both
/// hit the network and the last write wins.
pub struct CacheLayer<S: CacheStorage + ?Sized> {
  storage: Arc<S>,
  /// How long cached data is served without revalidation
  ttl: Duration,
}

impl<S: CacheStorage> CacheLayer<S> {
  /// Create a new cache layer with the given storage backend.
  pub fn new(storage: S) -> Self {
    Self::from_shared(Arc::new(storage))
  }
}

impl<S: CacheStorage + ?Sized> CacheLayer<S> {
  /// Create a cache layer over storage that is already shared.
  pub fn from_shared(storage: Arc<S>) -> Self {
    Self {
      storage,
      ttl: Duration::minutes(5),
    }
  }

  /// Set the default time-to-live for cached data.
  pub fn with_ttl(mut self, ttl: Duration) -> Self {
    self.ttl = ttl;
    self
  }

  /// Check if data stored at `stored_at` is still within `ttl`.
  fn is_fresh(stored_at: DateTime<Utc>, ttl: Duration) -> bool {
    Utc::now() - stored_at < ttl
  }

  /// Fetch a list with cache-first strategy, using the layer's TTL.
  pub async fn load<T, F, Fut>(&self, key: &str, fetcher: F) -> CacheResult<Vec<T>>
  where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
  {
    self.load_with_ttl(key, self.ttl, fetcher).await
  }

  /// Fetch a list with cache-first strategy.
  ///
  /// 1. Check cache - if within `ttl`, return immediately
  /// 2. If expired/missing, fetch from network and replace the entry
  /// 3. On network failure, return the expired entry (offline mode)
  /// 4. With nothing cached, return an empty list marked unavailable
  pub async fn load_with_ttl<T, F, Fut>(
    &self,
    key: &str,
    ttl: Duration,
    fetcher: F,
  ) -> CacheResult<Vec<T>>
  where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
  {
    let cached = self.read_entry::<Vec<T>>(key);

    match cached {
      Some(entry) if Self::is_fresh(entry.stored_at, ttl) => {
        debug!(key, stored_at = %entry.stored_at, "cache hit");
        return CacheResult::from_cache(entry.payload, entry.stored_at);
      }
      Some(ref entry) => debug!(key, stored_at = %entry.stored_at, "cache expired"),
      None => debug!(key, "cache miss"),
    }

    match fetcher().await {
      Ok(data) => {
        self.write_entry(key, &data);
        CacheResult::from_network(data)
      }
      Err(err) => match cached {
        Some(entry) => {
          warn!(key, error = %err, stored_at = %entry.stored_at, "fetch failed, serving stale cache");
          CacheResult::offline(entry.payload, entry.stored_at, err)
        }
        None => {
          warn!(key, error = %err, "fetch failed with nothing cached");
          CacheResult::unavailable(err)
        }
      },
    }
  }

  /// Fetch from the network regardless of cache age.
  ///
  /// On success the entry is replaced. On failure the error is returned and
  /// the existing entry is left as it was.
  pub async fn force_refresh<T, F, Fut>(&self, key: &str, fetcher: F) -> Result<CacheResult<Vec<T>>>
  where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
  {
    info!(key, "forced refresh");
    let data = fetcher().await?;
    self.write_entry(key, &data);
    Ok(CacheResult::from_network(data))
  }

  /// Read and decode the entry under `key`. Any fault reads as a miss.
  fn read_entry<T: DeserializeOwned>(&self, key: &str) -> Option<CacheEntry<T>> {
    let raw = match self.storage.get(key) {
      Ok(raw) => raw?,
      Err(err) => {
        warn!(key, error = %err, "cache read failed");
        return None;
      }
    };

    match serde_json::from_str(&raw) {
      Ok(entry) => Some(entry),
      Err(err) => {
        warn!(key, error = %err, "discarding undecodable cache entry");
        None
      }
    }
  }

  /// Replace the entry under `key`. Faults are logged and dropped.
  fn write_entry<T: Serialize>(&self, key: &str, payload: &T) {
    let entry = CacheEntry {
      payload,
      stored_at: Utc::now(),
    };

    let result = serde_json::to_string(&entry)
      .map_err(Error::from)
      .and_then(|value| self.storage.set(key, &value));

    match result {
      Ok(()) => debug!(key, "cache entry written"),
      Err(err) => warn!(key, error = %err, "cache write failed"),
    }
  }
}

impl<S: CacheStorage + ?Sized> Clone for CacheLayer<S> {
  fn clone(&self) -> Self {
    Self {
      storage: Arc::clone(&self.storage),
      ttl: self.ttl,
    }
  }
}
