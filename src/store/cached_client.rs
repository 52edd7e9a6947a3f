//! Cached store client that wraps StoreClient with transparent caching.

use chrono::Duration;
use std::sync::Arc;

use crate::cache::{CacheLayer, CacheResult, CacheStorage, NoopStorage, SqliteStorage};
use crate::config::Config;
use crate::error::Result;

use super::cache::StoreQueryKey;
use super::client::StoreClient;
use super::types::{Book, Category};

/// Books and categories loaded side by side.
#[derive(Debug)]
pub struct Catalog {
  pub books: CacheResult<Vec<Book>>,
  pub categories: CacheResult<Vec<Category>>,
}

/// Store client with transparent caching support.
///
/// This wraps the underlying StoreClient and provides the same API,
/// but automatically caches results and supports offline mode.
#[derive(Clone)]
pub struct CachedStoreClient {
  inner: StoreClient,
  cache: CacheLayer<dyn CacheStorage>,
}

impl CachedStoreClient {
  /// Create a new cached store client with the storage the config asks for.
  pub fn new(config: &Config) -> Result<Self> {
    let inner = StoreClient::new(config)?;
    let storage: Arc<dyn CacheStorage> = if config.cache.enabled {
      Arc::new(SqliteStorage::open(config.cache.path.as_deref())?)
    } else {
      Arc::new(NoopStorage)
    };

    Ok(Self::with_storage(inner, storage, config.cache.ttl()))
  }

  /// Create a cached client over an explicit storage backend.
  pub fn with_storage(inner: StoreClient, storage: Arc<dyn CacheStorage>, ttl: Duration) -> Self {
    let cache = CacheLayer::from_shared(storage).with_ttl(ttl);
    Self { inner, cache }
  }

  /// Get all books with caching.
  pub async fn books(&self) -> CacheResult<Vec<Book>> {
    let key = StoreQueryKey::Books;
    self
      .cache
      .load(&key.cache_key(), || {
        let inner = self.inner.clone();
        async move { inner.get_books().await }
      })
      .await
  }

  /// Get all categories with caching.
  pub async fn categories(&self) -> CacheResult<Vec<Category>> {
    let key = StoreQueryKey::Categories;
    self
      .cache
      .load(&key.cache_key(), || {
        let inner = self.inner.clone();
        async move { inner.get_categories().await }
      })
      .await
  }

  /// Server-side search with caching, keyed by normalized search text.
  pub async fn search(&self, text: &str) -> CacheResult<Vec<Book>> {
    let key = StoreQueryKey::Search {
      text: text.to_string(),
    };
    tracing::debug!(query = %key.description(), "search");
    self
      .cache
      .load(&key.cache_key(), || {
        let inner = self.inner.clone();
        let text = text.to_string();
        async move { inner.search_books(&text).await }
      })
      .await
  }

  /// Pull-to-refresh for books: always hits the network.
  pub async fn refresh_books(&self) -> Result<CacheResult<Vec<Book>>> {
    self
      .cache
      .force_refresh(&StoreQueryKey::Books.cache_key(), || {
        let inner = self.inner.clone();
        async move { inner.get_books().await }
      })
      .await
  }

  /// Pull-to-refresh for categories: always hits the network.
  pub async fn refresh_categories(&self) -> Result<CacheResult<Vec<Category>>> {
    self
      .cache
      .force_refresh(&StoreQueryKey::Categories.cache_key(), || {
        let inner = self.inner.clone();
        async move { inner.get_categories().await }
      })
      .await
  }

  /// Load books and categories concurrently.
  pub async fn catalog(&self) -> Catalog {
    let (books, categories) = futures::join!(self.books(), self.categories());
    Catalog { books, categories }
  }
}
