//! Time-boxed durable cache for remote collections.
//!
//! This module provides a domain-agnostic caching mechanism that:
//! - Stores whole collections under a string key as one serialized entry
//! - Serves entries younger than the TTL without touching the network
//! - Replaces entries atomically on every successful fetch
//! - Provides basic offline mode (serve stale cache when network unavailable)

mod layer;
mod storage;
mod traits;

pub use layer::CacheLayer;
pub use storage::{CacheStorage, MemoryStorage, NoopStorage, SqliteStorage};
pub use traits::{CacheEntry, CacheResult, CacheSource};
