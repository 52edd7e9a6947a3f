pub mod api_types;
pub mod cache;
pub mod cached_client;
pub mod client;
pub mod types;

pub use cached_client::{Catalog, CachedStoreClient};
pub use client::StoreClient;
pub use types::{Book, Category};
