//! Application session: the objects built once at startup and passed down
//! explicitly to every call site.

use crate::config::{Config, ListingConfig};
use crate::error::Result;
use crate::listing::{FilterCriteria, PricePreset};
use crate::store::CachedStoreClient;

pub struct Session {
  client: CachedStoreClient,
  listing: ListingConfig,
}

impl Session {
  /// Build the store client and open the cache described by `config`.
  pub fn start(config: &Config) -> Result<Self> {
    let client = CachedStoreClient::new(config)?;
    tracing::info!(base_url = %config.api.base_url, cache = config.cache.enabled, "session started");
    Ok(Self::new(client, config.listing.clone()))
  }

  pub fn new(client: CachedStoreClient, listing: ListingConfig) -> Self {
    Self { client, listing }
  }

  pub fn client(&self) -> &CachedStoreClient {
    &self.client
  }

  pub fn presets(&self) -> &[PricePreset] {
    &self.listing.price_presets
  }

  pub fn preset(&self, label: &str) -> Option<&PricePreset> {
    self.listing.preset(label)
  }

  pub fn default_criteria(&self) -> FilterCriteria {
    self.listing.default_criteria()
  }
}
