use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::store::api_types::{decode_books, decode_categories};
use crate::store::cache::normalize_search;
use crate::store::types::{Book, Category};

/// Store API client wrapper
#[derive(Clone)]
pub struct StoreClient {
  http: reqwest::Client,
  base_url: Url,
}

impl StoreClient {
  pub fn new(config: &Config) -> Result<Self> {
    let mut headers = HeaderMap::new();
    if let Some(token) = Config::get_api_token() {
      if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
        headers.insert(AUTHORIZATION, value);
      }
    }

    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.api.timeout_secs))
      .default_headers(headers)
      .build()?;

    Ok(Self {
      http,
      base_url: base_url(&config.api.base_url)?,
    })
  }

  /// Get the full book catalog
  pub async fn get_books(&self) -> Result<Vec<Book>> {
    let url = self.base_url.join("books")?;
    let body = self.get_bytes(url).await?;
    Ok(decode_books(&body)?)
  }

  /// Get all categories
  pub async fn get_categories(&self) -> Result<Vec<Category>> {
    let url = self.base_url.join("categories")?;
    let body = self.get_bytes(url).await?;
    Ok(decode_categories(&body)?)
  }

  /// Server-side search over the catalog
  pub async fn search_books(&self, text: &str) -> Result<Vec<Book>> {
    let url = search_url(&self.base_url, text)?;
    let body = self.get_bytes(url).await?;
    Ok(decode_books(&body)?)
  }

  async fn get_bytes(&self, url: Url) -> Result<Vec<u8>> {
    debug!(%url, "GET");
    let response = self.http.get(url.clone()).send().await?;

    let status = response.status();
    if !status.is_success() {
      return Err(Error::Status {
        status: status.as_u16(),
        url: url.to_string(),
      });
    }

    Ok(response.bytes().await?.to_vec())
  }
}

/// Parse the configured base URL so that relative joins land beneath it.
fn base_url(raw: &str) -> Result<Url> {
  let mut url = Url::parse(raw.trim())?;
  if !url.path().ends_with('/') {
    let path = format!("{}/", url.path());
    url.set_path(&path);
  }
  Ok(url)
}

fn search_url(base: &Url, text: &str) -> Result<Url> {
  let mut url = base.join("books/search")?;
  url.query_pairs_mut().append_pair("q", &normalize_search(text));
  Ok(url)
}
