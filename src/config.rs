use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::listing::{FilterCriteria, PricePreset};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub api: ApiConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  #[serde(default)]
  pub listing: ListingConfig,
  #[serde(default)]
  pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Root of the store REST API, e.g. "https://books.example.com/api/"
  pub base_url: String,
  /// Per-request timeout in seconds
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// Disable to run without durable storage (every load hits the network)
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// How long cached collections are served without revalidation
  #[serde(default = "default_ttl_secs")]
  pub ttl_secs: u64,
  /// Cache database location (defaults to the user data directory)
  pub path: Option<PathBuf>,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      ttl_secs: default_ttl_secs(),
      path: None,
    }
  }
}

impl CacheConfig {
  pub fn ttl(&self) -> chrono::Duration {
    let secs = i64::try_from(self.ttl_secs)
      .unwrap_or(i64::MAX)
      .min(i64::MAX / 1_000);
    chrono::Duration::seconds(secs)
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingConfig {
  #[serde(default = "default_page_size")]
  pub page_size: usize,
  #[serde(default = "PricePreset::defaults")]
  pub price_presets: Vec<PricePreset>,
}

impl Default for ListingConfig {
  fn default() -> Self {
    Self {
      page_size: default_page_size(),
      price_presets: PricePreset::defaults(),
    }
  }
}

impl ListingConfig {
  /// Look up a preset by label, ignoring case.
  pub fn preset(&self, label: &str) -> Option<&PricePreset> {
    self
      .price_presets
      .iter()
      .find(|p| p.label.eq_ignore_ascii_case(label.trim()))
  }

  /// Fresh criteria using the configured page size.
  pub fn default_criteria(&self) -> FilterCriteria {
    FilterCriteria::new(self.page_size)
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
  /// `tracing` filter directive; STOREFRONT_LOG takes precedence
  #[serde(default = "default_log_filter")]
  pub filter: String,
  /// Write logs to a file in this directory instead of stderr
  pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      filter: default_log_filter(),
      directory: None,
    }
  }
}

fn default_timeout_secs() -> u64 {
  15
}

fn default_true() -> bool {
  true
}

fn default_ttl_secs() -> u64 {
  300
}

fn default_page_size() -> usize {
  10
}

fn default_log_filter() -> String {
  "warn".to_string()
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./storefront.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/storefront/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!(
        "No configuration file found. Create one at ~/.config/storefront/config.yaml\n\
                 with at least `api.base_url` set."
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("storefront.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("storefront").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn from_yaml(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;

    if config.listing.page_size == 0 {
      return Err(eyre!("listing.page_size must be at least 1"));
    }

    Ok(config)
  }

  /// Get the optional store API token from the environment.
  ///
  /// Checks STOREFRONT_API_TOKEN.
  pub fn get_api_token() -> Option<String> {
    std::env::var("STOREFRONT_API_TOKEN")
      .ok()
      .filter(|t| !t.is_empty())
  }
}
