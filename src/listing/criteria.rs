//! User-selected listing criteria.
//!
//! Criteria are plain data owned by the caller. The `set_*` mutators reset the
//! page to 1 so that narrowing a filter never leaves the caller on a page that
//! no longer exists; `set_page` is the only mutator that keeps the rest.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::facets::Facet;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Ordering applied to the filtered listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
  /// Most recently created first
  #[default]
  Newest,
  PriceAscending,
  PriceDescending,
  TitleAscending,
  TitleDescending,
}

impl SortKey {
  pub fn as_str(&self) -> &'static str {
    match self {
      SortKey::Newest => "newest",
      SortKey::PriceAscending => "price-asc",
      SortKey::PriceDescending => "price-desc",
      SortKey::TitleAscending => "title-asc",
      SortKey::TitleDescending => "title-desc",
    }
  }
}

impl fmt::Display for SortKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for SortKey {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "newest" => Ok(SortKey::Newest),
      "price-asc" | "price-ascending" => Ok(SortKey::PriceAscending),
      "price-desc" | "price-descending" => Ok(SortKey::PriceDescending),
      "title-asc" | "title-ascending" => Ok(SortKey::TitleAscending),
      "title-desc" | "title-descending" => Ok(SortKey::TitleDescending),
      other => Err(format!(
        "unknown sort key '{}' (expected newest, price-asc, price-desc, title-asc, title-desc)",
        other
      )),
    }
  }
}

/// A predefined price bucket offered as a one-tap choice.
///
/// Half-open: `min <= price < max`, with no upper bound when `max` is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePreset {
  pub label: String,
  pub min: f64,
  #[serde(default)]
  pub max: Option<f64>,
}

impl PricePreset {
  pub fn new(label: impl Into<String>, min: f64, max: Option<f64>) -> Self {
    Self {
      label: label.into(),
      min,
      max,
    }
  }

  pub fn contains(&self, price: f64) -> bool {
    self.min <= price && self.max.map_or(true, |max| price < max)
  }

  /// Buckets shipped when the config doesn't define its own (prices in VND).
  pub fn defaults() -> Vec<Self> {
    vec![
      Self::new("0-100k", 0.0, Some(100_000.0)),
      Self::new("100k-200k", 100_000.0, Some(200_000.0)),
      Self::new("200k-500k", 200_000.0, Some(500_000.0)),
      Self::new("500k+", 500_000.0, None),
    ]
  }
}

/// Free-form price bounds, both inclusive; an absent bound is unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriceRange {
  pub min: Option<f64>,
  pub max: Option<f64>,
}

impl PriceRange {
  pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
    Self { min, max }
  }

  pub fn contains(&self, price: f64) -> bool {
    self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
  }
}

/// Price constraint: an active preset replaces the free-form range entirely.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceFilter {
  pub preset: Option<PricePreset>,
  pub range: PriceRange,
}

impl PriceFilter {
  pub fn matches(&self, price: f64) -> bool {
    match &self.preset {
      Some(preset) => preset.contains(price),
      None => self.range.contains(price),
    }
  }
}

/// Everything the listing pipeline needs to produce one page.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
  pub category_ids: BTreeSet<String>,
  pub languages: BTreeSet<String>,
  pub suppliers: BTreeSet<String>,
  pub price: PriceFilter,
  /// Substring matched against title and author after sorting
  pub search_text: String,
  pub sort: SortKey,
  /// 1-indexed
  pub page: usize,
  pub page_size: usize,
}

impl Default for FilterCriteria {
  fn default() -> Self {
    Self::new(DEFAULT_PAGE_SIZE)
  }
}

impl FilterCriteria {
  pub fn new(page_size: usize) -> Self {
    Self {
      category_ids: BTreeSet::new(),
      languages: BTreeSet::new(),
      suppliers: BTreeSet::new(),
      price: PriceFilter::default(),
      search_text: String::new(),
      sort: SortKey::default(),
      page: 1,
      page_size,
    }
  }

  /// Selected values for a facet.
  pub fn selected(&self, facet: Facet) -> &BTreeSet<String> {
    match facet {
      Facet::Category => &self.category_ids,
      Facet::Language => &self.languages,
      Facet::Supplier => &self.suppliers,
    }
  }

  fn selected_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
    match facet {
      Facet::Category => &mut self.category_ids,
      Facet::Language => &mut self.languages,
      Facet::Supplier => &mut self.suppliers,
    }
  }

  /// Replace the selection for a facet.
  pub fn set_selected<I, S>(&mut self, facet: Facet, values: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    *self.selected_mut(facet) = values.into_iter().map(Into::into).collect();
    self.page = 1;
  }

  /// Add the value to the facet selection, or remove it if already selected.
  pub fn toggle(&mut self, facet: Facet, value: &str) {
    let selected = self.selected_mut(facet);
    if !selected.remove(value) {
      selected.insert(value.to_string());
    }
    self.page = 1;
  }

  /// Activate a preset (or clear it with `None`); the free-form range is
  /// ignored while a preset is active.
  pub fn set_preset(&mut self, preset: Option<PricePreset>) {
    self.price.preset = preset;
    self.page = 1;
  }

  pub fn set_price_range(&mut self, range: PriceRange) {
    self.price.range = range;
    self.page = 1;
  }

  pub fn set_search(&mut self, text: impl Into<String>) {
    self.search_text = text.into();
    self.page = 1;
  }

  pub fn set_sort(&mut self, sort: SortKey) {
    self.sort = sort;
    self.page = 1;
  }

  pub fn set_page_size(&mut self, page_size: usize) {
    self.page_size = page_size;
    self.page = 1;
  }

  pub fn set_page(&mut self, page: usize) {
    self.page = page;
  }

  /// Drop every filter and the search text. Sort and page size stay.
  pub fn clear_filters(&mut self) {
    self.category_ids.clear();
    self.languages.clear();
    self.suppliers.clear();
    self.price = PriceFilter::default();
    self.search_text.clear();
    self.page = 1;
  }
}
