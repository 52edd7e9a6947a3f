//! Serde-deserializable types matching store API responses.
//!
//! The API is loose about shapes: ids may be strings or numbers, a book's
//! category may be an id, an object or a list of either, and prices sometimes
//! arrive as strings or not at all. These types accept every observed shape
//! and convert once into the normalized domain types, so nothing downstream
//! re-checks shape.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::types::{Book, Category};

// ============================================================================
// Loose scalar and reference shapes
// ============================================================================

/// List responses: either a bare array or an envelope object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiList<T> {
  Bare(Vec<T>),
  Envelope {
    #[serde(alias = "books", alias = "categories", alias = "items")]
    data: Vec<T>,
  },
}

impl<T> ApiList<T> {
  pub fn into_vec(self) -> Vec<T> {
    match self {
      ApiList::Bare(items) => items,
      ApiList::Envelope { data } => data,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiId {
  Text(String),
  Number(i64),
}

impl ApiId {
  fn into_string(self) -> String {
    match self {
      ApiId::Text(s) => s,
      ApiId::Number(n) => n.to_string(),
    }
  }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiNumber {
  Number(f64),
  Text(String),
}

impl ApiNumber {
  fn as_f64(&self) -> Option<f64> {
    match self {
      ApiNumber::Number(n) => Some(*n),
      ApiNumber::Text(s) => s.trim().parse().ok(),
    }
  }
}

/// A person or organization given either by name or as `{ "name": ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiNamed {
  Name(String),
  Object { name: String },
}

impl ApiNamed {
  fn into_name(self) -> String {
    match self {
      ApiNamed::Name(name) | ApiNamed::Object { name } => name,
    }
  }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiCategoryRef {
  Id(ApiId),
  Object {
    #[serde(alias = "_id")]
    id: ApiId,
  },
}

impl ApiCategoryRef {
  fn into_id(self) -> String {
    match self {
      ApiCategoryRef::Id(id) | ApiCategoryRef::Object { id } => id.into_string(),
    }
  }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiCategoryField {
  Many(Vec<ApiCategoryRef>),
  One(ApiCategoryRef),
}

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiBook {
  #[serde(alias = "_id")]
  pub id: Option<ApiId>,
  pub title: Option<String>,
  pub author: Option<ApiNamed>,
  pub description: Option<String>,
  #[serde(alias = "categories")]
  pub category: Option<ApiCategoryField>,
  /// Bare id some endpoints send next to, or instead of, `category`
  #[serde(rename = "categoryId")]
  pub category_id: Option<ApiCategoryRef>,
  pub language: Option<String>,
  pub supplier: Option<ApiNamed>,
  pub price: Option<ApiNumber>,
  #[serde(rename = "createdAt", alias = "created_at")]
  pub created_at: Option<String>,
  #[serde(alias = "image", alias = "coverImage")]
  pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiCategory {
  #[serde(alias = "_id")]
  pub id: Option<ApiId>,
  pub name: Option<String>,
  #[serde(alias = "parentId")]
  pub parent: Option<ApiCategoryRef>,
}

// ============================================================================
// Conversions to domain types
// ============================================================================

impl ApiBook {
  /// Normalize into a [`Book`]. Records without an id are rejected.
  pub fn into_book(self) -> Option<Book> {
    let Some(id) = self.id.map(ApiId::into_string) else {
      warn!(title = ?self.title, "dropping book without id");
      return None;
    };

    let price = match self.price.as_ref().and_then(ApiNumber::as_f64) {
      Some(p) if p.is_finite() => p,
      _ => {
        debug!(%id, "book has no usable price, treating as 0");
        0.0
      }
    };

    let category_ids = match self.category {
      None => self.category_id.map(ApiCategoryRef::into_id).into_iter().collect(),
      Some(ApiCategoryField::One(c)) => vec![c.into_id()],
      Some(ApiCategoryField::Many(cs)) => cs.into_iter().map(ApiCategoryRef::into_id).collect(),
    };

    Some(Book {
      created_at: self.created_at.as_deref().and_then(parse_timestamp),
      title: self.title.unwrap_or_default(),
      author: self.author.map(ApiNamed::into_name).unwrap_or_default(),
      description: self.description.filter(|d| !d.is_empty()),
      category_ids,
      language: non_empty(self.language),
      supplier: non_empty(self.supplier.map(ApiNamed::into_name)),
      price,
      image_url: self.image_url,
      id,
    })
  }
}

impl ApiCategory {
  pub fn into_category(self) -> Option<Category> {
    let Some(id) = self.id.map(ApiId::into_string) else {
      warn!(name = ?self.name, "dropping category without id");
      return None;
    };

    Some(Category {
      id,
      name: self.name.unwrap_or_default(),
      parent_id: self.parent.map(ApiCategoryRef::into_id),
    })
  }
}

// ============================================================================
// Helpers
// ============================================================================

/// Parse an RFC 3339 timestamp; anything else counts as absent.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(value)
    .map(|dt| dt.with_timezone(&Utc))
    .ok()
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

/// Decode the list envelope, then each record on its own. A record of an
/// unexpected shape is dropped; only a malformed envelope fails the body.
fn decode_records<T: DeserializeOwned>(body: &[u8], kind: &str) -> serde_json::Result<Vec<T>> {
  let list: ApiList<serde_json::Value> = serde_json::from_slice(body)?;

  let records = list
    .into_vec()
    .into_iter()
    .enumerate()
    .filter_map(|(index, value)| match serde_json::from_value(value) {
      Ok(record) => Some(record),
      Err(e) => {
        warn!(kind, index, error = %e, "dropping malformed record");
        None
      }
    })
    .collect();

  Ok(records)
}

/// Decode a list response body into books, dropping unusable records.
pub fn decode_books(body: &[u8]) -> serde_json::Result<Vec<Book>> {
  let records: Vec<ApiBook> = decode_records(body, "book")?;
  Ok(records.into_iter().filter_map(ApiBook::into_book).collect())
}

/// Decode a list response body into categories, dropping unusable records.
pub fn decode_categories(body: &[u8]) -> serde_json::Result<Vec<Category>> {
  let records: Vec<ApiCategory> = decode_records(body, "category")?;
  Ok(
    records
      .into_iter()
      .filter_map(ApiCategory::into_category)
      .collect(),
  )
}
