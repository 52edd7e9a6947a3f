use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A book as listed in the storefront, normalized at ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
  pub id: String,
  pub title: String,
  pub author: String,
  pub description: Option<String>,
  pub category_ids: Vec<String>,
  pub language: Option<String>,
  pub supplier: Option<String>,
  pub price: f64,
  pub created_at: Option<DateTime<Utc>>,
  pub image_url: Option<String>,
}

/// Book category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub id: String,
  pub name: String,
  pub parent_id: Option<String>,
}
