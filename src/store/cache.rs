//! Cache keys for store API calls.

use sha2::{Digest, Sha256};

/// Query key types for store API calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreQueryKey {
  /// The full book catalog
  Books,
  /// All categories
  Categories,
  /// Server-side book search
  Search { text: String },
}

impl StoreQueryKey {
  /// Key under which the result is stored.
  pub fn cache_key(&self) -> String {
    match self {
      Self::Books => "books".to_string(),
      Self::Categories => "categories".to_string(),
      Self::Search { text } => {
        // SHA256 hash for stable, fixed-length keys
        let mut hasher = Sha256::new();
        hasher.update(normalize_search(text).as_bytes());
        format!("search:{}", hex::encode(hasher.finalize()))
      }
    }
  }

  /// Human-readable description for logs.
  pub fn description(&self) -> String {
    match self {
      Self::Books => "all books".to_string(),
      Self::Categories => "all categories".to_string(),
      Self::Search { text } => format!("search: {}", text),
    }
  }
}

/// Normalize search text. The same form is hashed into the key and sent to
/// the store, so a cached result always answers the query it was stored for.
pub(crate) fn normalize_search(text: &str) -> String {
  text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fixed_keys() {
    assert_eq!(StoreQueryKey::Books.cache_key(), "books");
    assert_eq!(StoreQueryKey::Categories.cache_key(), "categories");
  }

  #[test]
  fn test_search_key_is_normalized() {
    let a = StoreQueryKey::Search {
      text: "  Harry Potter ".to_string(),
    };
    let b = StoreQueryKey::Search {
      text: "harry potter".to_string(),
    };
    assert_eq!(a.cache_key(), b.cache_key());
    assert!(a.cache_key().starts_with("search:"));
    assert_eq!(a.cache_key().len(), "search:".len() + 64);
  }

  #[test]
  fn test_distinct_searches_get_distinct_keys() {
    let a = StoreQueryKey::Search {
      text: "dune".to_string(),
    };
    let b = StoreQueryKey::Search {
      text: "dune messiah".to_string(),
    };
    assert_ne!(a.cache_key(), b.cache_key());
  }
}
