use std::collections::BTreeSet;

use crate::store::types::Book;

/// Categorical field a listing can be narrowed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
  Category,
  Language,
  Supplier,
}

impl Facet {
  /// Facets in the order the pipeline applies them
  pub const ALL: [Facet; 3] = [Facet::Category, Facet::Language, Facet::Supplier];

  pub fn label(&self) -> &'static str {
    match self {
      Facet::Category => "Category",
      Facet::Language => "Language",
      Facet::Supplier => "Supplier",
    }
  }

  /// Extract the values of this facet from a book.
  /// Books can sit in several categories; language and supplier are single-valued.
  pub fn values<'a>(&self, book: &'a Book) -> Vec<&'a str> {
    match self {
      Facet::Category => book.category_ids.iter().map(String::as_str).collect(),
      Facet::Language => book.language.as_deref().into_iter().collect(),
      Facet::Supplier => book.supplier.as_deref().into_iter().collect(),
    }
  }

  /// Any-match: an empty selection keeps everything, otherwise the book must
  /// carry at least one selected value. A book missing the field never matches
  /// a non-empty selection.
  pub fn matches(&self, book: &Book, selected: &BTreeSet<String>) -> bool {
    selected.is_empty() || self.values(book).iter().any(|v| selected.contains(*v))
  }

  /// Distinct values present in `books`, sorted, for populating filter choices.
  pub fn unique_values(&self, books: &[Book]) -> Vec<String> {
    let values: BTreeSet<&str> = books.iter().flat_map(|b| self.values(b)).collect();
    values.into_iter().map(String::from).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn book(id: &str, categories: &[&str], language: Option<&str>, supplier: Option<&str>) -> Book {
    Book {
      id: id.to_string(),
      title: format!("Book {}", id),
      author: "Author".to_string(),
      description: None,
      category_ids: categories.iter().map(|c| c.to_string()).collect(),
      language: language.map(String::from),
      supplier: supplier.map(String::from),
      price: 100.0,
      created_at: None,
      image_url: None,
    }
  }

  fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
  }

  fn test_books() -> Vec<Book> {
    vec![
      book("1", &["fiction", "classics"], Some("vi"), Some("Tre")),
      book("2", &["science"], Some("en"), None),
      book("3", &[], None, Some("Alpha")),
    ]
  }

  #[test]
  fn test_empty_selection_matches_all() {
    let books = test_books();
    for facet in Facet::ALL {
      assert!(books.iter().all(|b| facet.matches(b, &BTreeSet::new())));
    }
  }

  #[test]
  fn test_category_any_match() {
    let books = test_books();
    let selected = set(&["classics", "science"]);

    let ids: Vec<&str> = books
      .iter()
      .filter(|b| Facet::Category.matches(b, &selected))
      .map(|b| b.id.as_str())
      .collect();
    assert_eq!(ids, vec!["1", "2"]);
  }

  #[test]
  fn test_missing_field_never_matches_selection() {
    let books = test_books();

    assert!(!Facet::Supplier.matches(&books[1], &set(&["Tre", "Alpha"])));
    assert!(!Facet::Language.matches(&books[2], &set(&["vi"])));
    assert!(!Facet::Category.matches(&books[2], &set(&["fiction"])));
  }

  #[test]
  fn test_unique_values_sorted_and_distinct() {
    let mut books = test_books();
    books.push(book("4", &["fiction"], Some("vi"), Some("Tre")));

    assert_eq!(
      Facet::Category.unique_values(&books),
      vec!["classics", "fiction", "science"]
    );
    assert_eq!(Facet::Language.unique_values(&books), vec!["en", "vi"]);
    assert_eq!(Facet::Supplier.unique_values(&books), vec!["Alpha", "Tre"]);
  }
}
