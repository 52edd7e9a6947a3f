//! Filter, sort, search and paginate a book collection.

use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::criteria::{FilterCriteria, SortKey};
use super::facets::Facet;
use crate::error::{Error, Result};
use crate::store::types::Book;

/// One page of a listing plus the totals needed to render a pager.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage<'a> {
  pub items: Vec<&'a Book>,
  /// Matching books across all pages
  pub total_count: usize,
  pub total_pages: usize,
}

/// Produce the requested page of `books` under `criteria`.
///
/// Stages run in a fixed order: category, language and supplier facets, price,
/// stable sort, search overlay, pagination. Search runs after the sort so its
/// results keep the chosen order. A page past the end is empty, not an error.
pub fn apply<'a>(books: &'a [Book], criteria: &FilterCriteria) -> Result<ListingPage<'a>> {
  if criteria.page_size == 0 {
    return Err(Error::InvalidCriteria("page size must be at least 1".to_string()));
  }
  if criteria.page == 0 {
    return Err(Error::InvalidCriteria("pages are numbered from 1".to_string()));
  }

  let mut matching: Vec<&Book> = books
    .iter()
    .filter(|b| Facet::Category.matches(b, criteria.selected(Facet::Category)))
    .filter(|b| Facet::Language.matches(b, criteria.selected(Facet::Language)))
    .filter(|b| Facet::Supplier.matches(b, criteria.selected(Facet::Supplier)))
    .filter(|b| criteria.price.matches(b.price))
    .collect();

  // sort_by is stable: equal keys keep their input order
  matching.sort_by(|a, b| compare(a, b, criteria.sort));

  let needle = criteria.search_text.trim().to_lowercase();
  if !needle.is_empty() {
    matching.retain(|b| matches_search(b, &needle));
  }

  let total_count = matching.len();
  let total_pages = total_count.div_ceil(criteria.page_size);
  let start = (criteria.page - 1).saturating_mul(criteria.page_size);

  let items = matching
    .into_iter()
    .skip(start)
    .take(criteria.page_size)
    .collect();

  Ok(ListingPage {
    items,
    total_count,
    total_pages,
  })
}

fn compare(a: &Book, b: &Book, sort: SortKey) -> Ordering {
  match sort {
    SortKey::Newest => b.created_at.cmp(&a.created_at),
    SortKey::PriceAscending => a.price.total_cmp(&b.price),
    SortKey::PriceDescending => b.price.total_cmp(&a.price),
    SortKey::TitleAscending => compare_titles(&a.title, &b.title),
    SortKey::TitleDescending => compare_titles(&b.title, &a.title),
  }
}

/// Title order on base letters first, so accented and plain letters sort
/// together. Accents, then case, only break ties.
fn compare_titles(a: &str, b: &str) -> Ordering {
  primary_key(a)
    .cmp(&primary_key(b))
    .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
    .then_with(|| a.cmp(b))
}

/// Lowercased base letters: NFD with combining marks removed. The stroked
/// d has no decomposition and is folded by hand.
fn primary_key(title: &str) -> String {
  title
    .nfd()
    .filter(|c| !is_combining_mark(*c))
    .flat_map(char::to_lowercase)
    .map(|c| if c == '\u{111}' { 'd' } else { c })
    .collect()
}

/// `needle` must already be lowercased.
fn matches_search(book: &Book, needle: &str) -> bool {
  book.title.to_lowercase().contains(needle) || book.author.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::listing::criteria::{PricePreset, PriceRange};
  use chrono::{TimeZone, Utc};

  fn book(id: &str, title: &str, price: f64) -> Book {
    Book {
      id: id.to_string(),
      title: title.to_string(),
      author: "Anon".to_string(),
      description: None,
      category_ids: Vec::new(),
      language: None,
      supplier: None,
      price,
      created_at: None,
      image_url: None,
    }
  }

  fn ids(page: &ListingPage<'_>) -> Vec<String> {
    page.items.iter().map(|b| b.id.clone()).collect()
  }

  fn criteria() -> FilterCriteria {
    FilterCriteria::new(10)
  }

  #[test]
  fn test_language_filter_with_price_sort() {
    let mut vi = book("1", "B", 100.0);
    vi.language = Some("vi".to_string());
    let mut en = book("2", "A", 200.0);
    en.language = Some("en".to_string());
    let books = vec![vi, en];

    let mut c = criteria();
    c.toggle(Facet::Language, "vi");
    c.set_sort(SortKey::PriceAscending);

    let page = apply(&books, &c).unwrap();
    assert_eq!(ids(&page), vec!["1"]);
    assert_eq!(page.total_count, 1);
    assert_eq!(page.total_pages, 1);
  }

  #[test]
  fn test_third_page_of_25() {
    let books: Vec<Book> = (1..=25)
      .map(|i| book(&i.to_string(), "Same", i as f64))
      .collect();

    let mut c = criteria();
    c.set_sort(SortKey::PriceAscending);
    c.set_page(3);

    let page = apply(&books, &c).unwrap();
    assert_eq!(ids(&page), vec!["21", "22", "23", "24", "25"]);
    assert_eq!(page.total_count, 25);
    assert_eq!(page.total_pages, 3);
  }

  #[test]
  fn test_page_past_end_is_empty() {
    let books = vec![book("1", "A", 1.0), book("2", "B", 2.0)];
    let mut c = criteria();
    c.set_page(5);

    let page = apply(&books, &c).unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 2);
    assert_eq!(page.total_pages, 1);
  }

  #[test]
  fn test_empty_input() {
    let page = apply(&[], &criteria()).unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 0);
    assert_eq!(page.total_pages, 0);
  }

  #[test]
  fn test_invalid_pagination_rejected() {
    let books = vec![book("1", "A", 1.0)];

    let mut c = criteria();
    c.page_size = 0;
    assert!(matches!(apply(&books, &c), Err(Error::InvalidCriteria(_))));

    let mut c = criteria();
    c.page = 0;
    assert!(matches!(apply(&books, &c), Err(Error::InvalidCriteria(_))));
  }

  #[test]
  fn test_equal_prices_keep_input_order() {
    let books = vec![
      book("x", "X", 50.0),
      book("a", "A", 10.0),
      book("y", "Y", 50.0),
      book("b", "B", 10.0),
    ];

    let mut c = criteria();
    c.set_sort(SortKey::PriceAscending);
    assert_eq!(ids(&apply(&books, &c).unwrap()), vec!["a", "b", "x", "y"]);

    c.set_sort(SortKey::PriceDescending);
    assert_eq!(ids(&apply(&books, &c).unwrap()), vec!["x", "y", "a", "b"]);
  }

  #[test]
  fn test_repeated_calls_are_identical() {
    let books: Vec<Book> = (0..40)
      .map(|i| book(&i.to_string(), &format!("T{}", i % 7), (i % 5) as f64))
      .collect();
    let mut c = criteria();
    c.set_sort(SortKey::TitleDescending);
    c.set_page(2);

    let first = apply(&books, &c).unwrap();
    for _ in 0..5 {
      assert_eq!(apply(&books, &c).unwrap(), first);
    }
  }

  #[test]
  fn test_preset_wins_over_free_form_range() {
    let books = vec![
      book("cheap", "A", 50_000.0),
      book("mid", "B", 150_000.0),
      book("dear", "C", 700_000.0),
    ];

    let mut c = criteria();
    c.set_sort(SortKey::PriceAscending);
    c.set_price_range(PriceRange::new(Some(600_000.0), None));
    assert_eq!(ids(&apply(&books, &c).unwrap()), vec!["dear"]);

    c.set_preset(Some(PricePreset::new("100k-200k", 100_000.0, Some(200_000.0))));
    assert_eq!(ids(&apply(&books, &c).unwrap()), vec!["mid"]);

    c.set_preset(None);
    assert_eq!(ids(&apply(&books, &c).unwrap()), vec!["dear"]);
  }

  #[test]
  fn test_open_preset_has_no_upper_bound() {
    let books = vec![book("1", "A", 499_999.0), book("2", "B", 9_000_000.0)];
    let mut c = criteria();
    c.set_preset(Some(PricePreset::new("500k+", 500_000.0, None)));

    assert_eq!(ids(&apply(&books, &c).unwrap()), vec!["2"]);
  }

  #[test]
  fn test_search_keeps_sort_order() {
    let mut books = vec![
      book("1", "Rust in Action", 300.0),
      book("2", "Cooking", 100.0),
      book("3", "Programming Rust", 200.0),
      book("4", "Gardening", 50.0),
    ];
    books[3].author = "Rusty Smith".to_string();

    let mut c = criteria();
    c.set_sort(SortKey::PriceAscending);
    c.set_search("  RUST ");

    let page = apply(&books, &c).unwrap();
    assert_eq!(ids(&page), vec!["4", "3", "1"]);
    assert_eq!(page.total_count, 3);
  }

  #[test]
  fn test_search_ignores_description() {
    let mut b = book("1", "Title", 1.0);
    b.description = Some("a hidden word".to_string());
    let books = vec![b];

    let mut c = criteria();
    c.set_search("hidden");
    assert_eq!(apply(&books, &c).unwrap().total_count, 0);
  }

  #[test]
  fn test_newest_first_with_undated_last() {
    let mut old = book("old", "A", 1.0);
    old.created_at = Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
    let mut new = book("new", "B", 1.0);
    new.created_at = Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
    let undated = book("undated", "C", 1.0);
    let books = vec![undated, old, new];

    let page = apply(&books, &criteria()).unwrap();
    assert_eq!(ids(&page), vec!["new", "old", "undated"]);
  }

  #[test]
  fn test_title_order_is_case_insensitive() {
    let books = vec![
      book("1", "banana", 1.0),
      book("2", "Apple", 1.0),
      book("3", "cherry", 1.0),
      book("4", "apple", 1.0),
    ];
    let mut c = criteria();
    c.set_sort(SortKey::TitleAscending);
    assert_eq!(ids(&apply(&books, &c).unwrap()), vec!["2", "4", "1", "3"]);

    c.set_sort(SortKey::TitleDescending);
    assert_eq!(ids(&apply(&books, &c).unwrap()), vec!["3", "1", "4", "2"]);
  }

  #[test]
  fn test_accented_titles_sort_with_base_letters() {
    let books = vec![
      book("anh", "\u{C1}nh tr\u{103}ng", 1.0),
      book("bong", "B\u{F4}ng h\u{1ED3}ng", 1.0),
      book("zebra", "Zebra", 1.0),
      book("dat", "\u{110}\u{1EA5}t r\u{1EEB}ng", 1.0),
    ];
    let mut c = criteria();
    c.set_sort(SortKey::TitleAscending);
    assert_eq!(
      ids(&apply(&books, &c).unwrap()),
      vec!["anh", "bong", "dat", "zebra"]
    );

    c.set_sort(SortKey::TitleDescending);
    assert_eq!(
      ids(&apply(&books, &c).unwrap()),
      vec!["zebra", "dat", "bong", "anh"]
    );
  }

  #[test]
  fn test_accents_only_break_ties() {
    let books = vec![
      book("grave", "C\u{E0}", 1.0),
      book("plain", "Ca", 1.0),
      book("next", "Cb", 1.0),
    ];
    let mut c = criteria();
    c.set_sort(SortKey::TitleAscending);
    assert_eq!(ids(&apply(&books, &c).unwrap()), vec!["plain", "grave", "next"]);
  }

  #[test]
  fn test_facets_combine() {
    let mut a = book("a", "A", 10.0);
    a.category_ids = vec!["c1".to_string()];
    a.language = Some("vi".to_string());
    a.supplier = Some("Tre".to_string());
    let mut b = book("b", "B", 10.0);
    b.category_ids = vec!["c1".to_string(), "c2".to_string()];
    b.language = Some("vi".to_string());
    let mut c_book = book("c", "C", 10.0);
    c_book.category_ids = vec!["c2".to_string()];
    c_book.language = Some("en".to_string());
    c_book.supplier = Some("Tre".to_string());
    let books = vec![a, b, c_book];

    let mut c = criteria();
    c.set_sort(SortKey::TitleAscending);
    c.set_selected(Facet::Category, ["c1", "c2"]);
    c.toggle(Facet::Language, "vi");
    assert_eq!(ids(&apply(&books, &c).unwrap()), vec!["a", "b"]);

    c.toggle(Facet::Supplier, "Tre");
    assert_eq!(ids(&apply(&books, &c).unwrap()), vec!["a"]);
  }
}
