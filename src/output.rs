//! Plain-text rendering for the command line.

use chrono::{Duration, Utc};

use storefront::cache::{CacheResult, CacheSource};
use storefront::listing::{FilterCriteria, ListingPage};
use storefront::store::{Book, Category};

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Whole-unit price with thousands separators
pub fn format_price(price: f64) -> String {
  let units = price.round() as i64;
  let digits = units.unsigned_abs().to_string();

  let mut grouped = String::new();
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(ch);
  }

  if units < 0 {
    format!("-{}", grouped)
  } else {
    grouped
  }
}

/// Coarse human-readable age, e.g. "42s", "7m", "3h", "2d"
pub fn format_age(age: Duration) -> String {
  let secs = age.num_seconds().max(0);
  match secs {
    s if s < 60 => format!("{}s", s),
    s if s < 3_600 => format!("{}m", s / 60),
    s if s < 86_400 => format!("{}h", s / 3_600),
    s => format!("{}d", s / 86_400),
  }
}

pub fn book_line(book: &Book) -> String {
  format!(
    "{:<12} {:>12}  {:<40} {}",
    truncate(&book.id, 12),
    format_price(book.price),
    truncate(&book.title, 40),
    truncate(&book.author, 30)
  )
}

pub fn print_page(page: &ListingPage<'_>, criteria: &FilterCriteria) {
  println!(
    "Page {}/{} ({} books, sorted by {})",
    criteria.page, page.total_pages, page.total_count, criteria.sort
  );

  if page.items.is_empty() {
    if page.total_count > 0 {
      println!("No books on this page.");
    } else {
      println!("No books found.");
    }
    return;
  }

  for book in &page.items {
    println!("{}", book_line(book));
  }
}

pub fn print_categories(categories: &[Category]) {
  if categories.is_empty() {
    println!("No categories found.");
    return;
  }

  for category in categories {
    match &category.parent_id {
      Some(parent) => println!("{:<24} {} (in {})", category.id, category.name, parent),
      None => println!("{:<24} {}", category.id, category.name),
    }
  }
}

/// Notice describing a degraded or failed load, if any.
pub fn source_notice<T>(result: &CacheResult<T>) -> Option<String> {
  let error = match &result.error {
    Some(e) if e.is_network() => format!("store request failed: {}", e),
    Some(e) => e.to_string(),
    None => String::new(),
  };

  match result.source {
    CacheSource::Network | CacheSource::Cache => None,
    CacheSource::Offline => {
      let age = result
        .cached_at
        .map(|at| format_age(Utc::now() - at))
        .unwrap_or_else(|| "?".to_string());
      Some(format!(
        "Showing cached data from {} ago; {}",
        age, error
      ))
    }
    CacheSource::Unavailable => Some(format!(
      "Could not load data: {}. Run the command again to retry.",
      error
    )),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use storefront::Error;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_multibyte() {
    assert_eq!(
      truncate("M\u{1EAF}t Bi\u{1EBF}c c\u{1EE7}a t\u{F4}i", 8),
      "M\u{1EAF}t B..."
    );
  }

  #[test]
  fn test_format_price() {
    assert_eq!(format_price(0.0), "0");
    assert_eq!(format_price(999.0), "999");
    assert_eq!(format_price(1000.0), "1,000");
    assert_eq!(format_price(89_000.4), "89,000");
    assert_eq!(format_price(1_234_567.0), "1,234,567");
    assert_eq!(format_price(-5_000.0), "-5,000");
  }

  #[test]
  fn test_format_age() {
    assert_eq!(format_age(Duration::seconds(42)), "42s");
    assert_eq!(format_age(Duration::minutes(7)), "7m");
    assert_eq!(format_age(Duration::hours(3)), "3h");
    assert_eq!(format_age(Duration::days(2)), "2d");
    assert_eq!(format_age(Duration::seconds(-5)), "0s");
  }

  #[test]
  fn test_source_notice() {
    let fresh: CacheResult<Vec<Book>> = CacheResult::from_network(Vec::new());
    assert_eq!(source_notice(&fresh), None);

    let offline: CacheResult<Vec<Book>> = CacheResult::offline(
      Vec::new(),
      Utc::now() - Duration::minutes(10),
      Error::InvalidCriteria("x".to_string()),
    );
    let notice = source_notice(&offline).unwrap();
    assert!(notice.starts_with("Showing cached data from 10m ago"));
    assert!(!notice.contains("store request failed"));

    let unreachable: CacheResult<Vec<Book>> = CacheResult::offline(
      Vec::new(),
      Utc::now() - Duration::hours(2),
      Error::Status {
        status: 503,
        url: "https://books.test/api/books".to_string(),
      },
    );
    let notice = source_notice(&unreachable).unwrap();
    assert!(notice.starts_with("Showing cached data from 2h ago; store request failed"));

    let failed: CacheResult<Vec<Book>> = CacheResult::unavailable(Error::Status {
      status: 500,
      url: "https://books.test/api/books".to_string(),
    });
    assert!(source_notice(&failed).unwrap().contains("500"));
  }
}
