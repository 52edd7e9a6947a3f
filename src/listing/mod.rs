//! Client-side listing pipeline for the product grid.
//!
//! The pipeline is a pure function of `(books, criteria)`: no I/O, no hidden
//! state. Callers keep the criteria and re-run it on every change.

mod criteria;
mod facets;
mod pipeline;

pub use criteria::{
  FilterCriteria, PriceFilter, PricePreset, PriceRange, SortKey, DEFAULT_PAGE_SIZE,
};
pub use facets::Facet;
pub use pipeline::{apply, ListingPage};
