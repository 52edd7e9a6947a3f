//! Catalog data core for a book storefront.
//!
//! - [`cache`]: time-boxed durable cache with stale fallback
//! - [`store`]: store API client, ingestion normalization and cached access
//! - [`listing`]: filter / sort / search / paginate pipeline
//! - [`session`]: objects built once at startup and passed explicitly

pub mod cache;
pub mod config;
pub mod error;
pub mod listing;
pub mod session;
pub mod store;

pub use error::{Error, Result};
