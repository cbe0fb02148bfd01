//! # Catalog
//!
//! The Catalog Store and the read-side helpers the shop and homepage run over
//! its snapshots.

pub mod error;
pub mod promo;
pub mod query;
pub mod records;
pub mod store;

pub use error::{CatalogError, Field, ValidationErrors};
pub use promo::{is_promoted, select_promoted, DEFAULT_PROMO_LIMIT};
pub use query::{filter, sort_products, unique_colors, CatalogFilter, CategoryFilter, SortKey};
pub use store::{clone_sku, CatalogStore, Surface};
