//! # Frame Catalog
//!
//! The inventory and pricing core of an optical retail site: frames, their
//! per-branch stock, their lens compatibility, and the derived prices the
//! shop displays.
//!
//! ## Core Components
//!
//! - **[model]**: strongly typed [`Product`](model::Product), branches and the editable draft.
//! - **[pricing]**: the pure Price Engine.
//! - **[inventory]**: the Stock Ledger and the admin overview aggregates.
//! - **[tables]**: the row types stored in the backing tables.
//! - **[clients]**: typed table clients and the [`CatalogBackend`](clients::CatalogBackend) seam.
//! - **[catalog]**: the Catalog Store, the Query Engine and the Promo Surface.
//! - **[lifecycle]**: configuration, tracing and the [`CatalogSystem`](lifecycle::CatalogSystem) assembly.
//!
//! ## Data Flow
//!
//! ```text
//! CatalogStore::save ──► frames / frame_branches / lens_compatibility tables
//!        ▲                                │
//!        └──── reconciling load() ◄───────┘
//!
//! CatalogStore::snapshot ──► catalog::query::filter ──► listings
//!                       └──► catalog::promo::select_promoted ──► homepage
//! ```

pub mod catalog;
pub mod clients;
pub mod inventory;
pub mod lifecycle;
pub mod model;
pub mod pricing;
pub mod tables;
