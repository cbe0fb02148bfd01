//! # Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter whose
//! level comes from `RUST_LOG`.
//!
//! ```bash
//! # Loads, writes and reconciles
//! RUST_LOG=info cargo run
//!
//! # Every table statement and change notification
//! RUST_LOG=debug cargo run
//!
//! # Only the catalog store
//! RUST_LOG=frame_catalog::catalog=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a save reads like:
//!
//! ```text
//! INFO save{surface=Admin sku="SV-AST-01" id=None}: Saved id=frame_1 price=3825
//! INFO Catalog loaded surface=Admin count=1
//! ```
//!
//! The store's write methods open a span carrying the surface and the SKU, so
//! every statement a write issues is nested under it. The reconciling load
//! runs in its own task and logs without a parent span.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // the span names already say which table or store
        .compact()
        .init();
}
