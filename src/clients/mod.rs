//! # Clients
//!
//! Typed wrappers around the generic table clients, and the
//! [`CatalogBackend`] seam built from them.

pub mod backend;
pub mod error;
pub mod frame_client;
pub mod frame_scoped;
pub mod lens_client;
pub mod stock_client;

pub use backend::{CatalogBackend, TableBackend};
pub use error::BackendError;
pub use frame_client::FrameClient;
pub use frame_scoped::FrameScopedClient;
pub use lens_client::LensClient;
pub use stock_client::StockClient;
