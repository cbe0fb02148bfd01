//! # Lifecycle
//!
//! Starting, wiring and stopping the catalog.
//!
//! [`CatalogSystem::new`] creates the three table actors first and injects
//! dependencies when they are run: `frames` receives the clients of
//! `frame_branches` and `lens_compatibility` so it can refuse to delete a
//! referenced frame. The dependents never call back, so the graph is acyclic
//! and [`CatalogSystem::shutdown`] only has to drop the clients:
//!
//! 1. **Drop all clients** - the request channels close
//! 2. **`frames` stops** - and drops the dependents' clients it held
//! 3. **Dependents stop**
//! 4. **Await completion** - a panicked table surfaces as `Err`
//!
//! Configuration comes from [`CatalogConfig::from_env`], logging from
//! [`setup_tracing`].

pub mod catalog_system;
pub mod config;
pub mod seed;
pub mod tracing;

pub use catalog_system::CatalogSystem;
pub use config::CatalogConfig;
pub use seed::{sample_catalog, seed_catalog};
pub use self::tracing::setup_tracing;
