//! # Backing Tables
//!
//! Row types for the three tables behind the catalog:
//!
//! | Table                | Key                     | Context                     |
//! |----------------------|-------------------------|-----------------------------|
//! | `frames`             | [`FrameId`] (generated) | stock + lens table clients  |
//! | `frame_branches`     | `(frame_id, branch_id)` | `()`                        |
//! | `lens_compatibility` | serial (generated)      | `()`                        |
//!
//! Only `frames` has a context: it needs the two dependent tables to refuse
//! deleting a frame they still reference. The dependents never call back, so
//! the wiring stays acyclic and closing the clients shuts every table down.

pub mod frame;
pub mod lens;
pub mod stock;

pub use frame::FrameRow;
pub use lens::LensRow;
pub use stock::{StockKey, StockRow};

use crate::model::FrameId;
use table_actor::TableRow;

/// Rows that belong to a single frame.
pub trait FrameScoped: TableRow {
    fn frame_id(&self) -> FrameId;
}

/// A `frames` row joined with the rows that reference it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameRecord {
    pub frame: FrameRow,
    pub branches: Vec<StockRow>,
    pub lenses: Vec<LensRow>,
}
