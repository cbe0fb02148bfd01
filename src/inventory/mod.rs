pub mod ledger;
pub mod overview;

pub use ledger::*;
pub use overview::{BranchUnits, InventoryOverview, LowStockItem};
