use crate::inventory::StockLedger;
use crate::model::FrameId;
use crate::tables::FrameScoped;
use serde::{Deserialize, Serialize};
use std::fmt;
use table_actor::TableRow;

/// Composite key of `frame_branches`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StockKey {
    pub frame_id: FrameId,
    pub branch_id: String,
}

impl fmt::Display for StockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.frame_id, self.branch_id)
    }
}

/// One row of `frame_branches`: a frame's stock at one branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRow {
    pub frame_id: FrameId,
    pub branch_id: String,
    pub stock_quantity: Option<i64>,
    pub low_stock_threshold: Option<i64>,
}

impl StockRow {
    /// One row per branch present in `ledger`.
    pub fn from_ledger(frame_id: FrameId, ledger: &StockLedger) -> Vec<Self> {
        ledger
            .iter()
            .map(|(branch_id, stock)| Self {
                frame_id,
                branch_id: branch_id.to_string(),
                stock_quantity: Some(i64::from(stock.quantity())),
                low_stock_threshold: Some(i64::from(stock.low_stock_threshold())),
            })
            .collect()
    }
}

impl TableRow for StockRow {
    const TABLE: &'static str = "frame_branches";
    type Key = StockKey;
    type Context = ();

    fn key(&self) -> Option<StockKey> {
        Some(StockKey {
            frame_id: self.frame_id,
            branch_id: self.branch_id.clone(),
        })
    }
}

impl FrameScoped for StockRow {
    fn frame_id(&self) -> FrameId {
        self.frame_id
    }
}
