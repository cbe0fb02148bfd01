//! # Stock Ledger
//!
//! Per-branch quantity and low-stock threshold for one frame, with the
//! availability status derived from the two. A status is never set on its
//! own: every write goes through [`BranchStock::new`].

use crate::model::{FrameId, Product};
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockStatus {
    #[serde(rename = "In stock")]
    InStock,
    Limited,
    #[serde(rename = "Out of stock")]
    OutOfStock,
}

impl StockStatus {
    pub fn derive(quantity: u32, threshold: u32) -> Self {
        if quantity == 0 {
            StockStatus::OutOfStock
        } else if quantity <= threshold {
            StockStatus::Limited
        } else {
            StockStatus::InStock
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In stock",
            StockStatus::Limited => "Limited",
            StockStatus::OutOfStock => "Out of stock",
        }
    }
}

/// Stock of one frame at one branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchStock {
    quantity: u32,
    low_stock_threshold: u32,
    status: StockStatus,
}

impl BranchStock {
    pub fn new(quantity: u32, low_stock_threshold: u32) -> Self {
        Self {
            quantity,
            low_stock_threshold,
            status: StockStatus::derive(quantity, low_stock_threshold),
        }
    }

    /// What a branch without a record holds.
    pub fn empty() -> Self {
        Self::new(0, DEFAULT_LOW_STOCK_THRESHOLD)
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn low_stock_threshold(&self) -> u32 {
        self.low_stock_threshold
    }

    pub fn status(&self) -> StockStatus {
        self.status
    }

    /// `0 < quantity <= threshold`.
    pub fn is_low(&self) -> bool {
        self.status == StockStatus::Limited
    }
}

/// Branch id → stock. Branches without an entry hold nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StockLedger {
    entries: BTreeMap<String, BranchStock>,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the branch's record and returns it with its fresh status.
    pub fn set_stock(&mut self, branch_id: &str, quantity: u32, threshold: u32) -> BranchStock {
        let stock = BranchStock::new(quantity, threshold);
        self.entries.insert(branch_id.to_string(), stock);
        stock
    }

    pub fn get(&self, branch_id: &str) -> BranchStock {
        self.entries
            .get(branch_id)
            .copied()
            .unwrap_or_else(BranchStock::empty)
    }

    pub fn contains(&self, branch_id: &str) -> bool {
        self.entries.contains_key(branch_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BranchStock)> {
        self.entries.iter().map(|(id, stock)| (id.as_str(), stock))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_stock(&self) -> u64 {
        self.entries.values().map(|s| u64::from(s.quantity)).sum()
    }
}

/// Sets one frame's stock inside a product list. Returns `None` when the
/// frame is not in the list.
pub fn set_stock(
    products: &mut [Product],
    product_id: FrameId,
    branch_id: &str,
    quantity: u32,
    threshold: u32,
) -> Option<BranchStock> {
    products
        .iter_mut()
        .find(|p| p.id == product_id)
        .map(|p| p.set_stock(branch_id, quantity, threshold))
}

pub fn total_stock(product: &Product) -> u64 {
    product.stock_per_branch.total_stock()
}

/// How many products are running low at `branch_id`.
pub fn low_stock_alerts(branch_id: &str, products: &[Product]) -> usize {
    products
        .iter()
        .filter(|p| p.stock_per_branch.get(branch_id).is_low())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{default_branches, ProductDraft, ProductStatus};

    #[test]
    fn test_status_derivation() {
        assert_eq!(StockStatus::derive(0, 5), StockStatus::OutOfStock);
        assert_eq!(StockStatus::derive(0, 0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::derive(5, 5), StockStatus::Limited);
        assert_eq!(StockStatus::derive(1, 5), StockStatus::Limited);
        assert_eq!(StockStatus::derive(6, 5), StockStatus::InStock);
        assert_eq!(StockStatus::derive(1, 0), StockStatus::InStock);
    }

    #[test]
    fn test_set_stock_recomputes_status() {
        let mut ledger = StockLedger::new();
        assert_eq!(ledger.set_stock("b1", 10, 5).status(), StockStatus::InStock);
        assert_eq!(ledger.set_stock("b1", 3, 5).status(), StockStatus::Limited);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get("b1").quantity(), 3);
    }

    #[test]
    fn test_absent_branch_is_out_of_stock() {
        let ledger = StockLedger::new();
        let stock = ledger.get("nowhere");
        assert_eq!(stock.quantity(), 0);
        assert_eq!(stock.status(), StockStatus::OutOfStock);
        assert!(!ledger.contains("nowhere"));
    }

    #[test]
    fn test_total_stock_sums_branches() {
        let mut ledger = StockLedger::new();
        ledger.set_stock("b1", 4, 5);
        ledger.set_stock("b2", 0, 5);
        ledger.set_stock("b3", 11, 2);
        assert_eq!(ledger.total_stock(), 15);
    }

    #[test]
    fn test_set_stock_in_product_list() {
        let branches = default_branches();
        let draft = ProductDraft::new(&branches, 5);
        let mut products = vec![
            draft.to_product(FrameId(1), ProductStatus::Active, 1000.0),
            draft.to_product(FrameId(2), ProductStatus::Active, 1000.0),
        ];
        let home = branches[0].id.as_str();
        set_stock(&mut products, FrameId(2), home, 8, 5);

        let stock = set_stock(&mut products, FrameId(2), home, 2, 5).unwrap();
        assert_eq!(stock.status(), StockStatus::Limited);
        assert_eq!(products[1].stock_per_branch.get(home), stock);
        assert_eq!(products[1].total_stock(), 2);
        assert_eq!(products[0].total_stock(), 0);
        assert_eq!(products[0].stock_per_branch.get(home).status(), StockStatus::OutOfStock);

        assert!(set_stock(&mut products, FrameId(9), home, 4, 5).is_none());
        assert_eq!(total_stock(&products[0]) + total_stock(&products[1]), 2);
    }

    #[test]
    fn test_status_serializes_as_label() {
        let json = serde_json::to_string(&StockStatus::OutOfStock).unwrap();
        assert_eq!(json, "\"Out of stock\"");
    }
}
