//! Back-office inventory overview.
//!
//! Aggregates over the admin snapshot: status counts, units per branch, the
//! items running low, ZEISS coverage and merchandising flag counts.

use crate::model::{Branch, Product, ProductStatus};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchUnits {
    pub branch_id: String,
    pub branch_name: String,
    pub units: u64,
    /// Rounded share of all units.
    pub share_percent: u32,
    pub low_stock_alerts: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockItem {
    pub sku: String,
    pub name: String,
    pub branch_name: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryOverview {
    pub active: usize,
    pub drafts: usize,
    pub archived: usize,
    pub total_units: u64,
    pub branches: Vec<BranchUnits>,
    pub low_stock: Vec<LowStockItem>,
    pub zeiss_share_percent: u32,
    pub new_count: usize,
    pub popular_count: usize,
}

fn rounded_percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

impl InventoryOverview {
    pub fn compute(products: &[Product], branches: &[Branch]) -> Self {
        let count = |status: ProductStatus| products.iter().filter(|p| p.status == status).count();
        let total_units: u64 = products.iter().map(Product::total_stock).sum();

        let branch_units = branches
            .iter()
            .map(|branch| {
                let units = products
                    .iter()
                    .map(|p| u64::from(p.stock_per_branch.get(&branch.id).quantity()))
                    .sum();
                BranchUnits {
                    branch_id: branch.id.clone(),
                    branch_name: branch.name.clone(),
                    units,
                    share_percent: rounded_percent(units, total_units),
                    low_stock_alerts: super::low_stock_alerts(&branch.id, products),
                }
            })
            .collect();

        let low_stock = products
            .iter()
            .flat_map(|p| {
                branches.iter().filter_map(move |branch| {
                    let stock = p.stock_per_branch.get(&branch.id);
                    stock.is_low().then(|| LowStockItem {
                        sku: p.sku.clone(),
                        name: p.name.clone(),
                        branch_name: branch.name.clone(),
                        quantity: stock.quantity(),
                    })
                })
            })
            .collect();

        let zeiss = products.iter().filter(|p| p.is_zeiss_compatible).count();

        Self {
            active: count(ProductStatus::Active),
            drafts: count(ProductStatus::Draft),
            archived: count(ProductStatus::Archived),
            total_units,
            branches: branch_units,
            low_stock,
            zeiss_share_percent: rounded_percent(zeiss as u64, products.len() as u64),
            new_count: products.iter().filter(|p| p.homepage_flags.is_new).count(),
            popular_count: products.iter().filter(|p| p.homepage_flags.is_popular).count(),
        }
    }
}
