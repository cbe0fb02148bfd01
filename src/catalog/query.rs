//! # Catalog Query Engine
//!
//! Pure filtering, search and sorting over a catalog snapshot. Every
//! function keeps the input order of the products it returns.
//!
//! Filters compose with AND across dimensions; the search text matches with
//! OR across name, brand and SKU, case-insensitively.

use crate::model::{Category, FrameShape, Product};
use std::collections::HashSet;

pub const SHOP_PRICE_MIN: f64 = 500.0;
pub const SHOP_PRICE_MAX: f64 = 25_000.0;

/// The category tabs shown to shoppers, and the category each one selects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    AllFrames,
    Eyeglasses,
    Sunglasses,
    ZeissLenses,
}

impl CategoryFilter {
    pub const ALL: [CategoryFilter; 4] = [
        CategoryFilter::AllFrames,
        CategoryFilter::Eyeglasses,
        CategoryFilter::Sunglasses,
        CategoryFilter::ZeissLenses,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::AllFrames => "All Frames",
            CategoryFilter::Eyeglasses => "Eyeglasses",
            CategoryFilter::Sunglasses => "Sunglasses",
            CategoryFilter::ZeissLenses => "ZEISS Lenses",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    /// `None` means no category restriction.
    pub fn category(&self) -> Option<Category> {
        match self {
            CategoryFilter::AllFrames => None,
            CategoryFilter::Eyeglasses => Some(Category::Frames),
            CategoryFilter::Sunglasses => Some(Category::Sunglasses),
            CategoryFilter::ZeissLenses => Some(Category::Lenses),
        }
    }
}

/// Filter criteria. The default restricts nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    pub category: CategoryFilter,
    /// `None` is "All Shapes".
    pub shape: Option<FrameShape>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub color: Option<String>,
    pub search_text: String,
}

impl CatalogFilter {
    /// What the shop shows before the shopper touches anything.
    pub fn shop_default() -> Self {
        Self {
            price_min: Some(SHOP_PRICE_MIN),
            price_max: Some(SHOP_PRICE_MAX),
            ..Self::default()
        }
    }

    /// Back-office quick search: search text only.
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search_text: text.into(),
            ..Self::default()
        }
    }

    /// "Clear all" in the shop.
    pub fn clear(&mut self) {
        *self = Self::shop_default();
    }

    /// Whether the shop should offer "clear all".
    pub fn is_narrowed(&self) -> bool {
        self.category != CategoryFilter::AllFrames
            || self.shape.is_some()
            || self.price_min.is_some_and(|min| min > SHOP_PRICE_MIN)
            || self.price_max.is_some_and(|max| max < SHOP_PRICE_MAX)
            || self.color.is_some()
            || !self.search_text.trim().is_empty()
    }

    pub fn matches(&self, product: &Product) -> bool {
        let query = self.search_text.trim().to_lowercase();
        self.matches_with(product, &query)
    }

    fn matches_with(&self, product: &Product, query: &str) -> bool {
        if let Some(category) = self.category.category() {
            if product.category != category {
                return false;
            }
        }
        if !query.is_empty()
            && ![&product.name, &product.brand, &product.sku]
                .iter()
                .any(|field| field.to_lowercase().contains(query))
        {
            return false;
        }
        if let Some(shape) = self.shape {
            if product.shape != shape {
                return false;
            }
        }
        if self.price_min.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.price_max.is_some_and(|max| product.price > max) {
            return false;
        }
        if let Some(color) = &self.color {
            if !product.colors.contains(color) {
                return false;
            }
        }
        true
    }
}

/// Products matching `criteria`, in input order.
pub fn filter(products: &[Product], criteria: &CatalogFilter) -> Vec<Product> {
    let query = criteria.search_text.trim().to_lowercase();
    products
        .iter()
        .filter(|p| criteria.matches_with(p, &query))
        .cloned()
        .collect()
}

/// Distinct color tokens in first-seen order.
pub fn unique_colors(products: &[Product]) -> Vec<String> {
    let mut seen = HashSet::new();
    products
        .iter()
        .flat_map(|p| p.colors.iter())
        .filter(|c| !c.is_empty() && seen.insert(c.as_str()))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Snapshot order, which is newest first.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    StockDesc,
}

/// Stable sort: products that compare equal keep their relative order.
pub fn sort_products(products: &mut [Product], key: SortKey) {
    match key {
        SortKey::Newest => {}
        SortKey::PriceAsc => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortKey::PriceDesc => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortKey::StockDesc => products.sort_by(|a, b| b.total_stock().cmp(&a.total_stock())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{default_branches, FrameId, ProductDraft, ProductStatus};

    fn product(id: u32, name: &str, brand: &str, price: f64, shape: FrameShape) -> Product {
        let mut draft = ProductDraft::new(&default_branches(), 5);
        draft.sku = format!("SV-{:03}", id);
        draft.name = name.into();
        draft.brand = brand.into();
        draft.shape = shape;
        draft.to_product(FrameId(id), ProductStatus::Active, price)
    }

    fn ids(products: &[Product]) -> Vec<u32> {
        products.iter().map(|p| p.id.0).collect()
    }

    #[test]
    fn test_filter_composition() {
        let a = product(1, "Aster", "SamVision Elite", 1000.0, FrameShape::Round);
        let b = product(2, "Bolt", "Zeiss Vision", 5000.0, FrameShape::Square);
        let products = vec![a, b];

        let mut criteria = CatalogFilter {
            price_min: Some(0.0),
            price_max: Some(2000.0),
            ..CatalogFilter::default()
        };
        assert_eq!(ids(&filter(&products, &criteria)), vec![1]);

        criteria.shape = Some(FrameShape::Square);
        assert!(filter(&products, &criteria).is_empty());

        let criteria = CatalogFilter::search("zeiss");
        assert_eq!(ids(&filter(&products, &criteria)), vec![2]);
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let products = vec![
            product(1, "A", "x", 500.0, FrameShape::Round),
            product(2, "B", "x", 25_000.0, FrameShape::Round),
            product(3, "C", "x", 25_000.01, FrameShape::Round),
            product(4, "D", "x", 499.99, FrameShape::Round),
        ];
        assert_eq!(ids(&filter(&products, &CatalogFilter::shop_default())), vec![1, 2]);
    }

    #[test]
    fn test_category_tabs_translate() {
        let mut sunglasses = product(1, "Shade", "x", 900.0, FrameShape::Aviator);
        sunglasses.category = Category::Sunglasses;
        let frames = product(2, "Clear", "x", 900.0, FrameShape::Round);
        let products = vec![sunglasses, frames];

        let by_tab = |label: &str| {
            let criteria = CatalogFilter {
                category: CategoryFilter::from_label(label).unwrap(),
                ..CatalogFilter::default()
            };
            ids(&filter(&products, &criteria))
        };
        assert_eq!(by_tab("Eyeglasses"), vec![2]);
        assert_eq!(by_tab("Sunglasses"), vec![1]);
        assert!(by_tab("ZEISS Lenses").is_empty());
        assert_eq!(by_tab("All Frames"), vec![1, 2]);
    }

    #[test]
    fn test_search_matches_sku_case_insensitively() {
        let products = vec![
            product(7, "Aster", "x", 900.0, FrameShape::Round),
            product(8, "Bolt", "x", 900.0, FrameShape::Round),
        ];
        let criteria = CatalogFilter::search("  sv-008 ");
        assert_eq!(ids(&filter(&products, &criteria)), vec![8]);
    }

    #[test]
    fn test_color_filter_and_unique_colors() {
        let mut a = product(1, "A", "x", 900.0, FrameShape::Round);
        a.colors = vec!["#000000".into(), "#8B4513".into()];
        let mut b = product(2, "B", "x", 900.0, FrameShape::Round);
        b.colors = vec!["#8B4513".into(), "#C0C0C0".into()];
        let products = vec![a, b];

        assert_eq!(unique_colors(&products), vec!["#000000", "#8B4513", "#C0C0C0"]);

        let criteria = CatalogFilter {
            color: Some("#C0C0C0".into()),
            ..CatalogFilter::default()
        };
        assert_eq!(ids(&filter(&products, &criteria)), vec![2]);
    }

    #[test]
    fn test_clear_restores_shop_default() {
        let mut criteria = CatalogFilter::shop_default();
        assert!(!criteria.is_narrowed());
        criteria.shape = Some(FrameShape::CatEye);
        criteria.price_max = Some(3000.0);
        assert!(criteria.is_narrowed());
        criteria.clear();
        assert_eq!(criteria, CatalogFilter::shop_default());
    }

    #[test]
    fn test_sorting_is_stable() {
        let mut products = vec![
            product(1, "A", "x", 900.0, FrameShape::Round),
            product(2, "B", "x", 300.0, FrameShape::Round),
            product(3, "C", "x", 900.0, FrameShape::Round),
        ];
        sort_products(&mut products, SortKey::PriceDesc);
        assert_eq!(ids(&products), vec![1, 3, 2]);
        sort_products(&mut products, SortKey::PriceAsc);
        assert_eq!(ids(&products), vec![2, 1, 3]);

        products[2].set_stock("b1", 4, 5);
        sort_products(&mut products, SortKey::StockDesc);
        assert_eq!(ids(&products), vec![3, 2, 1]);
    }
}
