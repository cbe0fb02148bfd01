//! The editable form state of a frame.
//!
//! A [`ProductDraft`] holds the list price, not the selling price. The selling
//! price is derived when the draft is saved, from the promotion fields, and is
//! never read back from the draft.

use crate::catalog::error::{Field, ValidationErrors};
use crate::inventory::{BranchStock, StockLedger};
use crate::model::{
    Branch, Category, Collection, DiscountType, FrameId, FrameShape, Gender, HomepageFlags,
    Material, Product, ProductStatus, RimType, DEFAULT_BRAND,
};
use crate::pricing::{compute_final_price, Discount};
use std::collections::BTreeSet;

pub const DEFAULT_LENS: &str = "Single Vision";

#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    /// `None` until the frame has been saved once.
    pub id: Option<FrameId>,
    pub sku: String,
    pub name: String,
    pub brand: String,
    pub collection: Collection,
    pub category: Category,
    pub gender: Gender,
    pub shape: FrameShape,
    pub material: Material,
    pub rim_type: RimType,
    price: f64,
    original_price: Option<f64>,
    discount_type: Option<DiscountType>,
    pub discount_value: f64,
    pub image: String,
    pub additional_images: Vec<String>,
    pub is_zeiss_compatible: bool,
    pub lens_compatibility: BTreeSet<String>,
    pub colors: Vec<String>,
    pub homepage_flags: HomepageFlags,
    pub stock_per_branch: StockLedger,
}

impl ProductDraft {
    /// A blank draft with an empty stock record for every branch.
    pub fn new(branches: &[Branch], low_stock_threshold: u32) -> Self {
        let mut stock_per_branch = StockLedger::new();
        for branch in branches {
            stock_per_branch.set_stock(&branch.id, 0, low_stock_threshold);
        }

        Self {
            id: None,
            sku: String::new(),
            name: String::new(),
            brand: DEFAULT_BRAND.to_string(),
            collection: Collection::default(),
            category: Category::default(),
            gender: Gender::default(),
            shape: FrameShape::default(),
            material: Material::default(),
            rim_type: RimType::default(),
            price: 0.0,
            original_price: None,
            discount_type: None,
            discount_value: 0.0,
            image: String::new(),
            additional_images: Vec::new(),
            is_zeiss_compatible: true,
            lens_compatibility: BTreeSet::from([DEFAULT_LENS.to_string()]),
            colors: Vec::new(),
            homepage_flags: HomepageFlags {
                is_new: true,
                ..HomepageFlags::default()
            },
            stock_per_branch,
        }
    }

    /// Opens an existing frame for editing.
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: Some(product.id),
            sku: product.sku.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            collection: product.collection,
            category: product.category,
            gender: product.gender,
            shape: product.shape,
            material: product.material,
            rim_type: product.rim_type,
            price: product.list_price(),
            original_price: product.original_price,
            discount_type: product.discount_type,
            discount_value: product.discount_value,
            image: product.image.clone(),
            additional_images: product.additional_images.clone(),
            is_zeiss_compatible: product.is_zeiss_compatible,
            lens_compatibility: product.lens_compatibility.clone(),
            colors: product.colors.clone(),
            homepage_flags: product.homepage_flags,
            stock_per_branch: product.stock_per_branch.clone(),
        }
    }

    /// List price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Sets the list price. While a promotion runs the discount base follows it.
    pub fn set_price(&mut self, price: f64) {
        self.price = price;
        if self.original_price.is_some() {
            self.original_price = Some(price);
        }
    }

    pub fn original_price(&self) -> Option<f64> {
        self.original_price
    }

    pub fn discount_type(&self) -> Option<DiscountType> {
        self.discount_type
    }

    /// Changes the discount kind of a running promotion. Ignored otherwise.
    pub fn set_discount_type(&mut self, kind: DiscountType) {
        if self.promotion_enabled() {
            self.discount_type = Some(kind);
        }
    }

    pub fn promotion_enabled(&self) -> bool {
        self.original_price.is_some()
    }

    pub fn enable_promotion(&mut self) {
        self.original_price = Some(self.price);
        self.discount_type = Some(DiscountType::Percentage);
        self.discount_value = 0.0;
        self.homepage_flags.is_discount_promo = true;
    }

    pub fn disable_promotion(&mut self) {
        self.original_price = None;
        self.discount_type = None;
        self.discount_value = 0.0;
        self.homepage_flags.is_discount_promo = false;
    }

    pub fn toggle_promotion(&mut self) {
        if self.promotion_enabled() {
            self.disable_promotion();
        } else {
            self.enable_promotion();
        }
    }

    pub fn set_stock(&mut self, branch_id: &str, quantity: u32, threshold: u32) -> BranchStock {
        self.stock_per_branch.set_stock(branch_id, quantity, threshold)
    }

    pub fn discount(&self) -> Option<Discount> {
        match (self.original_price, self.discount_type) {
            (Some(original_price), Some(kind)) => Some(Discount {
                original_price,
                kind,
                value: self.discount_value,
            }),
            _ => None,
        }
    }

    /// The selling price this draft would be saved with.
    pub fn final_price(&self) -> f64 {
        compute_final_price(self.price, self.discount().as_ref())
    }

    /// Lens types worth storing: trimmed, non-empty, deduplicated.
    pub fn lens_types(&self) -> Vec<String> {
        self.lens_compatibility
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Checks the fields a frame cannot be saved without.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.sku.trim().is_empty() {
            errors.add(Field::Sku, "SKU is required");
        }
        if self.name.trim().is_empty() {
            errors.add(Field::Name, "Name is required");
        }
        if !(self.price.is_finite() && self.price > 0.0) {
            errors.add(Field::Price, "Price must be greater than 0");
        }
        if self.image.trim().is_empty() {
            errors.add(Field::Image, "Image is required");
        }
        errors.into_result()
    }

    /// The frame as it looks after a successful save.
    pub fn to_product(&self, id: FrameId, status: ProductStatus, final_price: f64) -> Product {
        let mut homepage_flags = self.homepage_flags;
        homepage_flags.is_discount_promo = self.promotion_enabled();

        Product {
            id,
            sku: self.sku.trim().to_string(),
            name: self.name.trim().to_string(),
            brand: self.brand.clone(),
            collection: self.collection,
            category: self.category,
            gender: self.gender,
            shape: self.shape,
            material: self.material,
            rim_type: self.rim_type,
            price: final_price,
            original_price: self.original_price,
            discount_type: self.discount_type,
            discount_value: self.discount_value,
            image: self.image.clone(),
            additional_images: self.additional_images.clone(),
            is_zeiss_compatible: self.is_zeiss_compatible,
            lens_compatibility: self.lens_types().into_iter().collect(),
            colors: self.colors.clone(),
            homepage_flags,
            status,
            stock_per_branch: self.stock_per_branch.clone(),
            created_at: None,
        }
    }
}
