//! Represents a sellable frame in the catalog.
//!
//! A [`Product`] is the strongly typed form of a `frames` row joined with its
//! `frame_branches` and `lens_compatibility` rows. It is only ever built by the
//! decoding step in [`catalog::records`](crate::catalog::records) or from a
//! saved [`ProductDraft`](crate::model::ProductDraft), so every field already
//! holds a usable value.
use crate::inventory::{BranchStock, StockLedger};
use crate::pricing::Discount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;

/// Type-safe identifier for frames, assigned by the `frames` table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FrameId(pub u32);

impl From<u32> for FrameId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for FrameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "frame_{}", self.0)
    }
}

/// Closed enums whose serialized form is the display label stored in the
/// backing table ("Full Rim", "Cat-Eye", ...).
macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_label(label: &str) -> Option<Self> {
                match label {
                    $($label => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

labelled_enum!(
    /// Merchandising collection a frame is marketed under.
    Collection {
        NewArrival => "New Arrival",
        Popular => "Popular",
        Premium => "Premium",
        Budget => "Budget",
        LimitedEdition => "Limited Edition",
    }
);

labelled_enum!(
    Category {
        Frames => "frames",
        Sunglasses => "sunglasses",
        Lenses => "lenses",
    }
);

labelled_enum!(
    Gender {
        Men => "Men",
        Women => "Women",
        Unisex => "Unisex",
        Kids => "Kids",
    }
);

labelled_enum!(
    FrameShape {
        Round => "Round",
        Rectangle => "Rectangle",
        Square => "Square",
        CatEye => "Cat-Eye",
        Aviator => "Aviator",
        Oversized => "Oversized",
    }
);

labelled_enum!(
    Material {
        Acetate => "Acetate",
        Metal => "Metal",
        Titanium => "Titanium",
        Mixed => "Mixed",
    }
);

labelled_enum!(
    RimType {
        FullRim => "Full Rim",
        SemiRimless => "Semi Rimless",
        Rimless => "Rimless",
    }
);

labelled_enum!(
    /// Lifecycle state. Only `Active` frames reach the shop and the homepage.
    ProductStatus {
        Draft => "Draft",
        Active => "Active",
        Archived => "Archived",
    }
);

labelled_enum!(
    DiscountType {
        Percentage => "Percentage",
        FixedAmount => "Fixed Amount",
    }
);

impl Default for Collection {
    fn default() -> Self {
        Collection::NewArrival
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Frames
    }
}

impl Default for Gender {
    fn default() -> Self {
        Gender::Unisex
    }
}

impl Default for FrameShape {
    fn default() -> Self {
        FrameShape::Rectangle
    }
}

impl Default for Material {
    fn default() -> Self {
        Material::Acetate
    }
}

impl Default for RimType {
    fn default() -> Self {
        RimType::FullRim
    }
}

impl Default for ProductStatus {
    fn default() -> Self {
        ProductStatus::Draft
    }
}

pub const DEFAULT_NAME: &str = "Unnamed Frame";
pub const DEFAULT_BRAND: &str = "SamVision Elite";

/// Independent homepage merchandising flags, stored as JSON on the frame row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomepageFlags {
    pub is_new: bool,
    pub is_popular: bool,
    pub is_discount_promo: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: FrameId,
    pub sku: String,
    pub name: String,
    pub brand: String,
    pub collection: Collection,
    pub category: Category,
    pub gender: Gender,
    pub shape: FrameShape,
    pub material: Material,
    pub rim_type: RimType,
    /// Current selling price (after any discount).
    pub price: f64,
    /// List price, present only while a promotion is active.
    pub original_price: Option<f64>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: f64,
    pub image: String,
    pub additional_images: Vec<String>,
    pub is_zeiss_compatible: bool,
    pub lens_compatibility: BTreeSet<String>,
    pub colors: Vec<String>,
    pub homepage_flags: HomepageFlags,
    pub status: ProductStatus,
    pub stock_per_branch: StockLedger,
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// The discount rule in force, if both halves of it are set.
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

    /// Price before any discount.
    pub fn list_price(&self) -> f64 {
        self.original_price.unwrap_or(self.price)
    }

    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }

    pub fn total_stock(&self) -> u64 {
        self.stock_per_branch.total_stock()
    }

    pub fn set_stock(&mut self, branch_id: &str, quantity: u32, threshold: u32) -> BranchStock {
        self.stock_per_branch.set_stock(branch_id, quantity, threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_back() {
        for shape in FrameShape::ALL {
            assert_eq!(FrameShape::from_label(shape.label()), Some(*shape));
        }
        assert_eq!(RimType::from_label("Semi Rimless"), Some(RimType::SemiRimless));
        assert_eq!(DiscountType::from_label("fixed"), None);
    }

    #[test]
    fn test_labels_are_serialized_names() {
        let json = serde_json::to_string(&Collection::LimitedEdition).unwrap();
        assert_eq!(json, "\"Limited Edition\"");
        let json = serde_json::to_string(&Category::Sunglasses).unwrap();
        assert_eq!(json, "\"sunglasses\"");
    }

    #[test]
    fn test_flags_fill_missing_keys() {
        let flags: HomepageFlags = serde_json::from_str(r#"{"isNew": true}"#).unwrap();
        assert!(flags.is_new);
        assert!(!flags.is_popular);
        assert!(!flags.is_discount_promo);
    }

    #[test]
    fn test_frame_id_display() {
        assert_eq!(FrameId(12).to_string(), "frame_12");
    }
}
