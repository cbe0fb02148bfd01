//! Decoding of joined frame records into [`Product`]s.
//!
//! This is the only place that knows the backing columns can be null or hold
//! labels the model does not recognise. Each gap is filled once, here:
//!
//! | Column                  | When missing or unknown          |
//! |-------------------------|----------------------------------|
//! | `id`                    | record dropped                   |
//! | `name`                  | "Unnamed Frame"                  |
//! | `brand`                 | "SamVision Elite"                |
//! | enum columns            | the enum's default               |
//! | `final_price`           | `price`, then 0                  |
//! | `is_zeiss_compatible`   | true                             |
//! | `flags`                 | all false                        |
//! | `stock_quantity`        | 0 (negatives clamp to 0)         |
//! | `low_stock_threshold`   | configured default; 0 is kept    |

use crate::inventory::StockLedger;
use crate::model::{
    Category, Collection, DiscountType, FrameShape, Gender, HomepageFlags, Material, Product,
    ProductStatus, RimType, DEFAULT_BRAND, DEFAULT_NAME,
};
use crate::tables::{FrameRecord, LensRow, StockRow};
use std::collections::BTreeSet;
use tracing::debug;

fn parse_or_default<T: Default>(value: Option<&str>, parse: fn(&str) -> Option<T>) -> T {
    value.and_then(parse).unwrap_or_default()
}

fn text_or(value: Option<&str>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn non_zero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

fn clamp_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

fn decode_flags(value: Option<&serde_json::Value>) -> HomepageFlags {
    value
        .filter(|v| v.is_object())
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default()
}

fn decode_stock(rows: &[StockRow], default_threshold: u32) -> StockLedger {
    let mut ledger = StockLedger::new();
    for row in rows.iter().filter(|r| !r.branch_id.is_empty()) {
        let quantity = clamp_u32(row.stock_quantity.unwrap_or(0));
        let threshold = match row.low_stock_threshold {
            Some(t) if t >= 0 => clamp_u32(t),
            _ => default_threshold,
        };
        ledger.set_stock(&row.branch_id, quantity, threshold);
    }
    ledger
}

fn decode_lenses(rows: &[LensRow]) -> BTreeSet<String> {
    rows.iter()
        .filter_map(|r| r.lens_type.as_deref())
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Maps one joined record, or `None` when it has no id.
pub fn decode_record(record: &FrameRecord, default_threshold: u32) -> Option<Product> {
    let frame = &record.frame;
    let Some(id) = frame.id else {
        debug!(sku = ?frame.sku, "Dropping frame without id");
        return None;
    };

    let list_price = non_zero(frame.price);
    let discount_type = frame.discount_type.as_deref().and_then(DiscountType::from_label);
    let price = non_zero(frame.final_price).or(list_price).unwrap_or(0.0);
    let original_price = discount_type.and(Some(list_price.unwrap_or(price)));

    Some(Product {
        id,
        sku: frame.sku.clone().unwrap_or_default(),
        name: text_or(frame.name.as_deref(), DEFAULT_NAME),
        brand: text_or(frame.brand.as_deref(), DEFAULT_BRAND),
        collection: parse_or_default(frame.collection.as_deref(), Collection::from_label),
        category: parse_or_default(frame.category.as_deref(), Category::from_label),
        gender: parse_or_default(frame.gender.as_deref(), Gender::from_label),
        shape: parse_or_default(frame.shape.as_deref(), FrameShape::from_label),
        material: parse_or_default(frame.material.as_deref(), Material::from_label),
        rim_type: parse_or_default(frame.rim_type.as_deref(), RimType::from_label),
        price,
        original_price,
        discount_type,
        discount_value: frame.discount_value.filter(|v| v.is_finite()).unwrap_or(0.0),
        image: frame.image.clone().unwrap_or_default(),
        additional_images: frame.additional_images.clone().unwrap_or_default(),
        is_zeiss_compatible: frame.is_zeiss_compatible.unwrap_or(true),
        lens_compatibility: decode_lenses(&record.lenses),
        colors: frame
            .colors
            .iter()
            .flatten()
            .filter(|c| !c.is_empty())
            .cloned()
            .collect(),
        homepage_flags: decode_flags(frame.flags.as_ref()),
        status: parse_or_default(frame.status.as_deref(), ProductStatus::from_label),
        stock_per_branch: decode_stock(&record.branches, default_threshold),
        created_at: frame.created_at,
    })
}

/// Maps every record, dropping those without an id. Order is kept.
pub fn decode_records(records: &[FrameRecord], default_threshold: u32) -> Vec<Product> {
    records
        .iter()
        .filter_map(|r| decode_record(r, default_threshold))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::StockStatus;
    use crate::model::FrameId;
    use crate::tables::FrameRow;

    fn bare(id: u32) -> FrameRecord {
        FrameRecord {
            frame: FrameRow {
                id: Some(FrameId(id)),
                ..FrameRow::default()
            },
            ..FrameRecord::default()
        }
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let product = decode_record(&bare(1), 5).unwrap();
        assert_eq!(product.name, "Unnamed Frame");
        assert_eq!(product.brand, "SamVision Elite");
        assert_eq!(product.gender, Gender::Unisex);
        assert_eq!(product.shape, FrameShape::Rectangle);
        assert_eq!(product.rim_type, RimType::FullRim);
        assert_eq!(product.status, ProductStatus::Draft);
        assert!(product.is_zeiss_compatible);
        assert!(product.stock_per_branch.is_empty());
        assert_eq!(product.homepage_flags, HomepageFlags::default());
        assert_eq!(product.price, 0.0);
    }

    #[test]
    fn test_records_without_id_are_dropped() {
        let mut records = vec![bare(1), FrameRecord::default(), bare(2)];
        records[1].frame.sku = Some("ghost".into());
        let products = decode_records(&records, 5);
        let ids: Vec<_> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![FrameId(1), FrameId(2)]);
    }

    #[test]
    fn test_price_columns() {
        let mut record = bare(1);
        record.frame.price = Some(4500.0);
        record.frame.final_price = Some(1500.0);
        record.frame.discount_type = Some("Fixed Amount".into());
        record.frame.discount_value = Some(3000.0);
        let product = decode_record(&record, 5).unwrap();
        assert_eq!(product.price, 1500.0);
        assert_eq!(product.original_price, Some(4500.0));
        assert_eq!(product.discount_type, Some(DiscountType::FixedAmount));

        // Without a recognised discount type there is no promotion.
        record.frame.discount_type = Some("BOGO".into());
        let product = decode_record(&record, 5).unwrap();
        assert_eq!(product.original_price, None);
        assert_eq!(product.discount_type, None);

        record.frame.final_price = None;
        assert_eq!(decode_record(&record, 5).unwrap().price, 4500.0);
    }

    #[test]
    fn test_unknown_labels_fall_back() {
        let mut record = bare(1);
        record.frame.shape = Some("Hexagon".into());
        record.frame.status = Some("Active".into());
        record.frame.category = Some("sunglasses".into());
        let product = decode_record(&record, 5).unwrap();
        assert_eq!(product.shape, FrameShape::Rectangle);
        assert_eq!(product.status, ProductStatus::Active);
        assert_eq!(product.category, Category::Sunglasses);
    }

    #[test]
    fn test_stock_rows_are_repaired() {
        let mut record = bare(1);
        let row = |branch: &str, qty: Option<i64>, threshold: Option<i64>| StockRow {
            frame_id: FrameId(1),
            branch_id: branch.into(),
            stock_quantity: qty,
            low_stock_threshold: threshold,
        };
        record.branches = vec![
            row("b1", Some(-4), Some(2)),
            row("b2", None, None),
            row("b3", Some(3), None),
            row("b4", Some(3), Some(0)),
            row("b5", Some(3), Some(-1)),
            row("", Some(9), Some(1)),
        ];

        let ledger = decode_record(&record, 5).unwrap().stock_per_branch;
        assert_eq!(ledger.len(), 5);
        assert_eq!(ledger.get("b1").quantity(), 0);
        assert_eq!(ledger.get("b1").status(), StockStatus::OutOfStock);
        assert_eq!(ledger.get("b2").low_stock_threshold(), 5);
        assert_eq!(ledger.get("b3").status(), StockStatus::Limited);
        assert_eq!(ledger.get("b4").low_stock_threshold(), 0);
        assert_eq!(ledger.get("b4").status(), StockStatus::InStock);
        assert_eq!(ledger.get("b5").low_stock_threshold(), 5);
    }

    #[test]
    fn test_lens_set_and_flags() {
        let mut record = bare(1);
        record.lenses = vec![
            LensRow::new(FrameId(1), "Progressive"),
            LensRow::new(FrameId(1), "Progressive"),
            LensRow {
                id: Some(3),
                frame_id: FrameId(1),
                lens_type: None,
            },
        ];
        record.frame.flags = Some(serde_json::json!({ "isPopular": true }));
        let product = decode_record(&record, 5).unwrap();
        assert_eq!(product.lens_compatibility.len(), 1);
        assert!(product.homepage_flags.is_popular);

        record.frame.flags = Some(serde_json::json!("yes"));
        let product = decode_record(&record, 5).unwrap();
        assert_eq!(product.homepage_flags, HomepageFlags::default());
    }
}
