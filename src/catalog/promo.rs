//! # Promo Surface
//!
//! Picks the frames featured on the homepage: active, carrying an image, and
//! either discounted or flagged as a promotion. An empty result is a normal
//! state, not an error.

use crate::model::Product;
use std::cmp::Reverse;

pub const DEFAULT_PROMO_LIMIT: usize = 10;

pub fn is_promoted(product: &Product) -> bool {
    product.is_active()
        && !product.image.is_empty()
        && (product.discount_type.is_some() || product.homepage_flags.is_discount_promo)
}

/// At most `limit` promoted frames, most recently created first.
pub fn select_promoted(products: &[Product], limit: usize) -> Vec<Product> {
    let mut promoted: Vec<&Product> = products.iter().filter(|p| is_promoted(p)).collect();
    // Frames without a creation time sort last; ties keep snapshot order.
    promoted.sort_by_key(|p| Reverse(p.created_at));
    promoted.into_iter().take(limit).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{default_branches, DiscountType, FrameId, ProductDraft, ProductStatus};
    use chrono::{Duration, Utc};

    fn product(id: u32, status: ProductStatus) -> Product {
        let mut draft = ProductDraft::new(&default_branches(), 5);
        draft.sku = format!("P-{}", id);
        draft.name = "Promo".into();
        draft.image = "img".into();
        let mut product = draft.to_product(FrameId(id), status, 1200.0);
        product.created_at = Some(Utc::now() - Duration::minutes(i64::from(id)));
        product
    }

    #[test]
    fn test_selects_discounted_or_flagged_active_frames() {
        let mut discounted = product(1, ProductStatus::Active);
        discounted.discount_type = Some(DiscountType::Percentage);
        let mut flagged = product(2, ProductStatus::Active);
        flagged.homepage_flags.is_discount_promo = true;
        let plain = product(3, ProductStatus::Active);
        let mut draft = product(4, ProductStatus::Draft);
        draft.homepage_flags.is_discount_promo = true;
        let mut no_image = product(5, ProductStatus::Active);
        no_image.homepage_flags.is_discount_promo = true;
        no_image.image.clear();

        let products = vec![plain, draft, flagged, no_image, discounted];
        let ids: Vec<u32> = select_promoted(&products, DEFAULT_PROMO_LIMIT)
            .iter()
            .map(|p| p.id.0)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_caps_at_limit_newest_first() {
        let products: Vec<Product> = (1..=15)
            .map(|id| {
                let mut p = product(id, ProductStatus::Active);
                p.homepage_flags.is_discount_promo = true;
                p
            })
            .collect();

        let promoted = select_promoted(&products, DEFAULT_PROMO_LIMIT);
        assert_eq!(promoted.len(), 10);
        assert_eq!(promoted[0].id, FrameId(1));
        assert_eq!(promoted[9].id, FrameId(10));
    }

    #[test]
    fn test_empty_is_valid() {
        assert!(select_promoted(&[], DEFAULT_PROMO_LIMIT).is_empty());
    }
}
