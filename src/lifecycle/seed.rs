//! Bulk import of frames into the backing tables.
//!
//! Frames are matched by SKU: importing a SKU that already exists rewrites
//! that frame in place. Lens products are not frames and are skipped.

use crate::catalog::CatalogError;
use crate::clients::{BackendError, CatalogBackend};
use crate::model::{
    Branch, Category, Collection, DiscountType, FrameId, FrameShape, Gender, HomepageFlags,
    Material, ProductDraft, ProductStatus,
};
use crate::tables::{FrameRow, StockRow};
use table_actor::TableRow;
use tracing::{debug, info, warn};

/// Imports every entry and returns how many frames were written.
///
/// A frame that cannot be written is logged and skipped. A frame whose stock
/// or lens rows fail still counts as imported.
pub async fn seed_catalog(
    backend: &dyn CatalogBackend,
    entries: &[(ProductDraft, ProductStatus)],
) -> usize {
    let mut seeded = 0;
    for (draft, status) in entries {
        if draft.category == Category::Lenses {
            debug!(sku = %draft.sku, "Skipping lens product");
            continue;
        }
        match seed_frame(backend, draft, *status).await {
            Ok(id) => {
                seeded += 1;
                debug!(id = %id, sku = %draft.sku, "Seeded frame");
            }
            Err(e) => warn!(sku = %draft.sku, error = %e, "Frame not seeded"),
        }
    }
    info!(seeded, total = entries.len(), "Seeding complete");
    seeded
}

async fn seed_frame(
    backend: &dyn CatalogBackend,
    draft: &ProductDraft,
    status: ProductStatus,
) -> Result<FrameId, CatalogError> {
    draft.validate()?;

    let mut draft = draft.clone();
    draft.id = backend
        .find_frame_by_sku(draft.sku.trim())
        .await
        .map_err(CatalogError::Save)?
        .and_then(|row| row.id);

    let final_price = draft.final_price();
    let frame = backend
        .upsert_frame(FrameRow::from_draft(&draft, status, final_price))
        .await
        .map_err(CatalogError::Save)?;
    let id = frame
        .id
        .ok_or_else(|| CatalogError::Save(BackendError::missing_key(FrameRow::TABLE)))?;

    let stock_rows = StockRow::from_ledger(id, &draft.stock_per_branch);
    if !stock_rows.is_empty() {
        if let Err(e) = backend.upsert_stock(stock_rows).await {
            warn!(sku = %draft.sku, error = %e, "Stock not seeded");
        }
    }
    if let Err(e) = backend
        .replace_lens_compatibility(id, draft.lens_types())
        .await
    {
        warn!(sku = %draft.sku, error = %e, "Lens compatibility not seeded");
    }
    Ok(id)
}

struct SampleFrame {
    sku: &'static str,
    name: &'static str,
    brand: &'static str,
    collection: Collection,
    gender: Gender,
    shape: FrameShape,
    material: Material,
    price: f64,
    /// Selling price when the frame is on promotion.
    sale_price: Option<f64>,
    lenses: &'static [&'static str],
    colors: &'static [&'static str],
    stock: u32,
    threshold: u32,
    popular: bool,
}

const SAMPLE_IMAGE: &str = "https://images.unsplash.com/photo-1574258495973-f010dfbb5371";

const SAMPLE_FRAMES: [SampleFrame; 4] = [
    SampleFrame {
        sku: "SV-P1",
        name: "Leah Geometric",
        brand: "SamVision Elite",
        collection: Collection::NewArrival,
        gender: Gender::Women,
        shape: FrameShape::Square,
        material: Material::Acetate,
        price: 4500.0,
        sale_price: None,
        lenses: &["Single Vision"],
        colors: &["#D4AF37", "#C0C0C0"],
        stock: 15,
        threshold: 5,
        popular: false,
    },
    SampleFrame {
        sku: "SV-P2",
        name: "Amanda Round",
        brand: "Zeiss Vision",
        collection: Collection::Premium,
        gender: Gender::Women,
        shape: FrameShape::Round,
        material: Material::Metal,
        price: 3200.0,
        sale_price: None,
        lenses: &["Single Vision", "Progressive"],
        colors: &["#000000", "#F5DEB3"],
        stock: 10,
        threshold: 3,
        popular: true,
    },
    SampleFrame {
        sku: "SV-P3",
        name: "Cyrus Rectangle",
        brand: "SamVision Elite",
        collection: Collection::Budget,
        gender: Gender::Men,
        shape: FrameShape::Rectangle,
        material: Material::Acetate,
        price: 6800.0,
        sale_price: None,
        lenses: &["Single Vision"],
        colors: &["#000080", "#8B4513", "#228B22", "#808080"],
        stock: 20,
        threshold: 5,
        popular: true,
    },
    SampleFrame {
        sku: "SV-P4",
        name: "Isaebella Cat-Eye",
        brand: "SamVision Elite",
        collection: Collection::Popular,
        gender: Gender::Women,
        shape: FrameShape::CatEye,
        material: Material::Acetate,
        price: 4500.0,
        sale_price: Some(1500.0),
        lenses: &["Single Vision"],
        colors: &["#000000", "#8B4513", "#4169E1", "#E5E4E2", "#DC143C"],
        stock: 5,
        threshold: 2,
        popular: true,
    },
];

/// A small active catalog, stocked at the first branch.
pub fn sample_catalog(branches: &[Branch], default_threshold: u32) -> Vec<(ProductDraft, ProductStatus)> {
    let Some(home) = branches.first() else {
        return Vec::new();
    };

    SAMPLE_FRAMES
        .iter()
        .map(|sample| {
            let mut draft = ProductDraft::new(branches, default_threshold);
            draft.sku = sample.sku.to_string();
            draft.name = sample.name.to_string();
            draft.brand = sample.brand.to_string();
            draft.collection = sample.collection;
            draft.gender = sample.gender;
            draft.shape = sample.shape;
            draft.material = sample.material;
            draft.set_price(sample.price);
            if let Some(sale_price) = sample.sale_price {
                draft.enable_promotion();
                draft.set_discount_type(DiscountType::FixedAmount);
                draft.discount_value = sample.price - sale_price;
            }
            draft.image = SAMPLE_IMAGE.to_string();
            draft.lens_compatibility = sample.lenses.iter().map(|l| l.to_string()).collect();
            draft.colors = sample.colors.iter().map(|c| c.to_string()).collect();
            draft.homepage_flags = HomepageFlags {
                is_popular: sample.popular,
                ..draft.homepage_flags
            };
            draft.set_stock(&home.id, sample.stock, sample.threshold);
            (draft, ProductStatus::Active)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{FrameClient, LensClient, StockClient, TableBackend};
    use crate::model::default_branches;
    use crate::tables::LensRow;
    use table_actor::mock::MockTable;
    use table_actor::TableError;

    #[test]
    fn test_sample_catalog_prices() {
        let catalog = sample_catalog(&default_branches(), 5);
        assert_eq!(catalog.len(), 4);
        assert!(catalog.iter().all(|(draft, _)| draft.validate().is_ok()));

        let (cat_eye, _) = &catalog[3];
        assert_eq!(cat_eye.price(), 4500.0);
        assert_eq!(cat_eye.final_price(), 1500.0);
        assert_eq!(cat_eye.discount_type(), Some(DiscountType::FixedAmount));
        assert_eq!(cat_eye.stock_per_branch.total_stock(), 5);
        assert!(sample_catalog(&[], 5).is_empty());
    }

    #[tokio::test]
    async fn test_failed_frame_is_skipped() {
        let mut frames = MockTable::<FrameRow>::new();
        let mut stock = MockTable::<StockRow>::new();
        let mut lenses = MockTable::<LensRow>::new();

        let mut entries = sample_catalog(&default_branches(), 5);
        entries.truncate(2);

        // First frame: new SKU, written with its dependents.
        frames.expect_select().return_ok(Vec::new());
        frames.expect_upsert().return_ok(vec![FrameRow {
            id: Some(FrameId(1)),
            sku: Some("SV-P1".into()),
            ..FrameRow::default()
        }]);
        stock.expect_upsert().echo();
        lenses.expect_delete().return_ok(0);
        lenses.expect_insert().echo();
        // Second frame: the upsert is refused.
        frames.expect_select().return_ok(Vec::new());
        frames
            .expect_upsert()
            .return_err(TableError::Unavailable("timeout".into()));

        let backend = TableBackend::new(
            FrameClient::new(frames.client()),
            StockClient::new(stock.client()),
            LensClient::new(lenses.client()),
        );
        assert_eq!(seed_catalog(&backend, &entries).await, 1);

        frames.verify();
        stock.verify();
        lenses.verify();
    }
}
