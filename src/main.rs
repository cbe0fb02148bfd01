//! # Frame Catalog demo
//!
//! Runs the catalog end to end against in-process tables:
//! 1. Seeds a small sample catalog.
//! 2. Saves a new frame with a promotion from the back office.
//! 3. Clones it, then deletes the clone.
//! 4. Shows what the shop, the homepage and the stock overview see.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

use frame_catalog::catalog::{filter, CatalogFilter, CategoryFilter, Surface};
use frame_catalog::inventory::InventoryOverview;
use frame_catalog::lifecycle::{sample_catalog, seed_catalog, setup_tracing, CatalogConfig, CatalogSystem};
use frame_catalog::model::{DiscountType, FrameShape, ProductDraft, ProductStatus};
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = CatalogConfig::from_env();
    info!(?config, "Starting catalog");
    let system = CatalogSystem::new(config.clone());

    let seeded = seed_catalog(
        system.backend().as_ref(),
        &sample_catalog(&system.branches, config.default_threshold),
    )
    .await;
    info!(seeded, "Sample catalog imported");

    let admin = system.store(Surface::Admin);
    let shop = system.store(Surface::Shop);
    shop.watch(system.subscribe()).await;
    admin.load().await.map_err(|e| e.to_string())?;
    shop.load().await.map_err(|e| e.to_string())?;

    // A new frame on a 15% promotion, stocked at two branches.
    let mut draft = ProductDraft::new(&system.branches, config.default_threshold);
    draft.sku = "SV-AST-01".into();
    draft.name = "Aster Cat-Eye".into();
    draft.shape = FrameShape::CatEye;
    draft.set_price(4500.0);
    draft.enable_promotion();
    draft.set_discount_type(DiscountType::Percentage);
    draft.discount_value = 15.0;
    draft.image = "https://images.unsplash.com/photo-1511499767350-a1590fdb7358".into();
    draft.colors = vec!["#000000".into(), "#8B4513".into()];
    draft.lens_compatibility.insert("Progressive".into());
    if let Some(branch) = system.branches.first() {
        draft.set_stock(&branch.id, 12, 5);
    }
    if let Some(branch) = system.branches.get(2) {
        draft.set_stock(&branch.id, 3, 5);
    }

    let span = tracing::info_span!("back_office");
    let saved = async {
        info!("Saving new frame");
        admin.save(&draft, ProductStatus::Active).await
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;
    info!(id = %saved.id, price = saved.price, original = ?saved.original_price, "Frame saved");

    match admin.clone_product(&saved).await {
        Ok(clone_id) => {
            info!(id = %clone_id, "Frame cloned");
            if let Err(e) = admin.delete(clone_id).await {
                error!(error = %e, "Clone could not be deleted");
            }
        }
        Err(e) => error!(error = %e, "Clone failed"),
    }
    admin.settle().await;
    shop.load().await.map_err(|e| e.to_string())?;

    let cat_eyes = filter(
        &shop.snapshot().await,
        &CatalogFilter {
            category: CategoryFilter::Eyeglasses,
            shape: Some(FrameShape::CatEye),
            ..CatalogFilter::shop_default()
        },
    );
    for product in &cat_eyes {
        info!(sku = %product.sku, price = product.price, "Shop listing");
    }

    let promo = system.store(Surface::Promo);
    promo.load().await.map_err(|e| e.to_string())?;
    for product in promo.promoted().await {
        info!(sku = %product.sku, "Homepage promotion");
    }

    let overview = InventoryOverview::compute(&admin.snapshot().await, &system.branches);
    info!(
        active = overview.active,
        drafts = overview.drafts,
        units = overview.total_units,
        low_stock = overview.low_stock.len(),
        zeiss = overview.zeiss_share_percent,
        "Inventory overview"
    );

    for store in [admin, shop, promo] {
        store.dispose().await;
    }
    system.shutdown().await?;

    info!("Catalog demo completed");
    Ok(())
}
