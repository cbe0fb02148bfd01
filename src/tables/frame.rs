//! The `frames` table.
//!
//! Columns are nullable, as in the deployed schema; the decoding step repairs
//! missing values. The table owns three constraints:
//! - `sku` is NOT NULL and unique,
//! - `created_at` is stamped on first write and kept on every later upsert,
//! - a frame cannot be deleted while `frame_branches` or
//!   `lens_compatibility` rows still reference it.

use crate::model::{FrameId, Product, ProductDraft, ProductStatus};
use crate::tables::{LensRow, StockRow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use table_actor::{TableClient, TableError, TableRow};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameRow {
    pub id: Option<FrameId>,
    pub sku: Option<String>,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub collection: Option<String>,
    /// List price.
    pub price: Option<f64>,
    pub final_price: Option<f64>,
    pub discount_type: Option<String>,
    pub discount_value: Option<f64>,
    pub gender: Option<String>,
    pub shape: Option<String>,
    pub material: Option<String>,
    pub rim_type: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub flags: Option<serde_json::Value>,
    pub image: Option<String>,
    pub additional_images: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
    pub is_zeiss_compatible: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

impl FrameRow {
    /// The row a save writes. `id` is `None` for a new frame.
    pub fn from_draft(draft: &ProductDraft, status: ProductStatus, final_price: f64) -> Self {
        let mut flags = draft.homepage_flags;
        flags.is_discount_promo = draft.promotion_enabled();

        Self {
            id: draft.id,
            sku: Some(draft.sku.trim().to_string()),
            name: Some(draft.name.trim().to_string()),
            brand: Some(draft.brand.clone()),
            collection: Some(draft.collection.label().to_string()),
            price: Some(draft.price()),
            final_price: Some(final_price),
            discount_type: draft.discount_type().map(|d| d.label().to_string()),
            discount_value: Some(draft.discount_value),
            gender: Some(draft.gender.label().to_string()),
            shape: Some(draft.shape.label().to_string()),
            material: Some(draft.material.label().to_string()),
            rim_type: Some(draft.rim_type.label().to_string()),
            status: Some(status.label().to_string()),
            category: Some(draft.category.label().to_string()),
            flags: serde_json::to_value(flags).ok(),
            image: Some(draft.image.clone()).filter(|i| !i.is_empty()),
            additional_images: Some(draft.additional_images.clone()).filter(|i| !i.is_empty()),
            colors: Some(draft.colors.clone()).filter(|c| !c.is_empty()),
            is_zeiss_compatible: Some(draft.is_zeiss_compatible),
            created_at: None,
        }
    }

    /// A new Draft row copying `source` under another SKU.
    pub fn cloned_from(source: &Product, sku: String) -> Self {
        Self {
            id: None,
            sku: Some(sku),
            name: Some(format!("{} (Copy)", source.name)),
            brand: Some(source.brand.clone()),
            collection: Some(source.collection.label().to_string()),
            price: Some(source.list_price()),
            final_price: Some(source.price),
            discount_type: source.discount_type.map(|d| d.label().to_string()),
            discount_value: Some(source.discount_value),
            gender: Some(source.gender.label().to_string()),
            shape: Some(source.shape.label().to_string()),
            material: Some(source.material.label().to_string()),
            rim_type: Some(source.rim_type.label().to_string()),
            status: Some(ProductStatus::Draft.label().to_string()),
            category: Some(source.category.label().to_string()),
            flags: serde_json::to_value(source.homepage_flags).ok(),
            image: Some(source.image.clone()),
            additional_images: Some(source.additional_images.clone()),
            colors: Some(source.colors.clone()),
            is_zeiss_compatible: Some(source.is_zeiss_compatible),
            created_at: None,
        }
    }

    fn sku_value(&self) -> Option<&str> {
        self.sku.as_deref().filter(|s| !s.trim().is_empty())
    }
}

#[async_trait]
impl TableRow for FrameRow {
    const TABLE: &'static str = "frames";
    type Key = FrameId;
    type Context = (TableClient<StockRow>, TableClient<LensRow>);

    fn key(&self) -> Option<FrameId> {
        self.id
    }

    fn assign_key(&mut self, seq: u32) -> Result<FrameId, TableError> {
        let id = FrameId(seq);
        self.id = Some(id);
        Ok(id)
    }

    fn key_seq(key: &FrameId) -> Option<u32> {
        Some(key.0)
    }

    fn unique_value(&self) -> Option<String> {
        self.sku_value().map(str::to_string)
    }

    async fn on_write(
        &mut self,
        previous: Option<&Self>,
        _ctx: &Self::Context,
    ) -> Result<(), TableError> {
        if self.sku_value().is_none() {
            return Err(TableError::Rejected {
                table: Self::TABLE,
                reason: "null value in column \"sku\"".into(),
            });
        }
        self.created_at = previous
            .and_then(|p| p.created_at)
            .or(self.created_at)
            .or_else(|| Some(Utc::now()));
        Ok(())
    }

    async fn on_delete(&self, ctx: &Self::Context) -> Result<(), TableError> {
        let (stock, lenses) = ctx;
        let Some(id) = self.id else {
            return Ok(());
        };

        let (stock_rows, lens_rows) = tokio::try_join!(
            stock.select_where(move |row| row.frame_id == id),
            lenses.select_where(move |row| row.frame_id == id),
        )?;
        debug!(frame = %id, stock = stock_rows.len(), lenses = lens_rows.len(), "Checking references");

        let dependent = if !stock_rows.is_empty() {
            StockRow::TABLE
        } else if !lens_rows.is_empty() {
            LensRow::TABLE
        } else {
            return Ok(());
        };
        Err(TableError::ForeignKeyViolation {
            table: Self::TABLE,
            dependent,
            key: id.to_string(),
        })
    }
}
