//! # Catalog Backend
//!
//! The seam between the Catalog Store and the backing store. The store only
//! ever talks to a [`CatalogBackend`]; [`TableBackend`] implements it over the
//! three table clients.
//!
//! ## Statement Map
//!
//! | Method                       | Statements                                         |
//! |------------------------------|----------------------------------------------------|
//! | `fetch_frames`               | SELECT frames, then SELECT both dependents at once |
//! | `upsert_frame`               | UPSERT frames by id                                |
//! | `insert_frame`               | INSERT frames (id generated)                       |
//! | `upsert_stock`               | UPSERT frame_branches by (frame_id, branch_id)     |
//! | `replace_lens_compatibility` | DELETE + INSERT lens_compatibility by frame_id     |
//! | `delete_*`                   | DELETE by frame_id / id                            |
//!
//! Nothing here spans tables atomically.

use crate::clients::{BackendError, FrameClient, FrameScopedClient, LensClient, StockClient};
use crate::model::{FrameId, ProductStatus};
use crate::tables::{FrameRecord, FrameRow, StockRow};
use async_trait::async_trait;
use std::collections::HashMap;
use table_actor::TableEvent;
use tokio::sync::broadcast;
use tracing::{debug, instrument};

#[async_trait]
pub trait CatalogBackend: Send + Sync + 'static {
    /// Frames joined with their stock and lens rows, newest first.
    async fn fetch_frames(
        &self,
        status: Option<ProductStatus>,
    ) -> Result<Vec<FrameRecord>, BackendError>;

    async fn find_frame_by_sku(&self, sku: &str) -> Result<Option<FrameRow>, BackendError>;

    async fn upsert_frame(&self, row: FrameRow) -> Result<FrameRow, BackendError>;

    async fn insert_frame(&self, row: FrameRow) -> Result<FrameRow, BackendError>;

    async fn upsert_stock(&self, rows: Vec<StockRow>) -> Result<(), BackendError>;

    async fn insert_stock(&self, rows: Vec<StockRow>) -> Result<(), BackendError>;

    async fn replace_lens_compatibility(
        &self,
        frame_id: FrameId,
        lens_types: Vec<String>,
    ) -> Result<(), BackendError>;

    async fn delete_stock(&self, frame_id: FrameId) -> Result<usize, BackendError>;

    async fn delete_lens_compatibility(&self, frame_id: FrameId) -> Result<usize, BackendError>;

    async fn delete_frame(&self, frame_id: FrameId) -> Result<usize, BackendError>;

    /// Coarse change feed of the `frames` table.
    fn subscribe(&self) -> broadcast::Receiver<TableEvent>;
}

#[derive(Clone)]
pub struct TableBackend {
    frames: FrameClient,
    stock: StockClient,
    lenses: LensClient,
}

impl TableBackend {
    pub fn new(frames: FrameClient, stock: StockClient, lenses: LensClient) -> Self {
        Self {
            frames,
            stock,
            lenses,
        }
    }
}

#[async_trait]
impl CatalogBackend for TableBackend {
    #[instrument(skip(self))]
    async fn fetch_frames(
        &self,
        status: Option<ProductStatus>,
    ) -> Result<Vec<FrameRecord>, BackendError> {
        let frames = self.frames.select(status).await?;
        let (stock_rows, lens_rows) =
            tokio::try_join!(self.stock.select_all(), self.lenses.select_all())?;

        let mut records: Vec<FrameRecord> = frames
            .into_iter()
            .map(|frame| FrameRecord {
                frame,
                ..FrameRecord::default()
            })
            .collect();

        let index: HashMap<FrameId, usize> = records
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.frame.id.map(|id| (id, i)))
            .collect();

        for row in stock_rows {
            if let Some(&i) = index.get(&row.frame_id) {
                records[i].branches.push(row);
            }
        }
        for row in lens_rows {
            if let Some(&i) = index.get(&row.frame_id) {
                records[i].lenses.push(row);
            }
        }

        // Newest first; ties go to the later id.
        records.sort_by(|a, b| {
            b.frame
                .created_at
                .cmp(&a.frame.created_at)
                .then_with(|| b.frame.id.cmp(&a.frame.id))
        });
        debug!(count = records.len(), "Fetched frames");
        Ok(records)
    }

    async fn find_frame_by_sku(&self, sku: &str) -> Result<Option<FrameRow>, BackendError> {
        self.frames.find_by_sku(sku).await
    }

    async fn upsert_frame(&self, row: FrameRow) -> Result<FrameRow, BackendError> {
        self.frames.upsert(row).await
    }

    async fn insert_frame(&self, row: FrameRow) -> Result<FrameRow, BackendError> {
        self.frames.insert(row).await
    }

    async fn upsert_stock(&self, rows: Vec<StockRow>) -> Result<(), BackendError> {
        self.stock.upsert(rows).await
    }

    async fn insert_stock(&self, rows: Vec<StockRow>) -> Result<(), BackendError> {
        self.stock.insert(rows).await
    }

    async fn replace_lens_compatibility(
        &self,
        frame_id: FrameId,
        lens_types: Vec<String>,
    ) -> Result<(), BackendError> {
        self.lenses.replace(frame_id, lens_types).await
    }

    async fn delete_stock(&self, frame_id: FrameId) -> Result<usize, BackendError> {
        self.stock.delete_for(frame_id).await
    }

    async fn delete_lens_compatibility(&self, frame_id: FrameId) -> Result<usize, BackendError> {
        self.lenses.delete_for(frame_id).await
    }

    async fn delete_frame(&self, frame_id: FrameId) -> Result<usize, BackendError> {
        self.frames.delete(frame_id).await
    }

    fn subscribe(&self) -> broadcast::Receiver<TableEvent> {
        self.frames.subscribe()
    }
}
