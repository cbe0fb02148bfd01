//! # Frame Client
//!
//! Provides a high-level API for the `frames` table. It wraps a
//! `TableClient<FrameRow>` and exposes single-row statements.
use crate::clients::BackendError;
use crate::model::{FrameId, ProductStatus};
use crate::tables::FrameRow;
use table_actor::{TableClient, TableError, TableEvent, TableRow};
use tokio::sync::broadcast;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct FrameClient {
    inner: TableClient<FrameRow>,
}

fn map_error(e: TableError) -> BackendError {
    BackendError::new(FrameRow::TABLE, e)
}

impl FrameClient {
    pub fn new(inner: TableClient<FrameRow>) -> Self {
        Self { inner }
    }

    /// Frames in insertion order, optionally only those with `status`.
    #[instrument(skip(self))]
    pub async fn select(&self, status: Option<ProductStatus>) -> Result<Vec<FrameRow>, BackendError> {
        debug!("Sending request");
        let result = match status {
            None => self.inner.select_all().await,
            Some(status) => {
                self.inner
                    .select_where(move |row| row.status.as_deref() == Some(status.label()))
                    .await
            }
        };
        result.map_err(map_error)
    }

    #[instrument(skip(self))]
    pub async fn find_by_sku(&self, sku: &str) -> Result<Option<FrameRow>, BackendError> {
        debug!("Sending request");
        let sku = sku.to_string();
        let rows = self
            .inner
            .select_where(move |row| row.sku.as_deref() == Some(sku.as_str()))
            .await
            .map_err(map_error)?;
        Ok(rows.into_iter().next())
    }

    /// Inserts or replaces one frame and returns it as stored.
    #[instrument(skip(self, row), fields(id = ?row.id, sku = ?row.sku))]
    pub async fn upsert(&self, row: FrameRow) -> Result<FrameRow, BackendError> {
        debug!("Sending request");
        let stored = self.inner.upsert(vec![row]).await.map_err(map_error)?;
        stored
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::missing_key(FrameRow::TABLE))
    }

    /// Inserts one new frame and returns it with its generated id.
    #[instrument(skip(self, row), fields(sku = ?row.sku))]
    pub async fn insert(&self, row: FrameRow) -> Result<FrameRow, BackendError> {
        debug!("Sending request");
        let stored = self.inner.insert(vec![row]).await.map_err(map_error)?;
        stored
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::missing_key(FrameRow::TABLE))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: FrameId) -> Result<usize, BackendError> {
        debug!("Sending request");
        self.inner
            .delete_where(move |row| row.id == Some(id))
            .await
            .map_err(map_error)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TableEvent> {
        self.inner.subscribe()
    }
}
