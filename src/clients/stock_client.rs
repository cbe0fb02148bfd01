//! # Stock Client
//!
//! Typed access to `frame_branches`.
use crate::clients::{BackendError, FrameScopedClient};
use crate::tables::StockRow;
use table_actor::{TableClient, TableRow};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct StockClient {
    inner: TableClient<StockRow>,
}

impl StockClient {
    pub fn new(inner: TableClient<StockRow>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn select_all(&self) -> Result<Vec<StockRow>, BackendError> {
        debug!("Sending request");
        self.inner.select_all().await.map_err(Self::map_error)
    }

    /// Writes each row over the one with the same (frame, branch) key.
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    pub async fn upsert(&self, rows: Vec<StockRow>) -> Result<(), BackendError> {
        debug!("Sending request");
        self.inner.upsert(rows).await.map_err(Self::map_error)?;
        Ok(())
    }

    /// Inserts rows that must not exist yet.
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    pub async fn insert(&self, rows: Vec<StockRow>) -> Result<(), BackendError> {
        debug!("Sending request");
        self.inner.insert(rows).await.map_err(Self::map_error)?;
        Ok(())
    }
}

impl FrameScopedClient<StockRow> for StockClient {
    fn inner(&self) -> &TableClient<StockRow> {
        &self.inner
    }
}
