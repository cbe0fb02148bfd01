//! # FrameScopedClient Trait
//!
//! Common reads and deletes for clients of tables whose rows hang off a
//! frame (`frame_branches`, `lens_compatibility`), built on top of a generic
//! `TableClient`.
use crate::clients::BackendError;
use crate::model::FrameId;
use crate::tables::FrameScoped;
use async_trait::async_trait;
use table_actor::{TableClient, TableError};

/// Trait for frame-scoped table clients to inherit the per-frame statements.
///
/// Implementors only hand out their inner client; `rows_for` and
/// `delete_for` come for free.
#[async_trait]
pub trait FrameScopedClient<R: FrameScoped>: Send + Sync {
    /// Access the inner generic TableClient.
    fn inner(&self) -> &TableClient<R>;

    /// Map table errors to the backend error type.
    fn map_error(e: TableError) -> BackendError {
        BackendError::new(R::TABLE, e)
    }

    /// Every row referencing `frame_id`.
    #[tracing::instrument(skip(self), fields(table = R::TABLE))]
    async fn rows_for(&self, frame_id: FrameId) -> Result<Vec<R>, BackendError> {
        tracing::debug!("Sending request");
        self.inner()
            .select_where(move |row| row.frame_id() == frame_id)
            .await
            .map_err(Self::map_error)
    }

    /// Deletes every row referencing `frame_id` and returns how many went.
    #[tracing::instrument(skip(self), fields(table = R::TABLE))]
    async fn delete_for(&self, frame_id: FrameId) -> Result<usize, BackendError> {
        tracing::debug!("Sending request");
        self.inner()
            .delete_where(move |row| row.frame_id() == frame_id)
            .await
            .map_err(Self::map_error)
    }
}
