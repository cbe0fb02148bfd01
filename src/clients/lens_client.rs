//! # Lens Compatibility Client
//!
//! Typed access to `lens_compatibility`. A frame's lens set is always written
//! whole: every row for the frame is deleted, then the new set inserted.
use crate::clients::{BackendError, FrameScopedClient};
use crate::model::FrameId;
use crate::tables::LensRow;
use table_actor::{TableClient, TableRow};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct LensClient {
    inner: TableClient<LensRow>,
}

impl LensClient {
    pub fn new(inner: TableClient<LensRow>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn select_all(&self) -> Result<Vec<LensRow>, BackendError> {
        debug!("Sending request");
        self.inner.select_all().await.map_err(Self::map_error)
    }

    /// Replaces the frame's lens set with `lens_types`.
    ///
    /// Not atomic: if the insert fails the frame is left with no lens rows.
    #[instrument(skip(self, lens_types), fields(count = lens_types.len()))]
    pub async fn replace(&self, frame_id: FrameId, lens_types: Vec<String>) -> Result<(), BackendError> {
        let removed = self.delete_for(frame_id).await?;
        debug!(removed, "Cleared lens compatibility");

        if lens_types.is_empty() {
            return Ok(());
        }
        let rows = lens_types
            .into_iter()
            .map(|lens_type| LensRow::new(frame_id, lens_type))
            .collect();
        self.inner.insert(rows).await.map_err(Self::map_error)?;
        Ok(())
    }
}

impl FrameScopedClient<LensRow> for LensClient {
    fn inner(&self) -> &TableClient<LensRow> {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use table_actor::mock::{create_mock_table, expect_delete, expect_insert};

    #[tokio::test]
    async fn test_replace_deletes_before_insert() {
        let (client, mut receiver) = create_mock_table::<LensRow>(10);
        let lenses = LensClient::new(client);

        let task = tokio::spawn(async move {
            lenses
                .replace(FrameId(4), vec!["Progressive".into(), "Blue Light".into()])
                .await
        });

        let responder = expect_delete(&mut receiver)
            .await
            .expect("Expected Delete request");
        responder.send(Ok(1)).unwrap();

        let (rows, responder) = expect_insert(&mut receiver)
            .await
            .expect("Expected Insert request");
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.frame_id == FrameId(4) && r.id.is_none()));
        responder.send(Ok(rows)).unwrap();

        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_replace_with_empty_set_only_deletes() {
        let (client, mut receiver) = create_mock_table::<LensRow>(10);
        let lenses = LensClient::new(client);

        let task = tokio::spawn(async move { lenses.replace(FrameId(4), Vec::new()).await });

        let responder = expect_delete(&mut receiver)
            .await
            .expect("Expected Delete request");
        responder.send(Ok(0)).unwrap();

        task.await.unwrap().unwrap();
        assert!(receiver.try_recv().is_err());
    }
}
