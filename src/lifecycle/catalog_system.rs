use crate::catalog::{CatalogStore, Surface};
use crate::clients::{CatalogBackend, FrameClient, LensClient, StockClient, TableBackend};
use crate::lifecycle::CatalogConfig;
use crate::model::{default_branches, Branch};
use crate::tables::{FrameRow, LensRow, StockRow};
use std::sync::Arc;
use table_actor::{TableActor, TableEvent};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The running catalog: three table actors, the backend over them and the
/// branch directory.
///
/// # Example
///
/// ```ignore
/// let system = CatalogSystem::new(CatalogConfig::from_env());
/// let admin = system.store(Surface::Admin);
/// admin.load().await?;
///
/// // ... use the store ...
///
/// admin.dispose().await;
/// drop(admin);
/// system.shutdown().await?;
/// ```
///
/// Stores share the backend, so every store handed out must be disposed and
/// dropped before [`shutdown`](Self::shutdown); a live store keeps the tables
/// open and shutdown waits for it.
pub struct CatalogSystem {
    pub branches: Vec<Branch>,
    config: CatalogConfig,
    backend: Arc<TableBackend>,
    handles: Vec<JoinHandle<()>>,
}

impl CatalogSystem {
    /// Spawns the tables and wires `frames` to its two dependents.
    pub fn new(config: CatalogConfig) -> Self {
        // 1. Create tables (no dependencies yet)
        let (frame_actor, frame_client) = TableActor::<FrameRow>::new(config.table_buffer);
        let (stock_actor, stock_client) = TableActor::<StockRow>::new(config.table_buffer);
        let (lens_actor, lens_client) = TableActor::<LensRow>::new(config.table_buffer);

        // 2. Start them; frames gets the dependents for its delete check
        let stock_handle = tokio::spawn(stock_actor.run(()));
        let lens_handle = tokio::spawn(lens_actor.run(()));
        let frame_handle = tokio::spawn(frame_actor.run((stock_client.clone(), lens_client.clone())));

        let backend = TableBackend::new(
            FrameClient::new(frame_client),
            StockClient::new(stock_client),
            LensClient::new(lens_client),
        );
        info!(buffer = config.table_buffer, "Catalog tables started");

        Self {
            branches: default_branches(),
            config,
            backend: Arc::new(backend),
            // frames first: it holds the dependents' clients
            handles: vec![frame_handle, stock_handle, lens_handle],
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn backend(&self) -> Arc<dyn CatalogBackend> {
        self.backend.clone()
    }

    /// A new, empty store for `surface`. Call `load` to fill it.
    pub fn store(&self, surface: Surface) -> CatalogStore {
        CatalogStore::new(self.backend(), surface, self.config.clone())
    }

    /// Change feed of the `frames` table.
    pub fn subscribe(&self) -> broadcast::Receiver<TableEvent> {
        self.backend.subscribe()
    }

    /// Closes the tables and waits for their tasks.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if every table stopped cleanly
    /// - `Err(String)` if a table task panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down catalog...");

        // Dropping the last clients closes every request channel.
        drop(self.backend);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Table task failed: {:?}", e);
                return Err(format!("Table task failed: {:?}", e));
            }
        }

        info!("Catalog shutdown complete.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_and_shutdown() {
        let system = CatalogSystem::new(CatalogConfig::default());
        assert_eq!(system.branches.len(), 4);

        let store = system.store(Surface::Admin);
        assert_eq!(store.load().await.unwrap(), 0);
        drop(store);

        system.shutdown().await.unwrap();
    }
}
