//! # Catalog Store
//!
//! Owns one surface's snapshot of the catalog and every write the back office
//! makes to the backing tables.
//!
//! ## Write Protocol
//!
//! | Operation       | Backing statements                                     | Local effect                 |
//! |-----------------|--------------------------------------------------------|------------------------------|
//! | `save`          | upsert frame, then stock upsert ∥ lens replace         | patch snapshot, refresh later |
//! | `clone_product` | insert frame, insert stock, insert lenses              | reload before returning      |
//! | `delete`        | delete stock, delete lenses, delete frame              | remove, refresh later        |
//!
//! A failed statement stops the operation and leaves the snapshot untouched.
//! Earlier statements of that operation are not rolled back.
//!
//! ## Consistency
//!
//! The snapshot is patched before `save` and `delete` return; a background
//! load then replaces it with whatever the tables hold. Nothing orders that
//! load against later writes, so a slow refresh can briefly show older data.
//! A refresh that fails is logged and otherwise ignored.
//!
//! Writes are gated by a submit flag: a second write issued while one is in
//! flight fails with [`CatalogError::Busy`]. Loads are never gated.

use crate::catalog::error::CatalogError;
use crate::catalog::promo::select_promoted;
use crate::catalog::records::decode_records;
use crate::clients::{BackendError, CatalogBackend};
use crate::lifecycle::CatalogConfig;
use crate::model::{FrameId, Product, ProductDraft, ProductStatus};
use crate::tables::{FrameRow, StockRow};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use table_actor::{TableEvent, TableRow};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Which part of the site a store feeds. Each surface keeps its own snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Admin,
    Shop,
    Promo,
}

impl Surface {
    /// Status filter pushed down to the backing store.
    pub fn status_filter(&self) -> Option<ProductStatus> {
        match self {
            Surface::Admin => None,
            Surface::Shop | Surface::Promo => Some(ProductStatus::Active),
        }
    }

    /// Whether a product belongs in this surface's snapshot.
    pub fn admits(&self, product: &Product) -> bool {
        match self {
            Surface::Admin => true,
            Surface::Shop => product.is_active() && !product.image.is_empty(),
            Surface::Promo => product.is_active(),
        }
    }
}

/// `{sku}-CLONE-{nnnn}` where `nnnn` is the last four digits of the
/// timestamp, bumped until `is_taken` accepts it.
pub fn clone_sku(sku: &str, timestamp_millis: i64, is_taken: impl Fn(&str) -> bool) -> String {
    let start = timestamp_millis.rem_euclid(10_000);
    let mut candidate = String::new();
    for step in 0..10_000 {
        candidate = format!("{}-CLONE-{:04}", sku, (start + step) % 10_000);
        if !is_taken(&candidate) {
            break;
        }
    }
    candidate
}

#[derive(Debug, Default)]
struct CatalogState {
    products: Vec<Product>,
    last_error: Option<String>,
}

struct StoreInner {
    backend: Arc<dyn CatalogBackend>,
    surface: Surface,
    config: CatalogConfig,
    state: RwLock<CatalogState>,
    submitting: AtomicBool,
    loads_in_flight: AtomicUsize,
    background: Mutex<Vec<JoinHandle<()>>>,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

struct SubmitGuard<'a>(&'a AtomicBool);

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct LoadGuard<'a>(&'a AtomicUsize);

impl<'a> LoadGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(counter)
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Handle to one surface's catalog. Clones share the same snapshot.
#[derive(Clone)]
pub struct CatalogStore {
    inner: Arc<StoreInner>,
}

impl CatalogStore {
    pub fn new(backend: Arc<dyn CatalogBackend>, surface: Surface, config: CatalogConfig) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                backend,
                surface,
                config,
                state: RwLock::new(CatalogState::default()),
                submitting: AtomicBool::new(false),
                loads_in_flight: AtomicUsize::new(0),
                background: Mutex::new(Vec::new()),
                watcher: Mutex::new(None),
            }),
        }
    }

    pub fn surface(&self) -> Surface {
        self.inner.surface
    }

    pub async fn snapshot(&self) -> Vec<Product> {
        self.inner.state.read().await.products.clone()
    }

    pub async fn product(&self, id: FrameId) -> Option<Product> {
        self.inner
            .state
            .read()
            .await
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    /// Opens a held product for editing.
    pub async fn draft_for(&self, id: FrameId) -> Result<ProductDraft, CatalogError> {
        self.product(id)
            .await
            .map(|p| ProductDraft::from_product(&p))
            .ok_or(CatalogError::NotFound(id))
    }

    /// The homepage selection from this snapshot.
    pub async fn promoted(&self) -> Vec<Product> {
        let state = self.inner.state.read().await;
        select_promoted(&state.products, self.inner.config.promo_limit)
    }

    /// Message of the last load that failed, until a load succeeds.
    pub async fn last_error(&self) -> Option<String> {
        self.inner.state.read().await.last_error.clone()
    }

    pub async fn clear_error(&self) {
        self.inner.state.write().await.last_error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.inner.loads_in_flight.load(Ordering::Acquire) > 0
    }

    pub fn is_submitting(&self) -> bool {
        self.inner.submitting.load(Ordering::Acquire)
    }

    /// Replaces the snapshot with the backing store's contents.
    ///
    /// On failure the current snapshot is kept and the error is remembered
    /// in [`last_error`](Self::last_error).
    #[instrument(skip(self), fields(surface = ?self.inner.surface))]
    pub async fn load(&self) -> Result<usize, CatalogError> {
        self.fetch(true).await
    }

    async fn fetch(&self, report: bool) -> Result<usize, CatalogError> {
        let _loading = LoadGuard::enter(&self.inner.loads_in_flight);
        let surface = self.inner.surface;
        let result = self.inner.backend.fetch_frames(surface.status_filter()).await;

        let mut state = self.inner.state.write().await;
        match result {
            Ok(records) => {
                state.products = decode_records(&records, self.inner.config.default_threshold)
                    .into_iter()
                    .filter(|p| surface.admits(p))
                    .collect();
                state.last_error = None;
                info!(?surface, count = state.products.len(), "Catalog loaded");
                Ok(state.products.len())
            }
            Err(e) => {
                warn!(?surface, error = %e, kept = state.products.len(), "Catalog load failed");
                if report {
                    state.last_error = Some(e.to_string());
                }
                Err(CatalogError::Load(e))
            }
        }
    }

    fn begin_submit(&self) -> Result<SubmitGuard<'_>, CatalogError> {
        self.inner
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CatalogError::Busy)?;
        Ok(SubmitGuard(&self.inner.submitting))
    }

    /// Validates and persists a draft with the given status.
    ///
    /// Returns the product as it now appears in the snapshot.
    #[instrument(skip(self, draft), fields(surface = ?self.inner.surface, sku = %draft.sku, id = ?draft.id))]
    pub async fn save(
        &self,
        draft: &ProductDraft,
        status: ProductStatus,
    ) -> Result<Product, CatalogError> {
        draft.validate()?;
        let _submit = self.begin_submit()?;
        let backend = &self.inner.backend;

        let final_price = draft.final_price();
        let frame = backend
            .upsert_frame(FrameRow::from_draft(draft, status, final_price))
            .await
            .map_err(CatalogError::Save)?;
        let id = frame
            .id
            .ok_or_else(|| CatalogError::Save(BackendError::missing_key(FrameRow::TABLE)))?;

        let stock_rows = StockRow::from_ledger(id, &draft.stock_per_branch);
        let stock = async {
            if stock_rows.is_empty() {
                return Ok(());
            }
            backend.upsert_stock(stock_rows).await
        };
        let lenses = backend.replace_lens_compatibility(id, draft.lens_types());
        tokio::try_join!(stock, lenses).map_err(CatalogError::Save)?;

        let mut product = draft.to_product(id, status, final_price);
        product.created_at = frame.created_at;
        self.apply_saved(&product).await;
        info!(id = %id, price = final_price, "Saved");

        self.reconcile().await;
        Ok(product)
    }

    async fn apply_saved(&self, product: &Product) {
        let admitted = self.inner.surface.admits(product);
        let mut state = self.inner.state.write().await;
        let position = state.products.iter().position(|p| p.id == product.id);
        match (position, admitted) {
            (Some(i), true) => state.products[i] = product.clone(),
            (None, true) => state.products.insert(0, product.clone()),
            (Some(i), false) => {
                state.products.remove(i);
            }
            (None, false) => {}
        }
    }

    /// Copies `source` into a new Draft frame and reloads.
    #[instrument(skip(self, source), fields(surface = ?self.inner.surface, source = %source.id))]
    pub async fn clone_product(&self, source: &Product) -> Result<FrameId, CatalogError> {
        let _submit = self.begin_submit()?;
        let backend = &self.inner.backend;

        let taken: HashSet<String> = self
            .inner
            .state
            .read()
            .await
            .products
            .iter()
            .map(|p| p.sku.clone())
            .collect();
        let sku = clone_sku(&source.sku, Utc::now().timestamp_millis(), |candidate| {
            taken.contains(candidate)
        });

        let frame = backend
            .insert_frame(FrameRow::cloned_from(source, sku))
            .await
            .map_err(CatalogError::Clone)?;
        let id = frame
            .id
            .ok_or_else(|| CatalogError::Clone(BackendError::missing_key(FrameRow::TABLE)))?;

        let stock_rows = StockRow::from_ledger(id, &source.stock_per_branch);
        if !stock_rows.is_empty() {
            backend
                .insert_stock(stock_rows)
                .await
                .map_err(CatalogError::Clone)?;
        }
        let lens_types: Vec<String> = source.lens_compatibility.iter().cloned().collect();
        if !lens_types.is_empty() {
            backend
                .replace_lens_compatibility(id, lens_types)
                .await
                .map_err(CatalogError::Clone)?;
        }
        info!(id = %id, sku = ?frame.sku, "Cloned");

        // The clone exists either way; a failed reload shows up in last_error.
        if let Err(e) = self.fetch(true).await {
            warn!(error = %e, "Reload after clone failed");
        }
        Ok(id)
    }

    /// Deletes a frame and its dependent rows, dependents first.
    #[instrument(skip(self), fields(surface = ?self.inner.surface))]
    pub async fn delete(&self, id: FrameId) -> Result<(), CatalogError> {
        let _submit = self.begin_submit()?;
        let backend = &self.inner.backend;

        let stock = backend.delete_stock(id).await.map_err(CatalogError::Delete)?;
        let lenses = backend
            .delete_lens_compatibility(id)
            .await
            .map_err(CatalogError::Delete)?;
        let frames = backend.delete_frame(id).await.map_err(CatalogError::Delete)?;
        info!(id = %id, stock, lenses, frames, "Deleted");

        self.inner
            .state
            .write()
            .await
            .products
            .retain(|p| p.id != id);

        self.reconcile().await;
        Ok(())
    }

    /// Schedules a background load. Its failure is only logged.
    async fn reconcile(&self) {
        let store = self.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = store.fetch(false).await {
                warn!(error = %e, "Background refresh failed");
            }
        });

        let mut background = self.inner.background.lock().await;
        background.retain(|h| !h.is_finished());
        background.push(handle);
    }

    /// Waits until every scheduled background load has finished.
    pub async fn settle(&self) {
        let handles = std::mem::take(&mut *self.inner.background.lock().await);
        for handle in handles {
            let _ = handle.await;
        }
    }

    /// Reloads whenever `feed` reports a change to `frames`.
    ///
    /// Replaces any earlier watcher. Runs until [`dispose`](Self::dispose).
    pub async fn watch(&self, mut feed: broadcast::Receiver<TableEvent>) {
        let store = self.clone();
        let handle = tokio::spawn(async move {
            loop {
                match feed.recv().await {
                    Ok(event) if event.table == FrameRow::TABLE => {
                        debug!(kind = ?event.kind, rows = event.rows, "Change notification");
                    }
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "Change feed lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
                if let Err(e) = store.fetch(true).await {
                    warn!(error = %e, "Reload after change notification failed");
                }
            }
            debug!("Change feed closed");
        });

        if let Some(previous) = self.inner.watcher.lock().await.replace(handle) {
            previous.abort();
        }
    }

    /// Stops the watcher and any pending background loads.
    ///
    /// Returns once the stopped tasks have released their handle on the store,
    /// so dropping the store afterwards closes its table clients.
    pub async fn dispose(&self) {
        let watcher = self.inner.watcher.lock().await.take();
        let background = std::mem::take(&mut *self.inner.background.lock().await);
        for handle in watcher.into_iter().chain(background) {
            handle.abort();
            let _ = handle.await;
        }
        debug!(surface = ?self.inner.surface, "Store disposed");
    }
}
