//! # Table Client
//!
//! The async interface to a [`TableActor`](crate::TableActor).

use crate::error::TableError;
use crate::message::{RowFilter, TableEvent, TableRequest};
use crate::row::TableRow;
use tokio::sync::{broadcast, mpsc, oneshot};

/// ## TableClient
///
/// Forwards statements to a table over a Tokio mpsc channel and awaits the
/// answer on a oneshot channel. Cloning only clones the senders, so clients
/// are cheap to hand to every component that needs the table.
pub struct TableClient<R: TableRow> {
    sender: mpsc::Sender<TableRequest<R>>,
    events: broadcast::Sender<TableEvent>,
}

impl<R: TableRow> Clone for TableClient<R> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            events: self.events.clone(),
        }
    }
}

impl<R: TableRow> TableClient<R> {
    pub fn new(sender: mpsc::Sender<TableRequest<R>>, events: broadcast::Sender<TableEvent>) -> Self {
        Self { sender, events }
    }

    /// Every row, in insertion order.
    pub async fn select_all(&self) -> Result<Vec<R>, TableError> {
        self.request(|respond_to| TableRequest::Select {
            filter: None,
            respond_to,
        })
        .await
    }

    /// Rows matching `filter`, in insertion order.
    pub async fn select_where(
        &self,
        filter: impl Fn(&R) -> bool + Send + Sync + 'static,
    ) -> Result<Vec<R>, TableError> {
        let filter: RowFilter<R> = Box::new(filter);
        self.request(|respond_to| TableRequest::Select {
            filter: Some(filter),
            respond_to,
        })
        .await
    }

    /// Inserts new rows and returns them as stored (with generated keys).
    pub async fn insert(&self, rows: Vec<R>) -> Result<Vec<R>, TableError> {
        self.request(|respond_to| TableRequest::Insert { rows, respond_to })
            .await
    }

    /// Inserts or replaces rows by key and returns them as stored.
    pub async fn upsert(&self, rows: Vec<R>) -> Result<Vec<R>, TableError> {
        self.request(|respond_to| TableRequest::Upsert { rows, respond_to })
            .await
    }

    /// Deletes rows matching `filter` and returns how many were removed.
    pub async fn delete_where(
        &self,
        filter: impl Fn(&R) -> bool + Send + Sync + 'static,
    ) -> Result<usize, TableError> {
        let filter: RowFilter<R> = Box::new(filter);
        self.request(|respond_to| TableRequest::Delete { filter, respond_to })
            .await
    }

    /// Subscribes to the table's change feed.
    pub fn subscribe(&self) -> broadcast::Receiver<TableEvent> {
        self.events.subscribe()
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, TableError>>) -> TableRequest<R>,
    ) -> Result<T, TableError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| TableError::ActorClosed)?;
        response.await.map_err(|_| TableError::ActorDropped)?
    }
}
