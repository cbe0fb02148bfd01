//! # Table Actor
//!
//! This module defines the `TableActor`, the "server" half of a table. It
//! owns the rows, processes statements one at a time and publishes a change
//! event after every successful write.

use crate::client::TableClient;
use crate::error::TableError;
use crate::message::{RowFilter, TableEvent, TableRequest, WriteKind};
use crate::row::TableRow;
use std::collections::HashMap;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 64;

struct StoredRow<R> {
    seq: u64,
    row: R,
}

/// The generic actor that owns one table.
///
/// **Concurrency Model**:
/// Each table processes its statements *sequentially* in a loop, so the row
/// map needs no `Mutex`. Separate tables run in parallel, which is why two
/// statements sent to two different tables can complete in any order.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `TableActor::new()` to get the `actor` and its `client`.
/// 2.  **Wire**: Pass dependencies (other clients) into `actor.run(context)`.
/// 3.  **Run**: Spawn the run loop in a background task.
///
/// # Implementation Details
///
/// * **Insert / Upsert**:
///     1. Keyless rows get a key through [`TableRow::assign_key`] from the `next_key` counter;
///        explicit keys move the counter past them through [`TableRow::key_seq`].
///     2. Insert refuses keys that already exist; both refuse unique-column clashes.
///     3. [`TableRow::on_write`] runs for every row with the row it replaces.
///     4. Only when every row passed are they written; replaced rows keep their position.
///
/// * **Delete**:
///     1. Collects the matching keys.
///     2. Runs [`TableRow::on_delete`] for each; one refusal aborts the statement.
///     3. Removes them and returns the count.
///
/// * **Select**: clones the matching rows in insertion order.
pub struct TableActor<R: TableRow> {
    receiver: mpsc::Receiver<TableRequest<R>>,
    rows: HashMap<R::Key, StoredRow<R>>,
    events: broadcast::Sender<TableEvent>,
    next_key: u32,
    next_seq: u64,
}

impl<R: TableRow> TableActor<R> {
    /// Creates a new `TableActor` and its associated `TableClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the MPSC channel. If the channel is full,
    ///   calls to the client will wait until there is space.
    pub fn new(buffer_size: usize) -> (Self, TableClient<R>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let actor = Self {
            receiver,
            rows: HashMap::new(),
            events: events.clone(),
            next_key: 1,
            next_seq: 0,
        };
        (actor, TableClient::new(sender, events))
    }

    /// Runs the table's event loop until every client has been dropped.
    ///
    /// # Context Injection
    /// The `context` argument is handed to every row hook. Tables that check
    /// references in other tables receive those tables' clients here.
    pub async fn run(mut self, context: R::Context) {
        let table = R::TABLE;
        info!(table, "Table started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                TableRequest::Select { filter, respond_to } => {
                    let rows = self.select(filter.as_ref());
                    debug!(table, matched = rows.len(), "Select");
                    let _ = respond_to.send(Ok(rows));
                }
                TableRequest::Insert { rows, respond_to } => {
                    debug!(table, ?rows, "Insert");
                    let result = self.write(rows, WriteKind::Insert, &context).await;
                    let _ = respond_to.send(self.finish_write(result, WriteKind::Insert));
                }
                TableRequest::Upsert { rows, respond_to } => {
                    debug!(table, ?rows, "Upsert");
                    let result = self.write(rows, WriteKind::Upsert, &context).await;
                    let _ = respond_to.send(self.finish_write(result, WriteKind::Upsert));
                }
                TableRequest::Delete { filter, respond_to } => {
                    let result = self.delete(&filter, &context).await;
                    match &result {
                        Ok(count) => {
                            info!(table, count, size = self.rows.len(), "Deleted");
                            self.publish(WriteKind::Delete, *count);
                        }
                        Err(e) => warn!(table, error = %e, "Delete failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(table, size = self.rows.len(), "Shutdown");
    }

    fn select(&self, filter: Option<&RowFilter<R>>) -> Vec<R> {
        let mut matched: Vec<&StoredRow<R>> = self
            .rows
            .values()
            .filter(|stored| filter.map_or(true, |f| f(&stored.row)))
            .collect();
        matched.sort_by_key(|stored| stored.seq);
        matched.into_iter().map(|stored| stored.row.clone()).collect()
    }

    async fn write(
        &mut self,
        rows: Vec<R>,
        kind: WriteKind,
        context: &R::Context,
    ) -> Result<Vec<R>, TableError> {
        let mut staged: Vec<(R::Key, R)> = Vec::with_capacity(rows.len());
        let mut next_key = self.next_key;

        for mut row in rows {
            let key = match row.key() {
                Some(key) => {
                    if let Some(seq) = R::key_seq(&key) {
                        next_key = next_key.max(seq.saturating_add(1));
                    }
                    key
                }
                None => {
                    let key = row.assign_key(next_key)?;
                    next_key += 1;
                    key
                }
            };

            if kind == WriteKind::Insert
                && (self.rows.contains_key(&key) || staged.iter().any(|(k, _)| k == &key))
            {
                return Err(TableError::Conflict {
                    table: R::TABLE,
                    key: key.to_string(),
                });
            }

            if let Some(unique) = row.unique_value() {
                let taken_by_stored = self.rows.iter().any(|(k, stored)| {
                    k != &key && stored.row.unique_value().as_deref() == Some(unique.as_str())
                });
                let taken_by_staged = staged
                    .iter()
                    .any(|(k, r)| k != &key && r.unique_value().as_deref() == Some(unique.as_str()));
                if taken_by_stored || taken_by_staged {
                    return Err(TableError::Conflict {
                        table: R::TABLE,
                        key: unique,
                    });
                }
            }

            let previous = self.rows.get(&key).map(|stored| &stored.row);
            row.on_write(previous, context).await?;

            // Later rows win when one statement repeats a key.
            staged.retain(|(k, _)| k != &key);
            staged.push((key, row));
        }

        self.next_key = next_key;
        let written: Vec<R> = staged.iter().map(|(_, row)| row.clone()).collect();
        for (key, row) in staged {
            match self.rows.get_mut(&key) {
                Some(stored) => stored.row = row,
                None => {
                    self.next_seq += 1;
                    self.rows.insert(
                        key,
                        StoredRow {
                            seq: self.next_seq,
                            row,
                        },
                    );
                }
            }
        }
        Ok(written)
    }

    async fn delete(
        &mut self,
        filter: &RowFilter<R>,
        context: &R::Context,
    ) -> Result<usize, TableError> {
        let keys: Vec<R::Key> = self
            .rows
            .iter()
            .filter(|(_, stored)| filter(&stored.row))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &keys {
            if let Some(stored) = self.rows.get(key) {
                stored.row.on_delete(context).await?;
            }
        }
        for key in &keys {
            self.rows.remove(key);
        }
        Ok(keys.len())
    }

    fn finish_write(
        &self,
        result: Result<Vec<R>, TableError>,
        kind: WriteKind,
    ) -> Result<Vec<R>, TableError> {
        let table = R::TABLE;
        match &result {
            Ok(rows) => {
                info!(table, ?kind, count = rows.len(), size = self.rows.len(), "Written");
                self.publish(kind, rows.len());
            }
            Err(e) => warn!(table, ?kind, error = %e, "Write failed"),
        }
        result
    }

    fn publish(&self, kind: WriteKind, rows: usize) {
        if rows == 0 {
            return;
        }
        // No subscribers is not an error.
        let _ = self.events.send(TableEvent {
            table: R::TABLE,
            kind,
            rows,
        });
    }
}
