//! # Table Messages
//!
//! Request and event types exchanged between [`TableClient`](crate::TableClient)
//! and [`TableActor`](crate::TableActor).

use crate::error::TableError;
use crate::row::TableRow;
use std::fmt;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by tables.
pub type Response<T> = oneshot::Sender<Result<T, TableError>>;

/// Row predicate shipped to the actor with `Select` and `Delete`.
pub type RowFilter<R> = Box<dyn Fn(&R) -> bool + Send + Sync>;

/// Statement sent to a table actor.
///
/// The variants mirror the four statements a relational store offers. Rows
/// are typed by the table's [`TableRow`], so a stock row can never be sent to
/// the frames table.
pub enum TableRequest<R: TableRow> {
    Select {
        filter: Option<RowFilter<R>>,
        respond_to: Response<Vec<R>>,
    },
    Insert {
        rows: Vec<R>,
        respond_to: Response<Vec<R>>,
    },
    Upsert {
        rows: Vec<R>,
        respond_to: Response<Vec<R>>,
    },
    Delete {
        filter: RowFilter<R>,
        respond_to: Response<usize>,
    },
}

impl<R: TableRow> fmt::Debug for TableRequest<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableRequest::Select { filter, .. } => f
                .debug_struct("Select")
                .field("filtered", &filter.is_some())
                .finish(),
            TableRequest::Insert { rows, .. } => {
                f.debug_struct("Insert").field("rows", rows).finish()
            }
            TableRequest::Upsert { rows, .. } => {
                f.debug_struct("Upsert").field("rows", rows).finish()
            }
            TableRequest::Delete { .. } => f.debug_struct("Delete").finish(),
        }
    }
}

/// What kind of write produced a [`TableEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Insert,
    Upsert,
    Delete,
}

/// Coarse change notification published after every successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEvent {
    pub table: &'static str,
    pub kind: WriteKind,
    pub rows: usize,
}
