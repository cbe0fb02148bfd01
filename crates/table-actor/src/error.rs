//! # Table Errors
//!
//! Every failure a table request can produce, from a closed channel to a
//! violated constraint. Callers wrap these in their own error types.

/// Errors that can occur while talking to a table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("Table actor closed")]
    ActorClosed,
    #[error("Table actor dropped response channel")]
    ActorDropped,
    #[error("row in {0} has no key and the table does not generate one")]
    MissingKey(&'static str),
    #[error("duplicate key value violates unique constraint on {table}: {key}")]
    Conflict { table: &'static str, key: String },
    #[error("delete on {table} violates foreign key constraint from {dependent} for {key}")]
    ForeignKeyViolation {
        table: &'static str,
        dependent: &'static str,
        key: String,
    },
    #[error("row rejected by {table}: {reason}")]
    Rejected { table: &'static str, reason: String },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
