use table_actor::TableError;

/// A failed statement against one of the backing tables.
#[derive(Debug, thiserror::Error)]
#[error("{table}: {source}")]
pub struct BackendError {
    pub table: &'static str,
    #[source]
    pub source: TableError,
}

impl BackendError {
    pub fn new(table: &'static str, source: TableError) -> Self {
        Self { table, source }
    }

    /// The store accepted a write but returned no generated key.
    pub fn missing_key(table: &'static str) -> Self {
        Self::new(table, TableError::MissingKey(table))
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self.source,
            TableError::Conflict { .. } | TableError::ForeignKeyViolation { .. }
        )
    }
}
