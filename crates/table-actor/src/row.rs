//! # TableRow Trait
//!
//! The `TableRow` trait is the contract every stored row type implements so a
//! generic [`TableActor`](crate::TableActor) can hold it. It names the table,
//! the key type, the context injected into hooks, and offers provided methods
//! for key generation, unique columns and write/delete hooks.
//!
//! # Provided Methods (Hooks)
//! - [`TableRow::assign_key`] - called for keyless rows on insert/upsert
//! - [`TableRow::unique_value`] - value of a unique column, if the table has one
//! - [`TableRow::on_write`] - called before a row is stored
//! - [`TableRow::on_delete`] - called before a row is removed
//!
//! The defaults reject keyless rows, declare no unique column and accept
//! every write and delete.

use crate::error::TableError;
use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any row type must implement to be stored in a `TableActor`.
///
/// # Async & Context
/// Hooks are `async` so they can call other tables. The `Context` type is
/// injected into every hook when the actor starts; use `()` when a table has
/// no dependencies.
#[async_trait]
pub trait TableRow: Clone + Debug + Send + Sync + 'static {
    /// Table name used in logs, events and constraint errors.
    const TABLE: &'static str;

    /// Primary key (single column or composite).
    type Key: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// The runtime context (dependencies) injected into the actor.
    type Context: Send + Sync;

    /// The row's key, or `None` if the store has to generate one.
    fn key(&self) -> Option<Self::Key>;

    /// Stamp a generated key on a keyless row.
    ///
    /// `seq` is the table's next sequence number, starting at 1.
    fn assign_key(&mut self, _seq: u32) -> Result<Self::Key, TableError> {
        Err(TableError::MissingKey(Self::TABLE))
    }

    /// Sequence number behind a key, for tables that generate keys.
    ///
    /// Rows written with an explicit key move the table's sequence past it.
    fn key_seq(_key: &Self::Key) -> Option<u32> {
        None
    }

    /// Value of the table's unique column, if it has one.
    fn unique_value(&self) -> Option<String> {
        None
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called before the row is stored. `previous` is the row it replaces.
    async fn on_write(
        &mut self,
        _previous: Option<&Self>,
        _ctx: &Self::Context,
    ) -> Result<(), TableError> {
        Ok(())
    }

    /// Called immediately before the row is removed.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), TableError> {
        Ok(())
    }
}
