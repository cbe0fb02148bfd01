//! # Table Actor
//!
//! An in-process stand-in for a networked relational store. Every table is a
//! [`TableActor`] running in its own Tokio task; callers talk to it through a
//! cheap, cloneable [`TableClient`]. Requests travel over an mpsc channel and
//! replies come back on a oneshot channel, so every read or write is a real
//! suspension point for the caller, exactly like a round trip to a database.
//!
//! ## Architecture Overview
//!
//! 1. **Row Layer** ([`TableRow`]) - the typed row, its key, and its hooks
//! 2. **Runtime Layer** ([`TableActor`]) - sequential request processing and storage
//! 3. **Interface Layer** ([`TableClient`]) - async SELECT / INSERT / UPSERT / DELETE
//!
//! ## Statements
//!
//! | Request  | Behaviour |
//! |----------|-----------|
//! | `Select` | Returns rows matching an optional predicate, in insertion order. |
//! | `Insert` | Assigns keys to keyless rows; fails on an existing key. |
//! | `Upsert` | Inserts or replaces rows by key. |
//! | `Delete` | Removes rows matching a predicate, returns the count. |
//!
//! A statement that touches several rows is applied all-or-nothing: hooks and
//! constraint checks run for every row before anything is written. Nothing
//! spans tables; there are no transactions.
//!
//! ## Constraints Through Hooks
//!
//! Rows can declare a unique column ([`TableRow::unique_value`]) and react to
//! writes and deletes through async hooks that receive an injected context.
//! The context is handed to [`TableActor::run`], not to the constructor, so a
//! parent table can be started with the clients of its child tables and
//! refuse to delete rows that are still referenced:
//!
//! ```rust
//! use async_trait::async_trait;
//! use table_actor::{TableActor, TableError, TableRow};
//!
//! #[derive(Clone, Debug)]
//! struct Note {
//!     id: Option<u32>,
//!     text: String,
//! }
//!
//! #[async_trait]
//! impl TableRow for Note {
//!     const TABLE: &'static str = "notes";
//!     type Key = u32;
//!     type Context = ();
//!
//!     fn key(&self) -> Option<u32> {
//!         self.id
//!     }
//!
//!     fn assign_key(&mut self, seq: u32) -> Result<u32, TableError> {
//!         self.id = Some(seq);
//!         Ok(seq)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = TableActor::<Note>::new(10);
//!     tokio::spawn(actor.run(()));
//!
//!     let saved = client
//!         .insert(vec![Note { id: None, text: "hello".into() }])
//!         .await
//!         .unwrap();
//!     assert_eq!(saved[0].id, Some(1));
//!
//!     let rows = client.select_all().await.unwrap();
//!     assert_eq!(rows.len(), 1);
//! }
//! ```
//!
//! ## Change Feed
//!
//! Each successful write is announced as a [`TableEvent`] on a broadcast
//! channel. Subscribe through [`TableClient::subscribe`]; the event only says
//! *that* something changed, never *what*.
//!
//! ## Testing
//!
//! The [`mock`] module gives a client whose requests land in a queue of
//! scripted expectations, which is how callers inject backing-store failures
//! without spawning real tables.

pub mod actor;
pub mod client;
pub mod error;
pub mod message;
pub mod mock;
pub mod row;

pub use actor::TableActor;
pub use client::TableClient;
pub use error::TableError;
pub use message::{Response, RowFilter, TableEvent, TableRequest, WriteKind};
pub use row::TableRow;
