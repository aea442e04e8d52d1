//! Verity history persistence
//!
//! Append-only storage of detection outcomes, backed by PostgreSQL or by an
//! in-process store for development and tests.

pub mod db;

pub use db::{create_history_store, HistoryStore, InMemoryHistoryStore, PostgresHistoryStore};
