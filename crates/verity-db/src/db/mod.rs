//! Database repositories for data access layer
//!
//! `history` holds the `HistoryStore` trait, its PostgreSQL implementation and
//! the factory that picks a backend from configuration. `memory` is the
//! in-process implementation.

pub mod history;
pub mod memory;

pub use history::{create_history_store, HistoryStore, PostgresHistoryStore};
pub use memory::InMemoryHistoryStore;
