//! RELIC Storage - Storage Trait and In-Memory Implementation
//!
//! Defines the storage abstraction layer for creators and artifacts.
//! The Postgres implementation lives in relic-api (`db::DbClient`).

pub mod memory;
pub mod store;

pub use memory::InMemoryStore;
pub use store::{RelicStore, StorageResult, StorageStatistics};
