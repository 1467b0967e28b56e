//! SAMAJ Database — MongoDB connection management, document-store
//! implementations, and per-entity repositories.
//!
//! This crate provides:
//! - Connection management ([`DbConfig`], [`DbManager`])
//! - The driver-backed store ([`MongoStore`]) and the in-memory store used
//!   by integration tests ([`MemoryStore`])
//! - Index bootstrap ([`ensure_indexes`])
//! - Error types ([`DbError`])
//! - Repositories over the store seam ([`repository`])

mod connection;
mod error;
mod indexes;
mod memory;
pub mod repository;
mod store;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use indexes::ensure_indexes;
pub use memory::MemoryStore;
pub use store::MongoStore;
