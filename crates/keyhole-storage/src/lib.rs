//! Durable Store backends for the Keyhole URL shortener.

pub mod memory;
pub mod mysql;

pub use keyhole_core::store::{Result, UrlStore};
pub use keyhole_core::StorageError;
pub use memory::InMemoryStore;
pub use mysql::MySqlStore;
