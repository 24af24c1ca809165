//! Durable slot storage for the Inkwell client.
//!
//! This crate provides the persistent key/value slots that survive process
//! restarts:
//! - **`FileStorage`**: a single JSON file under the client's base directory
//! - **`MemoryStorage`**: an in-memory backend for tests
//!
//! Higher layers decide what goes into a slot; this crate only stores
//! strings under fixed key names.

mod file;
mod keys;
mod memory;
mod traits;

pub use file::FileStorage;
pub use keys::StorageKeys;
pub use memory::MemoryStorage;
pub use traits::SlotStorage;

use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
