//! Error taxonomy for store operations.

use crate::validate::ValidationErrors;
use blog_api::ApiError;
use client_storage::StorageError;
use thiserror::Error;

/// Errors from session and content store operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Client-side validation failed; no network call was made and no
    /// status was committed. Field messages belong next to the form.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// An authenticated operation was attempted without an identity; no
    /// network call was made.
    #[error("authentication required")]
    AuthRequired,

    /// The remote call failed (rejection or transport).
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The durable slot could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for store operations.
pub type EngineResult<T> = Result<T, EngineError>;
