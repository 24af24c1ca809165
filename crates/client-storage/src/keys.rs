//! Storage key constants.

/// Storage keys used by the client
pub struct StorageKeys;

impl StorageKeys {
    /// Serialized identity of the logged-in user (JSON)
    pub const SESSION_IDENTITY: &'static str = "session_identity";
}
