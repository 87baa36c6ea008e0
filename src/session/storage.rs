use crate::error::StorageResult;

/// Key under which the serialized session record is persisted.
pub const SESSION_KEY: &str = "currentUser";

/// Standalone copy of the access token written by older clients. Never
/// written by this crate, only removed on clear.
pub const LEGACY_TOKEN_KEY: &str = "token";

/// Trait for session storage backends
pub trait SessionStorage: Send + Sync {
    /// Retrieve a value
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete a value. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}
