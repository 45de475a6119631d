//! Durable key-value storage.
//!
//! The session store mirrors the logged-in user into a [`DurableStorage`]
//! backend so that it survives a restart. Two backends are provided:
//!
//! - [`MemoryStorage`]: process-local map, used by tests and `--in-memory`
//! - [`FileStorage`]: one JSON file per key inside a data directory

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::GrocefyError;
use crate::Result;

/// Synchronous key-value storage.
///
/// Reads and writes block the caller. Implementations must be safe to share
/// across threads since the store handle is cloned into request handlers and
/// timer tasks.
pub trait DurableStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Reject keys that cannot be used verbatim as a file stem.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(GrocefyError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("grocefyUser").is_ok());
        assert!(validate_key("user_1-backup").is_ok());

        assert!(validate_key("").is_err());
        assert!(validate_key("../secret").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("with space").is_err());
    }
}
