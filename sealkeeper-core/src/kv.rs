//! Storage seam for unseal secrets.
//!
//! The options under [`aws_kms`] decide which strategy backs this seam;
//! cloud-backed implementations live with their providers, only the
//! in-memory store ships here.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::errors::{Error, Result};

pub mod aws_kms;

/// Blocking key/value store holding unseal secrets.
pub trait KvStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
    /// Fetch the value stored under `key`, `None` when absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn exists(&self, key: &str) -> Result<bool>;
    /// Probe that writes would be accepted before unsealing starts.
    fn check_write_access(&self) -> Result<()>;
}

impl<T> KvStore for Box<T>
where
    T: KvStore + ?Sized,
{
    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }
    fn exists(&self, key: &str) -> Result<bool> {
        (**self).exists(key)
    }
    fn check_write_access(&self) -> Result<()> {
        (**self).check_write_access()
    }
}

impl<T> KvStore for std::sync::Arc<T>
where
    T: KvStore + ?Sized,
{
    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }
    fn exists(&self, key: &str) -> Result<bool> {
        (**self).exists(key)
    }
    fn check_write_access(&self) -> Result<()> {
        (**self).check_write_access()
    }
}

/// Simple in-memory store suitable for embedded usage and tests.
#[derive(Default)]
pub struct MemoryKv {
    state: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryKv {
    /// Construct a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.state
            .lock()
            .map_err(|_| Error::Storage("memory store poisoned".into()))
    }
}

impl KvStore for MemoryKv {
    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.lock()?.contains_key(key))
    }

    fn check_write_access(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_exists_roundtrip() {
        let store = MemoryKv::new();
        assert!(!store.exists("vault-unseal-key-0").unwrap());
        assert_eq!(store.get("vault-unseal-key-0").unwrap(), None);

        store.set("vault-unseal-key-0", b"shard").unwrap();
        assert!(store.exists("vault-unseal-key-0").unwrap());
        assert_eq!(
            store.get("vault-unseal-key-0").unwrap(),
            Some(b"shard".to_vec())
        );
    }

    #[test]
    fn set_replaces_previous_value() {
        let store = MemoryKv::new();
        store.set("vault-root-token", b"old").unwrap();
        store.set("vault-root-token", b"new").unwrap();
        assert_eq!(store.get("vault-root-token").unwrap(), Some(b"new".to_vec()));
    }

    #[test]
    fn write_access_is_always_granted() {
        assert!(MemoryKv::new().check_write_access().is_ok());
    }
}
