use super::KeyValueStore;
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory store using a HashMap behind an RwLock. Nothing survives the
/// process.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `value` under `key`.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.inner.write() {
            map.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self
            .inner
            .read()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        let value = map.get(key).cloned();
        debug!(key, hit = value.is_some(), "Memory store GET");
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        debug!(key, "Memory store PUT");
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_put() {
        let store = MemoryStore::new();

        // Initially, store is empty
        assert!(store.get("key1").unwrap().is_none());

        store.put("key1", "one").unwrap();
        assert_eq!(store.get("key1").unwrap().as_deref(), Some("one"));

        // Put replaces
        store.put("key1", "uno").unwrap();
        assert_eq!(store.get("key1").unwrap().as_deref(), Some("uno"));

        assert!(store.get("key2").unwrap().is_none());
    }

    #[test]
    fn test_memory_store_with_entry() {
        let store = MemoryStore::with_entry("key", "[]");
        assert_eq!(store.get("key").unwrap().as_deref(), Some("[]"));
    }
}
