use super::KeyValueStore;
use anyhow::{Context, Result};
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "ventures";

/// Durable store backed by a fjall keyspace.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(path.join("store"))
            .open()
            .with_context(|| format!("Failed to open keyspace at {}", path.display()))?;
        let partition = keyspace
            .open_partition(PARTITION, PartitionCreateOptions::default())
            .context("Failed to open ventures partition")?;
        debug!("Opened disk store at {}", path.display());

        Ok(Self {
            keyspace,
            partition,
        })
    }
}

impl KeyValueStore for DiskStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .partition
            .get(key.as_bytes())
            .with_context(|| format!("Failed to read key: {key}"))?;
        debug!(key, hit = value.is_some(), "Disk store GET");

        value
            .map(|bytes| String::from_utf8(bytes.to_vec()))
            .transpose()
            .with_context(|| format!("Stored value for {key} is not UTF-8"))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.partition
            .insert(key.as_bytes(), value.as_bytes())
            .with_context(|| format!("Failed to write key: {key}"))?;
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to flush disk store")?;
        debug!(key, "Disk store PUT");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_disk_store_get_put() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();

        assert!(store.get("key1").unwrap().is_none());

        store.put("key1", "[1,2,3]").unwrap();
        assert_eq!(store.get("key1").unwrap().as_deref(), Some("[1,2,3]"));

        store.put("key1", "[]").unwrap();
        assert_eq!(store.get("key1").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_disk_store_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = DiskStore::open(dir.path()).unwrap();
            store.put("key1", "kept").unwrap();
        }

        let store = DiskStore::open(dir.path()).unwrap();
        assert_eq!(store.get("key1").unwrap().as_deref(), Some("kept"));
    }
}
