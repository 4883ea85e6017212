pub mod disk;
pub mod memory;

use crate::core::constants::STORAGE_KEY;
use crate::core::venture::{
    Venture, add_venture, delete_venture, ensure_crypto_venture, seed_ventures,
};
use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Minimal string key-value capability the venture list is persisted through.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
}

/// What happened to a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed,
    Protected,
    NotFound,
}

/// Persists the venture list under a fixed key. Every mutation is written
/// back before the call returns.
pub struct VentureStore<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> VentureStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Reads the saved list. Missing or unreadable data yields the seed list;
    /// saved data always comes back with exactly one crypto venture.
    pub fn load(&self) -> Vec<Venture> {
        let raw = match self.backend.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No saved ventures, using seed list");
                return seed_ventures();
            }
            Err(e) => {
                warn!(error = %e, "Failed to read saved ventures, using seed list");
                return seed_ventures();
            }
        };

        match serde_json::from_str::<Vec<Venture>>(&raw) {
            Ok(ventures) => ensure_crypto_venture(ventures),
            Err(e) => {
                warn!(error = %e, "Saved ventures are malformed, using seed list");
                seed_ventures()
            }
        }
    }

    pub fn save(&self, ventures: &[Venture]) -> Result<()> {
        let json = serde_json::to_string(ventures).context("Failed to serialize ventures")?;
        self.backend
            .put(STORAGE_KEY, &json)
            .context("Failed to save ventures")?;
        debug!(count = ventures.len(), "Saved ventures");
        Ok(())
    }

    /// Adds a venture and persists the result. Blank names change nothing and
    /// are not written.
    pub fn add(
        &self,
        ventures: &[Venture],
        name: &str,
        revenue: &str,
        expenses: &str,
    ) -> Result<Vec<Venture>> {
        let candidate_id = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(1);
        let updated = add_venture(ventures, name, revenue, expenses, candidate_id);
        if updated.len() != ventures.len() {
            self.save(&updated)?;
        }
        Ok(updated)
    }

    pub fn delete(&self, ventures: &[Venture], id: u64) -> Result<(Vec<Venture>, DeleteOutcome)> {
        let outcome = match ventures.iter().find(|v| v.id() == id) {
            None => DeleteOutcome::NotFound,
            Some(v) if v.is_crypto() => DeleteOutcome::Protected,
            Some(_) => DeleteOutcome::Removed,
        };
        if outcome != DeleteOutcome::Removed {
            return Ok((ventures.to_vec(), outcome));
        }

        let updated = delete_venture(ventures, id);
        self.save(&updated)?;
        Ok((updated, outcome))
    }

    /// Replaces whatever is saved with the seed list.
    pub fn reset(&self) -> Result<Vec<Venture>> {
        let seed = seed_ventures();
        self.save(&seed)?;
        Ok(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{CRYPTO_EXPENSES, EXPENSES_PLACEHOLDER};
    use memory::MemoryStore;

    fn store_with(raw: &str) -> VentureStore<MemoryStore> {
        VentureStore::new(MemoryStore::with_entry(STORAGE_KEY, raw))
    }

    #[test]
    fn test_load_without_saved_data_returns_seed() {
        let store = VentureStore::new(MemoryStore::new());
        assert_eq!(store.load(), seed_ventures());
    }

    #[test]
    fn test_load_malformed_data_returns_seed() {
        assert_eq!(store_with("{not json").load(), seed_ventures());
        assert_eq!(store_with(r#"{"id": 1}"#).load(), seed_ventures());
    }

    #[test]
    fn test_load_migrates_legacy_list() {
        let store = store_with(
            r#"[{"id": 1, "name": "Lemonade", "revenue": 12, "expenses": "$3"},
                {"id": 2, "name": "Kiosk", "revenue": 0, "expenses": "rent"}]"#,
        );
        let ventures = store.load();

        assert_eq!(ventures.len(), 3);
        let crypto: Vec<_> = ventures.iter().filter(|v| v.is_crypto()).collect();
        assert_eq!(crypto.len(), 1);
        assert_eq!(crypto[0].revenue(), 0.0);
        assert_eq!(crypto[0].expenses(), CRYPTO_EXPENSES);
    }

    #[test]
    fn test_load_with_max_id_appends_crypto_venture() {
        let store = store_with(r#"[{"id": 18446744073709551615, "name": "x"}]"#);
        let ventures = store.load();

        assert_eq!(ventures.len(), 2);
        assert_eq!(ventures[0].id(), u64::MAX);
        assert!(ventures[1].is_crypto());
        assert_eq!(ventures[1].id(), 1);

        let added = store.add(&ventures, "Another", "5", "").unwrap();
        assert_eq!(added.last().unwrap().id(), 2);
    }

    #[test]
    fn test_load_is_idempotent_across_save() {
        let store = store_with(r#"[{"id": 1, "name": "Lemonade", "revenue": 12, "expenses": "$3"}]"#);
        let first = store.load();
        store.save(&first).unwrap();
        let second = store.load();
        assert_eq!(first, second);

        let fresh = VentureStore::new(MemoryStore::new());
        let seed = fresh.load();
        fresh.save(&seed).unwrap();
        assert_eq!(fresh.load(), seed);
    }

    #[test]
    fn test_add_persists_and_blank_add_does_not() {
        let backend = MemoryStore::new();
        let store = VentureStore::new(backend);
        let ventures = store.load();

        let unchanged = store.add(&ventures, "  ", "100", "").unwrap();
        assert_eq!(unchanged, ventures);
        assert!(store.backend.get(STORAGE_KEY).unwrap().is_none());

        let updated = store.add(&ventures, "Drone yoga", "abc", "").unwrap();
        assert_eq!(updated.len(), ventures.len() + 1);
        assert_eq!(store.load(), updated);
        assert_eq!(updated.last().unwrap().expenses(), EXPENSES_PLACEHOLDER);
    }

    #[test]
    fn test_delete_outcomes() {
        let store = VentureStore::new(MemoryStore::new());
        let ventures = store.load();
        let crypto_id = ventures.iter().find(|v| v.is_crypto()).unwrap().id();

        let (same, outcome) = store.delete(&ventures, crypto_id).unwrap();
        assert_eq!(outcome, DeleteOutcome::Protected);
        assert_eq!(same, ventures);

        let (same, outcome) = store.delete(&ventures, 9_999).unwrap();
        assert_eq!(outcome, DeleteOutcome::NotFound);
        assert_eq!(same, ventures);

        let (updated, outcome) = store.delete(&ventures, 1).unwrap();
        assert_eq!(outcome, DeleteOutcome::Removed);
        assert_eq!(updated.len(), ventures.len() - 1);
        assert_eq!(store.load(), updated);
    }

    #[test]
    fn test_reset_restores_seed() {
        let store = store_with(r#"[{"id": 1, "name": "Lemonade", "revenue": 12}]"#);
        assert_ne!(store.load(), seed_ventures());
        store.reset().unwrap();
        assert_eq!(store.load(), seed_ventures());
    }
}
