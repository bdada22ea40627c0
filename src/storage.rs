/// Persistent store contract and serialization helpers for chrome.storage.local

use std::cell::RefCell;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Result, TidyError};
use crate::tab_data::{Rule, Session};
use crate::whitelist::Whitelist;

/// Storage keys. Each holds one JSON array.
pub mod keys {
    pub const SESSIONS: &str = "sessions";
    pub const RULES: &str = "rules";
    pub const WHITELIST: &str = "whitelist";

    pub const ALL: [&str; 3] = [SESSIONS, RULES, WHITELIST];
}

/// A key-value blob store such as `chrome.storage.local`
///
/// Writes are whole-value replacements. There is no locking: two
/// read-modify-write sequences on the same key can interleave and the later
/// write wins.
#[async_trait(?Send)]
pub trait KeyValueStore {
    /// Fetch the given keys. Absent keys are missing from the result.
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>>;

    async fn set(&self, items: Map<String, Value>) -> Result<()>;
}

/// Read one key, treating a missing or null value as `T::default()`
pub async fn load<T>(store: &dyn KeyValueStore, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let mut values = store.get(&[key]).await?;
    match values.remove(key) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => Ok(serde_json::from_value(value)?),
    }
}

/// Replace one key
pub async fn save<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let mut items = Map::new();
    items.insert(key.to_string(), serde_json::to_value(value)?);
    store.set(items).await
}

/// Everything the extension persists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageData {
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub whitelist: Whitelist,
}

impl StorageData {
    pub fn new() -> Self {
        StorageData::default()
    }

    /// Read all three keys in one round trip
    pub async fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let values = store.get(&keys::ALL).await?;
        let values = values
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .collect::<Map<String, Value>>();
        Ok(serde_json::from_value(Value::Object(values))?)
    }
}

/// In-process store for tests and for hosts without `chrome.storage`
#[derive(Debug)]
pub struct MemoryStore {
    data: RefCell<Map<String, Value>>,
    available: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            data: RefCell::new(Map::new()),
            available: true,
        }
    }

    pub fn with_values(values: Map<String, Value>) -> Self {
        MemoryStore {
            data: RefCell::new(values),
            available: true,
        }
    }

    /// A store whose every call fails with [`TidyError::Unavailable`]
    pub fn unavailable() -> Self {
        MemoryStore {
            data: RefCell::new(Map::new()),
            available: false,
        }
    }

    pub fn snapshot(&self) -> Map<String, Value> {
        self.data.borrow().clone()
    }

    fn check_available(&self) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(TidyError::Unavailable("storage".to_string()))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>> {
        self.check_available()?;
        let data = self.data.borrow();
        Ok(keys
            .iter()
            .filter_map(|key| data.get(*key).map(|value| (key.to_string(), value.clone())))
            .collect())
    }

    async fn set(&self, items: Map<String, Value>) -> Result<()> {
        self.check_available()?;
        self.data.borrow_mut().extend(items);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn test_storage_data_new() {
        let storage = StorageData::new();
        assert_eq!(storage.sessions.len(), 0);
        assert!(storage.whitelist.is_empty());
    }

    #[test]
    fn test_load_missing_key_is_default() {
        let store = MemoryStore::new();

        let rules: Vec<Rule> = block_on(load(&store, keys::RULES)).unwrap();

        assert!(rules.is_empty());
    }

    #[test]
    fn test_load_null_key_is_default() {
        let mut values = Map::new();
        values.insert(keys::WHITELIST.to_string(), Value::Null);
        let store = MemoryStore::with_values(values);

        let whitelist: Whitelist = block_on(load(&store, keys::WHITELIST)).unwrap();

        assert!(whitelist.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let rules = vec![Rule::new("google.com", "Work")];

        block_on(save(&store, keys::RULES, &rules)).unwrap();
        let loaded: Vec<Rule> = block_on(load(&store, keys::RULES)).unwrap();

        assert_eq!(loaded, rules);
        assert_eq!(store.snapshot()[keys::RULES], json!([{"domain": "google.com", "name": "Work"}]));
    }

    #[test]
    fn test_load_rejects_corrupt_value() {
        let mut values = Map::new();
        values.insert(keys::RULES.to_string(), json!("not a list"));
        let store = MemoryStore::with_values(values);

        let result: Result<Vec<Rule>> = block_on(load(&store, keys::RULES));

        assert!(matches!(result, Err(TidyError::Serialization(_))));
    }

    #[test]
    fn test_storage_data_load_reads_all_keys() {
        let values = json!({
            "sessions": [{"name": "Old", "date": 1.0, "tabs": []}],
            "rules": [{"domain": "github.com", "name": "Code"}],
            "whitelist": ["github.com"],
            "unrelated": true
        });
        let store = MemoryStore::with_values(values.as_object().unwrap().clone());

        let data = block_on(StorageData::load(&store)).unwrap();

        assert_eq!(data.sessions[0].name, "Old");
        assert_eq!(data.rules, vec![Rule::new("github.com", "Code")]);
        assert_eq!(data.whitelist.patterns(), ["github.com"]);
    }

    #[test]
    fn test_storage_data_load_empty_store() {
        let data = block_on(StorageData::load(&MemoryStore::new())).unwrap();

        assert_eq!(data, StorageData::new());
    }

    #[test]
    fn test_unavailable_store() {
        let store = MemoryStore::unavailable();

        let result = block_on(StorageData::load(&store));

        assert!(matches!(result, Err(TidyError::Unavailable(_))));
    }
}
