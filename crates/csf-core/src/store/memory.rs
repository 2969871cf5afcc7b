use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{ports::KeyValueStore, Result};

/// In-memory store for tests and ephemeral deployments. State dies with the
/// process.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<String>>>,
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<String>>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<String>) -> Result<()> {
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn absent_key_reads_as_none() {
        let store = MemoryStore::default();
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let store = MemoryStore::default();
        store.set("k", vec!["a".to_string()]).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(vec!["a".to_string()]));
    }
}
