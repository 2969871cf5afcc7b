use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{ports::KeyValueStore, Result};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct StateDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<String>,
    entries: HashMap<String, Vec<String>>,
}

/// File-backed store: one JSON document per deployment, rewritten whole on
/// every `set`. An absent or empty file reads as an absent key. The key is
/// never deleted, only overwritten, so the file survives restarts.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StateDocument> {
        if !self.path.exists() {
            return Ok(StateDocument::default());
        }
        let txt = std::fs::read_to_string(&self.path)?;
        if txt.trim().is_empty() {
            return Ok(StateDocument::default());
        }
        Ok(serde_json::from_str(&txt)?)
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<String>>> {
        Ok(self.load()?.entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<String>) -> Result<()> {
        let mut doc = self.load()?;
        doc.entries.insert(key.to_string(), value);
        doc.updated_at = Some(Utc::now().to_rfc3339());
        std::fs::write(&self.path, serde_json::to_string(&doc)?)?;
        Ok(())
    }
}
