use crate::core::storage::BlobStore;
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory blob store implementation using HashMap and RwLock
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates a new empty MemoryStore instance
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let slots = self
            .inner
            .read()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        let value = slots.get(key).cloned();
        if value.is_some() {
            debug!("Store HIT for key: {}", key);
        } else {
            debug!("Store MISS for key: {}", key);
        }
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self
            .inner
            .write()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        debug!("Store PUT for key: {}", key);
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
