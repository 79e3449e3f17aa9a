pub mod disk;
pub mod memory;

use crate::core::config::{AppConfig, StorageBackend};
use crate::core::storage::BlobStore;
use anyhow::Result;
use disk::DiskStore;
use memory::MemoryStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// The backend the application ended up with.
pub struct OpenedStore {
    pub backend: Arc<dyn BlobStore>,
    /// Set when the configured disk store could not be opened and the
    /// session runs on memory only.
    pub fallback_reason: Option<String>,
}

/// Opens the configured backend. The disk store lives in a `store`
/// directory under the data path.
pub fn open(config: &AppConfig) -> Result<Arc<dyn BlobStore>> {
    match config.storage {
        StorageBackend::Memory => {
            debug!("Using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Disk => {
            let path = config.default_data_path()?.join("store");
            Ok(Arc::new(DiskStore::open(&path)?))
        }
    }
}

/// Like [`open`], but degrades to an in-memory store instead of failing.
pub fn open_or_fallback(config: &AppConfig) -> OpenedStore {
    match open(config) {
        Ok(backend) => OpenedStore {
            backend,
            fallback_reason: None,
        },
        Err(e) => {
            warn!("Falling back to in-memory store: {e:#}");
            OpenedStore {
                backend: Arc::new(MemoryStore::new()),
                fallback_reason: Some(format!("{e:#}")),
            }
        }
    }
}
