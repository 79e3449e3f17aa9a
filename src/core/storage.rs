//! Key-value blob storage abstraction

use anyhow::Result;

/// Slot holding the serialized transaction list.
pub const TRANSACTIONS_KEY: &str = "transactions";
/// Slot holding the theme preference.
pub const THEME_KEY: &str = "theme";

/// A store of named text blobs. Every write is durable before it returns.
pub trait BlobStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
}
