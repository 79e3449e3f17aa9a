//! Core ledger logic: records, the record store and derived views

pub mod analytics;
pub mod config;
pub mod error;
pub mod filter;
pub mod ledger;
pub mod log;
pub mod record;
pub mod storage;
pub mod theme;

// Re-export main types for cleaner imports
pub use error::LedgerError;
pub use filter::TypeFilter;
pub use ledger::RecordStore;
pub use record::{Category, Record, RecordFields, TransactionType};
pub use storage::BlobStore;
