//! Errors reported by the ledger core.
//!
//! - [`ValidationFailed`] a required field is missing or cannot be parsed.
//! - [`NotFound`] an operation targets an id that is not in the ledger.
//! - [`InvalidFormat`] an import payload is not a sequence of records.
//! - [`PersistenceUnavailable`] the backing store could not be read or written.
//!
//!  [`ValidationFailed`]: LedgerError::ValidationFailed
//!  [`NotFound`]: LedgerError::NotFound
//!  [`InvalidFormat`]: LedgerError::InvalidFormat
//!  [`PersistenceUnavailable`]: LedgerError::PersistenceUnavailable
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Invalid transaction: {0}")]
    ValidationFailed(String),
    #[error("Transaction `{0}` not found")]
    NotFound(u64),
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
    #[error("Storage unavailable: {0}")]
    PersistenceUnavailable(String),
}

pub type Result<T, E = LedgerError> = std::result::Result<T, E>;
