//! Terminal front end: renders ledger views and maps commands onto the
//! record store.

pub mod list;
pub mod records;
pub mod setup;
pub mod summary;
pub mod theme;
pub mod transfer;
pub mod ui;
