//! dochistory - Document identity, save history and revision tracking
//!
//! A document carries a UUID, a ledger of save events and a table of named
//! revisions. The `identity` module holds the core; `store` persists it to a
//! checksummed state file and `cli` drives it from the command line.

pub mod cli;
pub mod config;
pub mod errors;
pub mod identity;
pub mod observability;
pub mod store;

pub use errors::{DocError, DocResult};
