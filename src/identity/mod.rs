//! Document identity and revision history
//!
//! Leaves first:
//! - `DocUuid` / `UuidProvider` - unique identifiers with embedded time
//! - `VersionRecord` - one save event
//! - `RevisionRecord` - one named change-tracking checkpoint
//! - `HistoryLedger` - ordered save events
//! - `RevisionTable` - revisions keyed by id, insertion ordered
//! - `DocumentIdentity` - the aggregate owning all of the above
//!
//! Host collaborators (UUIDs, strings, clock, dirty notifications) are
//! injected through `Environment`.

mod clock;
mod dirty;
mod doc_uuid;
mod document;
mod environment;
mod history;
mod revision;
mod shared;
mod strings;
mod version;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dirty::{DirtyFlag, DirtySink};
pub use doc_uuid::{ClockedUuidProvider, DocUuid, UuidProvider};
pub use document::{DocumentIdentity, SHOW_ALL_REVISIONS};
pub use environment::Environment;
pub use history::HistoryLedger;
pub use revision::{PersistedRevision, RevisionRecord, RevisionTable};
pub use shared::SharedIdentity;
pub use strings::{StaticStrings, StringId, StringProvider};
pub use version::{PersistedVersion, VersionRecord};
