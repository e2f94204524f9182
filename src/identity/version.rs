//! VersionRecord - One save event in a document's history
//!
//! A record holds:
//! - the document version number assigned at that save
//! - an entry-level UUID whose embedded time is the save time
//! - the time the editing session that produced it began
//! - whether it was created under auto-revisioning
//!
//! Records are immutable except through `HistoryLedger::last_mut`, which
//! the save path uses to fold consecutive manual saves into one entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::doc_uuid::{DocUuid, UuidProvider};
use crate::errors::DocResult;

/// A single history entry.
///
/// Equality compares id, start time, entry UUID and auto-revision flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionRecord {
    id: u32,
    uid: DocUuid,
    start_time: DateTime<Utc>,
    auto_revision: bool,
}

impl VersionRecord {
    /// Mints a new record with a fresh entry UUID.
    pub fn mint(
        id: u32,
        start_time: DateTime<Utc>,
        auto_revision: bool,
        uuids: &dyn UuidProvider,
    ) -> DocResult<Self> {
        Ok(Self::with_uid(id, uuids.create_uuid()?, start_time, auto_revision))
    }

    /// Builds a record around an existing entry UUID.
    pub fn with_uid(id: u32, uid: DocUuid, start_time: DateTime<Utc>, auto_revision: bool) -> Self {
        Self {
            id,
            uid,
            start_time,
            auto_revision,
        }
    }

    /// Rebuilds a record from its serialized UUID string (importers).
    pub fn from_parts(
        id: u32,
        uuid: &str,
        start_time: DateTime<Utc>,
        auto_revision: bool,
        uuids: &dyn UuidProvider,
    ) -> DocResult<Self> {
        Ok(Self::with_uid(id, uuids.parse_uuid(uuid)?, start_time, auto_revision))
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn uid(&self) -> &DocUuid {
        &self.uid
    }

    #[inline]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    #[inline]
    pub fn is_auto_revisioned(&self) -> bool {
        self.auto_revision
    }

    /// Save time, recovered from the entry UUID.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.uid.time()
    }

    /// Seconds between session start and save, never negative.
    pub fn edit_time(&self) -> u64 {
        self.time()
            .map(|t| (t - self.start_time).num_seconds().max(0) as u64)
            .unwrap_or(0)
    }

    pub(crate) fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    /// Replaces the entry UUID, which also moves the save time.
    pub(crate) fn set_uid(&mut self, uid: DocUuid) {
        self.uid = uid;
    }

    /// Serializable form.
    pub fn to_persisted(&self) -> PersistedVersion {
        PersistedVersion {
            id: self.id,
            uuid: self.uid.to_string(),
            start_time: self.start_time,
            auto_revision: self.auto_revision,
        }
    }

    /// Inverse of `to_persisted`.
    pub fn from_persisted(p: &PersistedVersion, uuids: &dyn UuidProvider) -> DocResult<Self> {
        Self::from_parts(p.id, &p.uuid, p.start_time, p.auto_revision, uuids)
    }
}

/// `(id, uuid, start_time, auto_revision)` as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistedVersion {
    pub id: u32,
    pub uuid: String,
    pub start_time: DateTime<Utc>,
    pub auto_revision: bool,
}
