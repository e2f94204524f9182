//! HistoryLedger - Ordered log of save events
//!
//! Append-only, indexed by position (not by version id). The one exception
//! to append-only is the most recent entry, which the save path may rewrite
//! in place via `last_mut`.
//!
//! The `nth_*` readers never fail: out-of-range positions yield a sentinel
//! (0, `None`, `false`, nil UUID) that callers must read as "no data".

use chrono::{DateTime, Utc};

use super::doc_uuid::DocUuid;
use super::version::VersionRecord;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryLedger {
    records: Vec<VersionRecord>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a copy of `record`.
    pub fn add_record(&mut self, record: &VersionRecord) {
        self.records.push(record.clone());
    }

    /// Appends `record`, taking ownership.
    pub fn push(&mut self, record: VersionRecord) {
        self.records.push(record);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&VersionRecord> {
        self.records.get(i)
    }

    /// The in-flight entry, the only one that may be mutated.
    pub(crate) fn last_mut(&mut self) -> Option<&mut VersionRecord> {
        self.records.last_mut()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VersionRecord> {
        self.records.iter()
    }

    /// Version id of entry `i`, 0 if absent.
    pub fn nth_id(&self, i: usize) -> u32 {
        self.get(i).map(VersionRecord::id).unwrap_or(0)
    }

    /// Save time of entry `i`.
    pub fn nth_time(&self, i: usize) -> Option<DateTime<Utc>> {
        self.get(i).and_then(VersionRecord::time)
    }

    /// Session start time of entry `i`.
    pub fn nth_start_time(&self, i: usize) -> Option<DateTime<Utc>> {
        self.get(i).map(VersionRecord::start_time)
    }

    pub fn nth_auto_revisioned(&self, i: usize) -> bool {
        self.get(i).map(VersionRecord::is_auto_revisioned).unwrap_or(false)
    }

    /// Edit time of entry `i` in seconds, 0 if absent.
    pub fn nth_edit_time(&self, i: usize) -> u64 {
        self.get(i).map(VersionRecord::edit_time).unwrap_or(0)
    }

    /// Entry UUID of entry `i`, nil if absent.
    pub fn nth_uid(&self, i: usize) -> DocUuid {
        self.get(i).map(|v| *v.uid()).unwrap_or_else(DocUuid::nil)
    }

    /// Drops every record.
    pub fn purge(&mut self) {
        self.records.clear();
    }
}

impl<'a> IntoIterator for &'a HistoryLedger {
    type Item = &'a VersionRecord;
    type IntoIter = std::slice::Iter<'a, VersionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
