//! Revisions - Named change-tracking checkpoints
//!
//! A `RevisionRecord` ties a user-facing revision id to the document
//! version that was current when it was created. Revision id 0 is never
//! assigned; the compatibility surface uses it as "not found".
//!
//! `RevisionTable` is keyed by id (duplicate detection is a map lookup) but
//! iterates in insertion order, which the nearest-by-version search relies
//! on.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{DocError, DocResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevisionRecord {
    id: u32,
    description: Option<String>,
    start_time: DateTime<Utc>,
    version: u32,
}

impl RevisionRecord {
    pub fn new(
        id: u32,
        description: Option<String>,
        start_time: DateTime<Utc>,
        version: u32,
    ) -> Self {
        Self {
            id,
            description,
            start_time,
            version,
        }
    }

    /// Builds a record keeping at most `max_chars` characters of `description`.
    pub fn bounded(
        id: u32,
        description: Option<&str>,
        max_chars: usize,
        start_time: DateTime<Utc>,
        version: u32,
    ) -> Self {
        let description = description.map(|d| d.chars().take(max_chars).collect());
        Self::new(id, description, start_time, version)
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[inline]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Document version the revision was created at.
    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn to_persisted(&self) -> PersistedRevision {
        PersistedRevision {
            id: self.id,
            description: self.description.clone(),
            start_time: self.start_time,
            version: self.version,
        }
    }

    pub fn from_persisted(p: &PersistedRevision) -> Self {
        Self::new(p.id, p.description.clone(), p.start_time, p.version)
    }
}

/// `(id, description, start_time, version)` as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistedRevision {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub version: u32,
}

/// The revisions of one document.
#[derive(Clone, Debug, Default)]
pub struct RevisionTable {
    /// Records in insertion order.
    records: Vec<RevisionRecord>,
    /// id -> position in `records`
    index: HashMap<u32, usize>,
}

impl RevisionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `record` unless its id is 0 or already taken.
    ///
    /// On rejection the table is left untouched.
    pub fn add(&mut self, record: RevisionRecord) -> DocResult<()> {
        if record.id == 0 {
            return Err(DocError::ReservedRevisionId);
        }
        if self.index.contains_key(&record.id) {
            return Err(DocError::DuplicateRevision(record.id));
        }
        self.index.insert(record.id, self.records.len());
        self.records.push(record);
        Ok(())
    }

    pub fn contains(&self, id: u32) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: u32) -> Option<&RevisionRecord> {
        self.index.get(&id).map(|&i| &self.records[i])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, RevisionRecord> {
        self.records.iter()
    }

    /// Largest id in the table, 0 when empty.
    pub fn highest_id(&self) -> u32 {
        self.highest().map(RevisionRecord::id).unwrap_or(0)
    }

    /// The record with the largest id.
    pub fn highest(&self) -> Option<&RevisionRecord> {
        // ids are unique, so max_by_key has no ties to resolve
        self.records.iter().max_by_key(|r| r.id)
    }

    /// First revision created exactly at `version`.
    pub fn find_by_version(&self, version: u32) -> Option<u32> {
        self.records
            .iter()
            .find(|r| r.version == version)
            .map(RevisionRecord::id)
    }

    /// Nearest revision on one side of `version`.
    ///
    /// With `prefer_lower`, walks in insertion order and keeps the last id
    /// whose version is below `version`, stopping at the first record that
    /// is not. Otherwise returns the first record (in insertion order) whose
    /// version is above `version`. Both assume revisions were inserted in
    /// increasing version order.
    pub fn find_nearest_by_version(&self, version: u32, prefer_lower: bool) -> Option<u32> {
        if prefer_lower {
            self.records
                .iter()
                .take_while(|r| r.version < version)
                .last()
                .map(RevisionRecord::id)
        } else {
            self.records
                .iter()
                .find(|r| r.version > version)
                .map(RevisionRecord::id)
        }
    }

    /// Drops every record.
    pub fn purge(&mut self) {
        self.records.clear();
        self.index.clear();
    }
}

impl<'a> IntoIterator for &'a RevisionTable {
    type Item = &'a RevisionRecord;
    type IntoIter = std::slice::Iter<'a, RevisionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn table(entries: &[(u32, u32)]) -> RevisionTable {
        let mut t = RevisionTable::new();
        for &(id, version) in entries {
            t.add(RevisionRecord::new(id, None, at(0), version)).unwrap();
        }
        t
    }

    #[test]
    fn test_empty_table() {
        let t = RevisionTable::new();
        assert_eq!(t.highest_id(), 0);
        assert!(t.highest().is_none());
        assert_eq!(t.find_by_version(1), None);
        assert_eq!(t.find_nearest_by_version(1, true), None);
        assert_eq!(t.find_nearest_by_version(1, false), None);
    }

    #[test]
    fn test_duplicate_rejected_without_mutation() {
        let mut t = table(&[(1, 1), (2, 3)]);
        let result = t.add(RevisionRecord::new(2, Some("again".into()), at(9), 9));

        assert!(matches!(result, Err(DocError::DuplicateRevision(2))));
        assert_eq!(t.len(), 2);
        assert_eq!(t.get(2).unwrap().version(), 3);
        assert!(t.get(2).unwrap().description().is_none());
    }

    #[test]
    fn test_reserved_id_rejected() {
        let mut t = table(&[(1, 1)]);
        let result = t.add(RevisionRecord::new(0, Some("zero".into()), at(0), 5));

        assert!(matches!(result, Err(DocError::ReservedRevisionId)));
        assert_eq!(t.len(), 1);
        assert!(!t.contains(0));
        assert_eq!(t.find_by_version(5), None);
    }

    #[test]
    fn test_highest_is_max_not_last() {
        let t = table(&[(3, 1), (7, 2), (5, 3)]);
        assert_eq!(t.highest_id(), 7);
        assert_eq!(t.highest().unwrap().version(), 2);
    }

    #[test]
    fn test_find_by_version() {
        let t = table(&[(1, 2), (2, 4), (3, 6)]);
        assert_eq!(t.find_by_version(4), Some(2));
        assert_eq!(t.find_by_version(5), None);
    }

    #[test]
    fn test_nearest_lower() {
        let t = table(&[(1, 2), (2, 4), (3, 6)]);
        assert_eq!(t.find_nearest_by_version(5, true), Some(2));
        assert_eq!(t.find_nearest_by_version(4, true), Some(1));
        assert_eq!(t.find_nearest_by_version(2, true), None);
        assert_eq!(t.find_nearest_by_version(100, true), Some(3));
    }

    #[test]
    fn test_nearest_lower_stops_at_first_not_below() {
        // out-of-order insertion: the scan stops at version 9
        let t = table(&[(1, 2), (2, 9), (3, 4)]);
        assert_eq!(t.find_nearest_by_version(5, true), Some(1));
    }

    #[test]
    fn test_nearest_greater_is_first_inserted() {
        let t = table(&[(1, 2), (2, 9), (3, 4)]);
        // first in insertion order, not smallest version
        assert_eq!(t.find_nearest_by_version(3, false), Some(2));
        assert_eq!(t.find_nearest_by_version(9, false), None);
    }

    #[test]
    fn test_bounded_description() {
        let r = RevisionRecord::bounded(1, Some("Überarbeitung"), 4, at(0), 1);
        assert_eq!(r.description(), Some("Über"));

        let r = RevisionRecord::bounded(1, Some("ab"), 10, at(0), 1);
        assert_eq!(r.description(), Some("ab"));

        let r = RevisionRecord::bounded(1, None, 10, at(0), 1);
        assert_eq!(r.description(), None);
    }

    #[test]
    fn test_purge_clears_index() {
        let mut t = table(&[(1, 1), (2, 2)]);
        t.purge();
        assert!(t.is_empty());
        assert!(!t.contains(1));
        t.add(RevisionRecord::new(1, None, at(0), 1)).unwrap();
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_persisted_roundtrip() {
        let r = RevisionRecord::new(4, Some("draft".into()), at(77), 12);
        assert_eq!(RevisionRecord::from_persisted(&r.to_persisted()), r);
    }
}
