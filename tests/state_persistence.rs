//! State Persistence Tests
//!
//! Tests for the on-disk state file:
//! - Save / load reproduces the document
//! - Tampering is detected by checksum
//! - Sessions resume across loads

use std::fs;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tempfile::TempDir;

use dochistory::identity::{DocumentIdentity, Environment, ManualClock, StaticStrings, VersionRecord};
use dochistory::store::StateFile;
use dochistory::DocError;

const T0: i64 = 1_700_000_000;

fn environment(clock: &Arc<ManualClock>) -> Environment {
    Environment::manual(clock.clone(), StaticStrings::with_auto_revision_label("Auto")).0
}

fn reload(state: &StateFile, clock: &Arc<ManualClock>) -> DocumentIdentity {
    DocumentIdentity::from_manifest(&state.read().unwrap(), environment(clock)).unwrap()
}

fn clock_time(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

fn state_file(dir: &TempDir) -> StateFile {
    StateFile::new(dir.path().join("doc.state.json"), false)
}

// =============================================================================
// Round-trip Tests
// =============================================================================

/// A written document loads back with the same identity and history.
#[test]
fn test_write_then_load() {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::at(T0));
    let mut doc = DocumentIdentity::new(environment(&clock)).unwrap();
    clock.advance(30);
    doc.adjust_history_on_save().unwrap();
    doc.set_auto_revisioning(true).unwrap();
    doc.add_revision(9, Some("milestone"), clock_time(T0), 1).unwrap();

    let state = state_file(&dir);
    state.write(&doc.to_manifest()).unwrap();
    let loaded = reload(&state, &clock);

    assert!(loaded.are_document_histories_equal(&doc));
    assert_eq!(loaded.version(), 2);
    assert_eq!(loaded.highest_revision_id(), 9);
    assert_eq!(loaded.revisions().get(9).unwrap().description(), Some("milestone"));
    assert!(loaded.is_auto_revisioning());
    assert_eq!(loaded.history_nth_edit_time(0), 30);
}

/// Each persisted history entry keeps its id, uuid, start time and flag.
#[test]
fn test_persisted_entry_fields() {
    let clock = Arc::new(ManualClock::at(T0));
    let env = environment(&clock);
    let record = VersionRecord::mint(4, clock_time(T0 - 20), true, env.uuids.as_ref()).unwrap();

    let persisted = record.to_persisted();
    assert_eq!(persisted.id, 4);
    assert_eq!(persisted.uuid, record.uid().to_string());
    assert!(persisted.auto_revision);

    let back = VersionRecord::from_persisted(&persisted, env.uuids.as_ref()).unwrap();
    assert_eq!(back, record);
    assert_eq!(back.edit_time(), 20);
}

// =============================================================================
// Integrity Tests
// =============================================================================

/// Editing the file by hand breaks the checksum.
#[test]
fn test_tampered_state_rejected() {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::at(T0));
    let mut doc = DocumentIdentity::new(environment(&clock)).unwrap();
    doc.adjust_history_on_save().unwrap();

    let state = state_file(&dir);
    state.write(&doc.to_manifest()).unwrap();

    let body = fs::read_to_string(state.path()).unwrap();
    fs::write(state.path(), body.replace("\"version\": 1", "\"version\": 7")).unwrap();

    assert!(matches!(
        state.read(),
        Err(DocError::ChecksumMismatch { .. })
    ));
}

/// A malformed UUID in the state file is reported, not nulled.
#[test]
fn test_invalid_uuid_in_manifest() {
    let clock = Arc::new(ManualClock::at(T0));
    let doc = DocumentIdentity::new(environment(&clock)).unwrap();
    let mut manifest = doc.to_manifest();
    manifest.document_uuid = "not-a-uuid".into();

    assert!(matches!(
        DocumentIdentity::from_manifest(&manifest, environment(&clock)),
        Err(DocError::InvalidUuid(_))
    ));
}

// =============================================================================
// Session Tests
// =============================================================================

/// Saves after a reload fold into the entry of the loaded session until a
/// new session begins.
#[test]
fn test_session_resumes_after_load() {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::at(T0));
    let state = state_file(&dir);

    let mut doc = DocumentIdentity::new(environment(&clock)).unwrap();
    doc.adjust_history_on_save().unwrap();
    state.write(&doc.to_manifest()).unwrap();

    clock.advance(10);
    let mut doc = reload(&state, &clock);
    doc.adjust_history_on_save().unwrap();
    assert_eq!(doc.history_count(), 1);
    state.write(&doc.to_manifest()).unwrap();

    clock.advance(10);
    let mut doc = reload(&state, &clock);
    doc.begin_session();
    clock.advance(5);
    doc.adjust_history_on_save().unwrap();
    assert_eq!(doc.history_count(), 2);
    assert_eq!(doc.history_nth_edit_time(1), 5);
    assert_eq!(doc.version(), 3);
}

/// A manifest whose version lags its own history is raised on load, so the
/// next save still gets a larger id.
#[test]
fn test_lagging_manifest_version_raised() {
    let clock = Arc::new(ManualClock::at(T0));
    let mut doc = DocumentIdentity::new(environment(&clock)).unwrap();
    doc.set_auto_revisioning(true).unwrap();
    doc.adjust_history_on_save().unwrap();
    let mut manifest = doc.to_manifest();
    manifest.version = 1;

    let mut loaded = DocumentIdentity::from_manifest(&manifest, environment(&clock)).unwrap();
    assert_eq!(loaded.version(), 2);
    loaded.adjust_history_on_save().unwrap();

    let ids: Vec<u32> = loaded.history().iter().map(VersionRecord::id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}
