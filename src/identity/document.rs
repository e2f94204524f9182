//! DocumentIdentity - Identity, save history and revisions of one document
//!
//! Owns:
//! - the document UUID (minted at construction, never null afterwards
//!   unless an importer explicitly sets the nil UUID)
//! - the `HistoryLedger`
//! - the `RevisionTable`
//! - the version counter and the revision policy flags
//!
//! Every mutating operation is fail-closed: all fallible work (minting
//! UUIDs, resolving the auto-revision label, claiming the revision id) is
//! done before the first field is touched, so an error leaves the document
//! exactly as it was.
//!
//! Invariants:
//! - `version` only grows; every save and every auto-revisioning switch-on
//!   bumps it by one
//! - history ids increase in insertion order
//! - revision ids are unique; 0 is never assigned

use chrono::{DateTime, Utc};

use super::doc_uuid::DocUuid;
use super::environment::Environment;
use super::history::HistoryLedger;
use super::revision::{RevisionRecord, RevisionTable};
use super::strings::StringId;
use super::version::VersionRecord;
use crate::errors::{DocError, DocResult};
use crate::observability::{log_event, Event};
use crate::store::{DocumentManifest, MANIFEST_FORMAT_VERSION};

/// `show_revision_id` value meaning "collapse to latest / show all".
pub const SHOW_ALL_REVISIONS: u32 = 0xFFFF_FFFF;

pub struct DocumentIdentity {
    env: Environment,
    uuid: DocUuid,
    history: HistoryLedger,
    revisions: RevisionTable,

    /// Highest version number ever assigned.
    version: u32,
    /// Active revision id. Not persisted.
    revision_id: u32,
    show_revision_id: u32,

    mark_revisions: bool,
    show_revisions: bool,
    auto_revisioning: bool,
    history_was_saved: bool,

    last_opened_time: DateTime<Utc>,
    last_saved_time: Option<DateTime<Utc>>,
}

impl DocumentIdentity {
    /// Creates a document with a fresh identity.
    ///
    /// Fails if the UUID provider cannot mint an identifier.
    pub fn new(env: Environment) -> DocResult<Self> {
        let uuid = env
            .uuids
            .create_uuid()
            .map_err(|e| environment_failure(e, "create_document"))?;
        let last_opened_time = env.clock.now();

        let doc = Self::blank(env, uuid, last_opened_time);
        log_event(Event::DocumentCreated, &[("uuid", doc.uuid.to_string().as_str())]);
        Ok(doc)
    }

    fn blank(env: Environment, uuid: DocUuid, last_opened_time: DateTime<Utc>) -> Self {
        Self {
            env,
            uuid,
            history: HistoryLedger::new(),
            revisions: RevisionTable::new(),
            version: 0,
            revision_id: 0,
            show_revision_id: 0,
            mark_revisions: false,
            show_revisions: true,
            auto_revisioning: false,
            history_was_saved: false,
            last_opened_time,
            last_saved_time: None,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    // ------------------------------------------------------------------
    // Identity
    // ------------------------------------------------------------------

    pub fn uuid(&self) -> &DocUuid {
        &self.uuid
    }

    /// Textual form of the document UUID, for exporters.
    pub fn doc_uuid_string(&self) -> String {
        self.uuid.to_string()
    }

    /// Replaces the document UUID with an importer-supplied one.
    pub fn set_doc_uuid(&mut self, s: &str) -> DocResult<()> {
        self.uuid = self.env.uuids.parse_uuid(s)?;
        Ok(())
    }

    pub fn new_uuid(&self) -> DocResult<DocUuid> {
        self.env
            .uuids
            .create_uuid()
            .map_err(|e| environment_failure(e, "new_uuid"))
    }

    pub fn new_uuid32(&self) -> u32 {
        self.env.uuids.new_uuid32()
    }

    pub fn new_uuid64(&self) -> u64 {
        self.env.uuids.new_uuid64()
    }

    /// True if both documents descend from the same root document.
    ///
    /// A null identity is related to nothing, not even another null one.
    pub fn are_documents_related(&self, other: &DocumentIdentity) -> bool {
        !self.uuid.is_null() && !other.uuid.is_null() && self.uuid == other.uuid
    }

    /// True if the documents are related and their histories match entry
    /// for entry, by position.
    pub fn are_document_histories_equal(&self, other: &DocumentIdentity) -> bool {
        self.are_documents_related(other)
            && self.history.len() == other.history.len()
            && self.history.iter().zip(other.history.iter()).all(|(a, b)| a == b)
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    /// Appends a copy of an importer-supplied record.
    pub fn add_record_to_history(&mut self, record: &VersionRecord) {
        self.history.add_record(record);
    }

    /// Forgets all history. The next save starts a fresh first entry.
    pub fn purge_history(&mut self) {
        let purged = self.history.len().to_string();
        self.history.purge();
        self.history_was_saved = false;
        log_event(Event::HistoryPurged, &[("records", purged.as_str())]);
    }

    pub fn history_count(&self) -> usize {
        self.history.len()
    }

    pub fn history_nth_id(&self, i: usize) -> u32 {
        self.history.nth_id(i)
    }

    pub fn history_nth_time(&self, i: usize) -> Option<DateTime<Utc>> {
        self.history.nth_time(i)
    }

    pub fn history_nth_time_started(&self, i: usize) -> Option<DateTime<Utc>> {
        self.history.nth_start_time(i)
    }

    pub fn history_nth_auto_revisioned(&self, i: usize) -> bool {
        self.history.nth_auto_revisioned(i)
    }

    pub fn history_nth_edit_time(&self, i: usize) -> u64 {
        self.history.nth_edit_time(i)
    }

    pub fn history_nth_uid(&self, i: usize) -> DocUuid {
        self.history.nth_uid(i)
    }

    /// Marks the start of a new editing session on an existing document.
    ///
    /// The next save appends a new history entry starting now instead of
    /// folding into the previous session's entry.
    pub fn begin_session(&mut self) {
        self.last_opened_time = self.env.clock.now();
        self.history_was_saved = false;
    }

    /// Records a save in the history. Call exactly once per successful save,
    /// before the save completes.
    ///
    /// The first save of a session, and every save under auto-revisioning,
    /// appends a new entry. Other saves rewrite the last entry in place
    /// (new version id, new entry UUID) so an unbroken run of manual saves
    /// stays a single entry. Under auto-revisioning each save also creates a
    /// revision at the new version.
    pub fn adjust_history_on_save(&mut self) -> DocResult<()> {
        let version = self.next_version()?;
        let now = self.env.clock.now();
        let append = !self.history_was_saved || self.auto_revisioning;

        if !append && self.history.is_empty() {
            return Err(DocError::EmptyHistory);
        }

        let auto_revision = if self.auto_revisioning {
            Some((self.next_revision_id()?, self.auto_revision_label()?))
        } else {
            None
        };
        let uid = self
            .env
            .uuids
            .create_uuid()
            .map_err(|e| environment_failure(e, "adjust_history_on_save"))?;

        if let Some((revision_id, label)) = auto_revision {
            self.commit_revision(RevisionRecord::new(revision_id, Some(label), now, version))?;
        }

        self.version = version;

        if append {
            // first save of the session starts when the document was opened
            let start = if self.history_was_saved {
                now
            } else {
                self.last_opened_time
            };
            let record = VersionRecord::with_uid(version, uid, start, self.auto_revisioning);
            self.last_saved_time = record.time();
            self.history.push(record);
            self.history_was_saved = true;

            log_event(
                Event::HistoryAppended,
                &[
                    ("history_len", self.history.len().to_string().as_str()),
                    ("version", version.to_string().as_str()),
                ],
            );
        } else if let Some(last) = self.history.last_mut() {
            last.set_id(version);
            last.set_uid(uid);
            self.last_saved_time = last.time();

            log_event(
                Event::HistoryMerged,
                &[
                    ("edit_time", last.edit_time().to_string().as_str()),
                    ("version", version.to_string().as_str()),
                ],
            );
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Revisions
    // ------------------------------------------------------------------

    pub fn revisions(&self) -> &RevisionTable {
        &self.revisions
    }

    /// Adds a revision and makes it the active one.
    ///
    /// Fails with `DuplicateRevision` if the id is taken; nothing changes.
    pub fn add_revision(
        &mut self,
        id: u32,
        description: Option<&str>,
        start_time: DateTime<Utc>,
        version: u32,
    ) -> DocResult<()> {
        self.commit_revision(RevisionRecord::new(
            id,
            description.map(str::to_string),
            start_time,
            version,
        ))
    }

    /// Like `add_revision`, keeping at most `max_chars` of the description.
    pub fn add_revision_bounded(
        &mut self,
        id: u32,
        description: Option<&str>,
        max_chars: usize,
        start_time: DateTime<Utc>,
        version: u32,
    ) -> DocResult<()> {
        self.commit_revision(RevisionRecord::bounded(
            id,
            description,
            max_chars,
            start_time,
            version,
        ))
    }

    fn commit_revision(&mut self, record: RevisionRecord) -> DocResult<()> {
        let id = record.id();
        let version = record.version();

        if let Err(e) = self.revisions.add(record) {
            log_event(Event::RevisionRejected, &[("revision_id", id.to_string().as_str())]);
            return Err(e);
        }

        self.env.dirty.force_dirty();
        self.revision_id = id;

        log_event(
            Event::RevisionAdded,
            &[
                ("revision_id", id.to_string().as_str()),
                ("version", version.to_string().as_str()),
            ],
        );
        Ok(())
    }

    pub fn purge_revision_table(&mut self) {
        self.revisions.purge();
        log_event(Event::RevisionTablePurged, &[]);
    }

    /// Largest revision id, 0 if there are no revisions.
    pub fn highest_revision_id(&self) -> u32 {
        self.revisions.highest_id()
    }

    pub fn highest_revision(&self) -> Option<&RevisionRecord> {
        self.revisions.highest()
    }

    /// Revision created at exactly `version`, 0 if none.
    pub fn find_auto_revision_id(&self, version: u32) -> u32 {
        self.revisions.find_by_version(version).unwrap_or(0)
    }

    /// Nearest revision below (`prefer_lower`) or above `version`, 0 if none.
    pub fn find_nearest_auto_revision_id(&self, version: u32, prefer_lower: bool) -> u32 {
        self.revisions
            .find_nearest_by_version(version, prefer_lower)
            .unwrap_or(0)
    }

    // ------------------------------------------------------------------
    // Policy flags
    // ------------------------------------------------------------------

    pub fn set_mark_revisions(&mut self, mark: bool) {
        if self.mark_revisions != mark {
            self.mark_revisions = mark;
            self.env.dirty.force_dirty();
        }
    }

    pub fn toggle_mark_revisions(&mut self) {
        self.set_mark_revisions(!self.mark_revisions);
    }

    pub fn set_show_revisions(&mut self, show: bool) {
        if self.show_revisions != show {
            self.show_revisions = show;
            self.env.dirty.force_dirty();
        }
    }

    pub fn toggle_show_revisions(&mut self) {
        self.set_show_revisions(!self.show_revisions);
    }

    pub fn set_show_revision_id(&mut self, id: u32) {
        if self.show_revision_id != id {
            self.show_revision_id = id;
            self.env.dirty.force_dirty();
        }
    }

    /// Sets the active revision id. Does not dirty the document: the value
    /// is not persisted.
    pub fn set_revision_id(&mut self, id: u32) {
        self.revision_id = id;
    }

    /// Switches auto-revisioning.
    ///
    /// Switching on bumps the version, appends an auto-tagged history entry,
    /// creates a revision at the new version, collapses the revision view
    /// and turns on revision marking. Switching off only clears the flag.
    pub fn set_auto_revisioning(&mut self, on: bool) -> DocResult<()> {
        if self.auto_revisioning == on {
            return Ok(());
        }

        if !on {
            self.auto_revisioning = false;
            self.env.dirty.force_dirty();
            log_event(Event::AutoRevisioningDisabled, &[]);
            return Ok(());
        }

        let version = self.next_version()?;
        let revision_id = self.next_revision_id()?;
        let label = self.auto_revision_label()?;
        let now = self.env.clock.now();
        let record = VersionRecord::mint(version, now, true, self.env.uuids.as_ref())
            .map_err(|e| environment_failure(e, "set_auto_revisioning"))?;

        self.commit_revision(RevisionRecord::new(revision_id, Some(label), now, version))?;

        self.version = version;
        self.history.push(record);
        self.auto_revisioning = true;
        self.env.dirty.force_dirty();
        self.set_show_revision_id(SHOW_ALL_REVISIONS);
        self.set_mark_revisions(true);

        log_event(
            Event::AutoRevisioningEnabled,
            &[
                ("revision_id", revision_id.to_string().as_str()),
                ("version", version.to_string().as_str()),
            ],
        );
        Ok(())
    }

    fn next_version(&self) -> DocResult<u32> {
        self.version
            .checked_add(1)
            .ok_or(DocError::VersionExhausted(self.version))
    }

    /// Id for the next automatic revision. Never 0.
    fn next_revision_id(&self) -> DocResult<u32> {
        self.revision_id
            .checked_add(1)
            .ok_or(DocError::RevisionIdExhausted(self.revision_id))
    }

    fn auto_revision_label(&self) -> DocResult<String> {
        self.env
            .strings
            .lookup(StringId::AutoRevision)
            .ok_or_else(|| {
                environment_failure(
                    DocError::MissingString(StringId::AutoRevision.as_str()),
                    "auto_revision_label",
                )
            })
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn revision_id(&self) -> u32 {
        self.revision_id
    }

    pub fn show_revision_id(&self) -> u32 {
        self.show_revision_id
    }

    pub fn is_marking_revisions(&self) -> bool {
        self.mark_revisions
    }

    pub fn is_showing_revisions(&self) -> bool {
        self.show_revisions
    }

    pub fn is_auto_revisioning(&self) -> bool {
        self.auto_revisioning
    }

    pub fn history_was_saved(&self) -> bool {
        self.history_was_saved
    }

    pub fn last_opened_time(&self) -> DateTime<Utc> {
        self.last_opened_time
    }

    pub fn last_saved_time(&self) -> Option<DateTime<Utc>> {
        self.last_saved_time
    }

    // ------------------------------------------------------------------
    // Persisted representation
    // ------------------------------------------------------------------

    pub fn to_manifest(&self) -> DocumentManifest {
        DocumentManifest {
            format_version: MANIFEST_FORMAT_VERSION,
            document_uuid: self.uuid.to_string(),
            version: self.version,
            history_was_saved: self.history_was_saved,
            auto_revisioning: self.auto_revisioning,
            mark_revisions: self.mark_revisions,
            show_revisions: self.show_revisions,
            show_revision_id: self.show_revision_id,
            last_opened_time: self.last_opened_time,
            last_saved_time: self.last_saved_time,
            history: self.history.iter().map(VersionRecord::to_persisted).collect(),
            revisions: self
                .revisions
                .iter()
                .map(RevisionRecord::to_persisted)
                .collect(),
        }
    }

    /// Rebuilds a document from its persisted representation.
    ///
    /// The active revision id is not persisted; it becomes the id of the
    /// last revision loaded, or 0. The version is raised to the largest
    /// history id or revision version if the manifest records less.
    pub fn from_manifest(manifest: &DocumentManifest, env: Environment) -> DocResult<Self> {
        if manifest.format_version != MANIFEST_FORMAT_VERSION {
            return Err(DocError::UnsupportedFormat(manifest.format_version));
        }

        let uuid = env.uuids.parse_uuid(&manifest.document_uuid)?;
        let mut doc = Self::blank(env, uuid, manifest.last_opened_time);

        for p in &manifest.history {
            let record = VersionRecord::from_persisted(p, doc.env.uuids.as_ref())?;
            doc.history.push(record);
        }
        for p in &manifest.revisions {
            doc.revisions.add(RevisionRecord::from_persisted(p))?;
            doc.revision_id = p.id;
        }

        // a version behind its own history would hand out a stale id on the next save
        doc.version = doc
            .history
            .iter()
            .map(VersionRecord::id)
            .chain(doc.revisions.iter().map(RevisionRecord::version))
            .fold(manifest.version, u32::max);
        doc.history_was_saved = manifest.history_was_saved;
        doc.auto_revisioning = manifest.auto_revisioning;
        doc.mark_revisions = manifest.mark_revisions;
        doc.show_revisions = manifest.show_revisions;
        doc.show_revision_id = manifest.show_revision_id;
        doc.last_saved_time = manifest.last_saved_time;

        log_event(
            Event::DocumentLoaded,
            &[
                ("history_len", doc.history.len().to_string().as_str()),
                ("uuid", doc.uuid.to_string().as_str()),
                ("version", doc.version.to_string().as_str()),
            ],
        );
        Ok(doc)
    }
}

impl std::fmt::Debug for DocumentIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentIdentity")
            .field("uuid", &self.uuid)
            .field("version", &self.version)
            .field("history_len", &self.history.len())
            .field("revisions", &self.revisions.len())
            .field("auto_revisioning", &self.auto_revisioning)
            .finish()
    }
}

fn environment_failure(err: DocError, operation: &str) -> DocError {
    log_event(
        Event::EnvironmentFailure,
        &[("operation", operation), ("reason", err.to_string().as_str())],
    );
    err
}
