//! Observable events of the document history core
//!
//! Events are explicit and typed.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// A new document identity was minted
    DocumentCreated,
    /// A document identity was rebuilt from persisted state
    DocumentLoaded,

    // History
    /// A new entry was appended to the history
    HistoryAppended,
    /// A manual save was folded into the last history entry
    HistoryMerged,
    /// History was discarded
    HistoryPurged,

    // Revisions
    /// A revision was added
    RevisionAdded,
    /// A revision was rejected because its id is taken
    RevisionRejected,
    /// Revision table was cleared
    RevisionTablePurged,
    /// Auto-revisioning switched on
    AutoRevisioningEnabled,
    /// Auto-revisioning switched off
    AutoRevisioningDisabled,

    // Host environment
    /// A provider failed (FATAL)
    EnvironmentFailure,

    // State store
    /// State file written
    StateWritten,
    /// State file read and verified
    StateLoaded,
    /// Configuration loaded
    ConfigLoaded,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::DocumentCreated => "DOCUMENT_CREATED",
            Event::DocumentLoaded => "DOCUMENT_LOADED",
            Event::HistoryAppended => "HISTORY_APPENDED",
            Event::HistoryMerged => "HISTORY_MERGED",
            Event::HistoryPurged => "HISTORY_PURGED",
            Event::RevisionAdded => "REVISION_ADDED",
            Event::RevisionRejected => "REVISION_REJECTED",
            Event::RevisionTablePurged => "REVISION_TABLE_PURGED",
            Event::AutoRevisioningEnabled => "AUTO_REVISIONING_ENABLED",
            Event::AutoRevisioningDisabled => "AUTO_REVISIONING_DISABLED",
            Event::EnvironmentFailure => "ENVIRONMENT_FAILURE",
            Event::StateWritten => "STATE_WRITTEN",
            Event::StateLoaded => "STATE_LOADED",
            Event::ConfigLoaded => "CONFIG_LOADED",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::EnvironmentFailure)
    }

    /// Rejections are worth a warning; everything else non-fatal is INFO.
    pub fn is_warning(&self) -> bool {
        matches!(self, Event::RevisionRejected)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_screaming_snake() {
        for event in [
            Event::DocumentCreated,
            Event::HistoryMerged,
            Event::AutoRevisioningEnabled,
            Event::StateLoaded,
        ] {
            let name = event.as_str();
            assert!(name.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_only_environment_failure_is_fatal() {
        assert!(Event::EnvironmentFailure.is_fatal());
        assert!(!Event::RevisionRejected.is_fatal());
        assert!(Event::RevisionRejected.is_warning());
    }
}
