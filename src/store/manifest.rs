//! DocumentManifest - Serializable form of a document identity
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "document_uuid": "0189a4b2-7c00-7abc-8def-0123456789ab",
//!   "version": 3,
//!   "history_was_saved": true,
//!   "auto_revisioning": true,
//!   "mark_revisions": true,
//!   "show_revisions": true,
//!   "show_revision_id": 4294967295,
//!   "last_opened_time": "2023-11-14T22:13:20Z",
//!   "last_saved_time": "2023-11-14T22:14:20Z",
//!   "history": [{ "id": 2, "uuid": "...", "start_time": "...", "auto_revision": false }],
//!   "revisions": [{ "id": 1, "description": "Autorevision", "start_time": "...", "version": 3 }]
//! }
//! ```
//!
//! The active revision id is deliberately absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DocResult;
use crate::identity::{PersistedRevision, PersistedVersion};

pub const MANIFEST_FORMAT_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentManifest {
    pub format_version: u8,
    pub document_uuid: String,
    pub version: u32,
    pub history_was_saved: bool,
    pub auto_revisioning: bool,
    pub mark_revisions: bool,
    pub show_revisions: bool,
    pub show_revision_id: u32,
    pub last_opened_time: DateTime<Utc>,
    #[serde(default)]
    pub last_saved_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub history: Vec<PersistedVersion>,
    #[serde(default)]
    pub revisions: Vec<PersistedRevision>,
}

impl DocumentManifest {
    /// Compact JSON; this is also the exact byte string the checksum covers.
    pub fn to_json(&self) -> DocResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> DocResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> DocResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
