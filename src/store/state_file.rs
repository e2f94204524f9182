//! StateFile - Checksummed on-disk home of one document manifest
//!
//! ```json
//! { "checksum": "crc32:1a2b3c4d", "manifest": { ... } }
//! ```
//!
//! The checksum covers the compact JSON encoding of `manifest`. Writes go
//! to a sibling temp file which is fsynced (when enabled) and renamed over
//! the target.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::checksum::{compute_checksum, format_checksum};
use super::manifest::DocumentManifest;
use crate::errors::{DocError, DocResult};
use crate::observability::{log_event, Event};

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    checksum: String,
    manifest: DocumentManifest,
}

#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
    fsync: bool,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>, fsync: bool) -> Self {
        Self {
            path: path.into(),
            fsync,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn write(&self, manifest: &DocumentManifest) -> DocResult<()> {
        let checksum = format_checksum(compute_checksum(manifest.to_json()?.as_bytes()));
        let envelope = Envelope {
            checksum: checksum.clone(),
            manifest: manifest.clone(),
        };
        let body = serde_json::to_string_pretty(&envelope)?;

        let tmp = self.path.with_extension("tmp");
        {
            let mut file = File::create(&tmp)?;
            file.write_all(body.as_bytes())?;
            if self.fsync {
                file.sync_all()?;
            }
        }
        fs::rename(&tmp, &self.path)?;

        log_event(
            Event::StateWritten,
            &[
                ("checksum", checksum.as_str()),
                ("path", self.path.display().to_string().as_str()),
            ],
        );
        Ok(())
    }

    /// Reads and verifies the manifest.
    pub fn read(&self) -> DocResult<DocumentManifest> {
        let content = fs::read_to_string(&self.path)?;
        let envelope: Envelope = serde_json::from_str(&content)?;

        let found = format_checksum(compute_checksum(envelope.manifest.to_json()?.as_bytes()));
        if found != envelope.checksum {
            return Err(DocError::ChecksumMismatch {
                expected: envelope.checksum,
                found,
            });
        }

        log_event(
            Event::StateLoaded,
            &[("path", self.path.display().to_string().as_str())],
        );
        Ok(envelope.manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MANIFEST_FORMAT_VERSION;
    use chrono::DateTime;
    use tempfile::TempDir;

    fn manifest() -> DocumentManifest {
        DocumentManifest {
            format_version: MANIFEST_FORMAT_VERSION,
            document_uuid: "67e55044-10b1-426f-9247-bb680e5fe0c8".into(),
            version: 0,
            history_was_saved: false,
            auto_revisioning: false,
            mark_revisions: false,
            show_revisions: true,
            show_revision_id: 0,
            last_opened_time: DateTime::from_timestamp(1_000, 0).unwrap(),
            last_saved_time: None,
            history: Vec::new(),
            revisions: Vec::new(),
        }
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let file = StateFile::new(dir.path().join("doc.state.json"), true);
        assert!(!file.exists());

        file.write(&manifest()).unwrap();
        assert!(file.exists());
        assert!(!dir.path().join("doc.state.tmp").exists());
        assert_eq!(file.read().unwrap(), manifest());
    }

    #[test]
    fn test_tampered_manifest_detected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.state.json");
        let file = StateFile::new(&path, false);
        file.write(&manifest()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        fs::write(&path, content.replace("\"version\": 0", "\"version\": 7")).unwrap();

        assert!(matches!(file.read(), Err(DocError::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let file = StateFile::new(dir.path().join("absent.json"), false);
        assert!(matches!(file.read(), Err(DocError::Io(_))));
    }
}
