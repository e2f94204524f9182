//! # Document History Errors
//!
//! Error codes follow the `DOC_<CATEGORY>_<NAME>` scheme.
//!
//! Taxonomy:
//! - Environment failures (UUID provider, string resources) are FATAL
//! - Duplicate revision ids are recoverable; the caller picks a new id
//! - Exhausted version or revision counters reject the operation unchanged
//! - Not-found is never an error (sentinel or `Option` instead)
//! - State store and config failures are ERROR severity

use std::io;

use thiserror::Error;

/// Result type for document history operations
pub type DocResult<T> = Result<T, DocError>;

/// Document history errors
#[derive(Debug, Error)]
pub enum DocError {
    // Environment
    #[error("UUID provider failure: {0}")]
    UuidProvider(String),

    #[error("String resource unavailable: {0}")]
    MissingString(&'static str),

    // Revisions
    #[error("Revision already exists: {0}")]
    DuplicateRevision(u32),

    #[error("Revision id 0 is reserved")]
    ReservedRevisionId,

    #[error("Revision ids exhausted after {0}")]
    RevisionIdExhausted(u32),

    #[error("Document versions exhausted after {0}")]
    VersionExhausted(u32),

    // Identity / history invariants
    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),

    #[error("History is empty but was recorded as saved")]
    EmptyHistory,

    #[error("Document lock poisoned")]
    LockPoisoned,

    // State store
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Checksum mismatch: expected {expected}, found {found}")]
    ChecksumMismatch { expected: String, found: String },

    #[error("Unsupported state format version: {0}")]
    UnsupportedFormat(u8),

    // Configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DocError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            DocError::UuidProvider(_) => "DOC_ENV_UUID_PROVIDER",
            DocError::MissingString(_) => "DOC_ENV_MISSING_STRING",
            DocError::DuplicateRevision(_) => "DOC_REVISION_DUPLICATE",
            DocError::ReservedRevisionId => "DOC_REVISION_RESERVED_ID",
            DocError::RevisionIdExhausted(_) => "DOC_REVISION_ID_EXHAUSTED",
            DocError::VersionExhausted(_) => "DOC_HISTORY_VERSION_EXHAUSTED",
            DocError::InvalidUuid(_) => "DOC_IDENTITY_INVALID_UUID",
            DocError::EmptyHistory => "DOC_HISTORY_EMPTY",
            DocError::LockPoisoned => "DOC_LOCK_POISONED",
            DocError::Io(_) => "DOC_STORE_IO",
            DocError::Serialization(_) => "DOC_STORE_SERIALIZATION",
            DocError::ChecksumMismatch { .. } => "DOC_STORE_CHECKSUM",
            DocError::UnsupportedFormat(_) => "DOC_STORE_FORMAT",
            DocError::Config(_) => "DOC_CONFIG_INVALID",
        }
    }

    /// Environment failures indicate a broken host, not bad input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DocError::UuidProvider(_) | DocError::MissingString(_))
    }

    /// Whether the caller can recover locally (e.g. by choosing another id)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DocError::DuplicateRevision(_))
    }
}
