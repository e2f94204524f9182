//! DocUuid - Globally unique identity for documents and history entries
//!
//! A `DocUuid` wraps a `uuid::Uuid`. The nil UUID is the "null identity":
//! it is what an importer leaves behind when it supplies nothing usable,
//! and it never compares as related to anything.
//!
//! Freshly minted UUIDs are version 7, so they carry their creation time.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::{NoContext, Timestamp, Uuid};

use super::clock::{Clock, SystemClock};
use crate::errors::{DocError, DocResult};

/// An opaque unique identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocUuid(Uuid);

impl DocUuid {
    /// The null identity.
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Wraps an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parses any textual form `uuid` accepts (hyphenated, simple, braced,
    /// URN, either case).
    ///
    /// The text is not kept: `Display` always writes the lowercase
    /// hyphenated form, so only that form round-trips byte for byte.
    pub fn parse(s: &str) -> DocResult<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| DocError::InvalidUuid(format!("{}: {}", s, e)))
    }

    /// Returns true for the null identity.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.is_nil()
    }

    /// Returns the wrapped UUID.
    #[inline]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Creation time embedded in the UUID, if it carries one.
    ///
    /// Only time-based UUIDs (v1, v6, v7) have a timestamp.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        let (secs, nanos) = self.0.get_timestamp()?.to_unix();
        DateTime::from_timestamp(i64::try_from(secs).ok()?, nanos)
    }
}

impl fmt::Display for DocUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl Default for DocUuid {
    fn default() -> Self {
        Self::nil()
    }
}

/// Supplier of unique identifiers.
///
/// Copying an identifier is `Clone`; the provider only mints and parses.
pub trait UuidProvider: Send + Sync {
    /// Mints a fresh identifier stamped with the current time.
    fn create_uuid(&self) -> DocResult<DocUuid>;

    /// Rebuilds an identifier from its serialized form.
    fn parse_uuid(&self, s: &str) -> DocResult<DocUuid> {
        DocUuid::parse(s)
    }

    /// A random 32-bit identifier.
    fn new_uuid32(&self) -> u32;

    /// A random 64-bit identifier.
    fn new_uuid64(&self) -> u64;
}

/// Mints version 7 UUIDs from an injected clock.
pub struct ClockedUuidProvider {
    clock: Arc<dyn Clock>,
}

impl ClockedUuidProvider {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Provider backed by the system clock.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl UuidProvider for ClockedUuidProvider {
    fn create_uuid(&self) -> DocResult<DocUuid> {
        let now = self.clock.now();
        let secs = u64::try_from(now.timestamp()).map_err(|_| {
            DocError::UuidProvider(format!("clock reads before the unix epoch: {}", now))
        })?;
        let ts = Timestamp::from_unix(NoContext, secs, now.timestamp_subsec_nanos());
        Ok(DocUuid(Uuid::new_v7(ts)))
    }

    fn new_uuid32(&self) -> u32 {
        self.new_uuid64() as u32
    }

    fn new_uuid64(&self) -> u64 {
        Uuid::new_v4().as_u64_pair().0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::clock::ManualClock;

    fn provider_at(secs: i64) -> ClockedUuidProvider {
        ClockedUuidProvider::new(Arc::new(ManualClock::at(secs)))
    }

    #[test]
    fn test_minted_uuid_carries_clock_time() {
        let uuid = provider_at(1_700_000_000).create_uuid().unwrap();
        assert_eq!(uuid.time().unwrap().timestamp(), 1_700_000_000);
        assert!(!uuid.is_null());
    }

    #[test]
    fn test_minted_uuids_are_distinct() {
        let provider = provider_at(42);
        let a = provider.create_uuid().unwrap();
        let b = provider.create_uuid().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_clock_before_epoch_fails() {
        let result = provider_at(-5).create_uuid();
        assert!(matches!(result, Err(DocError::UuidProvider(_))));
    }

    #[test]
    fn test_parse_and_display() {
        let text = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        let uuid = DocUuid::parse(text).unwrap();
        assert_eq!(uuid.to_string(), text);
        // v4 has no embedded time
        assert!(uuid.time().is_none());
    }

    #[test]
    fn test_other_forms_normalize_to_hyphenated() {
        let canonical = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        for text in [
            "67E55044-10B1-426F-9247-BB680E5FE0C8",
            "67e5504410b1426f9247bb680e5fe0c8",
            "{67e55044-10b1-426f-9247-bb680e5fe0c8}",
        ] {
            let uuid = DocUuid::parse(text).unwrap();
            assert_eq!(uuid, DocUuid::parse(canonical).unwrap());
            assert_eq!(uuid.to_string(), canonical);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            DocUuid::parse("not-a-uuid"),
            Err(DocError::InvalidUuid(_))
        ));
    }

    #[test]
    fn test_nil_is_null() {
        assert!(DocUuid::nil().is_null());
        assert!(DocUuid::default().is_null());
        assert!(DocUuid::parse("00000000-0000-0000-0000-000000000000")
            .unwrap()
            .is_null());
    }
}
