//! Environment - Collaborators injected into a document identity
//!
//! A document never reaches for process-wide state; everything it needs
//! from the host is handed over here at construction.

use std::sync::Arc;

use super::clock::{Clock, ManualClock, SystemClock};
use super::dirty::{DirtyFlag, DirtySink};
use super::doc_uuid::{ClockedUuidProvider, UuidProvider};
use super::strings::{StaticStrings, StringProvider};

/// Host collaborators of the identity core.
#[derive(Clone)]
pub struct Environment {
    pub uuids: Arc<dyn UuidProvider>,
    pub strings: Arc<dyn StringProvider>,
    pub clock: Arc<dyn Clock>,
    pub dirty: Arc<dyn DirtySink>,
}

impl Environment {
    pub fn new(
        uuids: Arc<dyn UuidProvider>,
        strings: Arc<dyn StringProvider>,
        clock: Arc<dyn Clock>,
        dirty: Arc<dyn DirtySink>,
    ) -> Self {
        Self {
            uuids,
            strings,
            clock,
            dirty,
        }
    }

    /// System clock, v7 UUIDs and the given auto-revision label.
    ///
    /// Returns the dirty flag alongside so the caller can observe it.
    pub fn system(auto_revision_label: &str) -> (Self, Arc<DirtyFlag>) {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let dirty = Arc::new(DirtyFlag::new());
        let env = Self::new(
            Arc::new(ClockedUuidProvider::new(clock.clone())),
            Arc::new(StaticStrings::with_auto_revision_label(auto_revision_label)),
            clock,
            dirty.clone(),
        );
        (env, dirty)
    }

    /// Deterministic environment driven by a manual clock.
    pub fn manual(clock: Arc<ManualClock>, strings: StaticStrings) -> (Self, Arc<DirtyFlag>) {
        let dirty = Arc::new(DirtyFlag::new());
        let env = Self::new(
            Arc::new(ClockedUuidProvider::new(clock.clone())),
            Arc::new(strings),
            clock,
            dirty.clone(),
        );
        (env, dirty)
    }

    /// Replaces the UUID provider.
    pub fn with_uuids(mut self, uuids: Arc<dyn UuidProvider>) -> Self {
        self.uuids = uuids;
        self
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment").finish_non_exhaustive()
    }
}
