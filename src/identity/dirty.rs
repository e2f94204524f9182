//! Dirty-flag notification
//!
//! The core reports every persistent state change; scheduling the actual
//! save belongs to whoever owns the sink.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Receiver of "document changed" notifications.
pub trait DirtySink: Send + Sync {
    fn force_dirty(&self);
}

/// A dirty flag that also counts notifications.
#[derive(Debug, Default)]
pub struct DirtyFlag {
    dirty: AtomicBool,
    notifications: AtomicU64,
}

impl DirtyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clears the flag, e.g. after the document was written out.
    pub fn clear(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    /// Number of `force_dirty` calls received so far.
    pub fn notifications(&self) -> u64 {
        self.notifications.load(Ordering::SeqCst)
    }
}

impl DirtySink for DirtyFlag {
    fn force_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
        self.notifications.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_dirty_sets_and_counts() {
        let flag = DirtyFlag::new();
        assert!(!flag.is_dirty());

        flag.force_dirty();
        flag.force_dirty();
        assert!(flag.is_dirty());
        assert_eq!(flag.notifications(), 2);

        flag.clear();
        assert!(!flag.is_dirty());
        assert_eq!(flag.notifications(), 2);
    }
}
