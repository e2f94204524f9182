//! SharedIdentity - One lock around a whole document identity
//!
//! History and revision mutations are never interleaved: an autosave timer
//! and an editing thread both go through the same mutex.

use std::sync::{Arc, Mutex};

use super::document::DocumentIdentity;
use crate::errors::{DocError, DocResult};

#[derive(Clone)]
pub struct SharedIdentity {
    inner: Arc<Mutex<DocumentIdentity>>,
}

impl SharedIdentity {
    pub fn new(doc: DocumentIdentity) -> Self {
        Self {
            inner: Arc::new(Mutex::new(doc)),
        }
    }

    /// Runs `f` with exclusive access to the document.
    pub fn with<R>(&self, f: impl FnOnce(&mut DocumentIdentity) -> R) -> DocResult<R> {
        let mut guard = self.inner.lock().map_err(|_| DocError::LockPoisoned)?;
        Ok(f(&mut guard))
    }

    /// Like `with`, for operations that themselves return a `DocResult`.
    pub fn try_with<R>(
        &self,
        f: impl FnOnce(&mut DocumentIdentity) -> DocResult<R>,
    ) -> DocResult<R> {
        self.with(f)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::clock::ManualClock;
    use crate::identity::environment::Environment;
    use crate::identity::strings::StaticStrings;
    use std::thread;

    #[test]
    fn test_concurrent_saves_are_serialized() {
        let clock = Arc::new(ManualClock::at(1_000));
        let (env, _) = Environment::manual(clock, StaticStrings::with_auto_revision_label("Auto"));
        let shared = SharedIdentity::new(DocumentIdentity::new(env).unwrap());
        shared.try_with(|d| d.set_auto_revisioning(true)).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let s = shared.clone();
                thread::spawn(move || {
                    for _ in 0..5 {
                        s.try_with(|d| d.adjust_history_on_save()).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        shared
            .with(|d| {
                assert_eq!(d.version(), 21);
                assert_eq!(d.history_count(), 21);
                assert_eq!(d.revisions().len(), 21);
                assert_eq!(d.highest_revision_id(), 21);
            })
            .unwrap();
    }

    #[test]
    fn test_poisoned_lock_reported() {
        let clock = Arc::new(ManualClock::at(1_000));
        let (env, _) = Environment::manual(clock, StaticStrings::empty());
        let shared = SharedIdentity::new(DocumentIdentity::new(env).unwrap());

        let s = shared.clone();
        let _ = thread::spawn(move || {
            s.with(|_| panic!("editor crashed")).unwrap();
        })
        .join();

        assert!(matches!(shared.with(|_| ()), Err(DocError::LockPoisoned)));
    }
}
