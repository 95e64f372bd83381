//! Per-destination locking so one file is generated by one task at a time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Default)]
struct Slot {
    lock: Arc<AsyncMutex<()>>,
    /// Holder plus waiters.
    users: usize,
}

#[derive(Debug, Default)]
pub(crate) struct PathLocks {
    inner: Mutex<HashMap<PathBuf, Slot>>,
}

impl PathLocks {
    /// Waits until `path` is free and holds it until the guard is dropped.
    ///
    /// Dropping the returned future while it waits unregisters the waiter.
    pub(crate) async fn acquire(&self, path: &Path) -> PathGuard<'_> {
        let (lock, registration) = self.register(path);
        let guard = lock.lock_owned().await;

        PathGuard {
            _guard: guard,
            _registration: registration,
        }
    }

    fn register(&self, path: &Path) -> (Arc<AsyncMutex<()>>, Registration<'_>) {
        let mut map = self.inner.lock();
        let slot = map.entry(path.to_path_buf()).or_default();
        slot.users += 1;

        (
            Arc::clone(&slot.lock),
            Registration {
                locks: self,
                path: path.to_path_buf(),
            },
        )
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().len()
    }
}

struct Registration<'a> {
    locks: &'a PathLocks,
    path: PathBuf,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        let mut map = self.locks.inner.lock();
        if let Some(slot) = map.get_mut(&self.path) {
            slot.users -= 1;
            if slot.users == 0 {
                map.remove(&self.path);
            }
        }
    }
}

/// Fields drop in order: the lock is released before the slot is unregistered.
pub(crate) struct PathGuard<'a> {
    _guard: OwnedMutexGuard<()>,
    _registration: Registration<'a>,
}
