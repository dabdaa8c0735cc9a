// ============================================================================
// Keyed Locks
// One mutex per key, so work on different keys never contends
// ============================================================================

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Lazily created per-key mutexes.
///
/// Entries live for the lifetime of the table. Keys are charts, so the
/// table grows with the number of charts, not with traffic.
pub struct KeyedLocks<K> {
    locks: RwLock<HashMap<K, Arc<Mutex<()>>>>,
}

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
    pub fn new() -> Self {
        Self {
            locks: RwLock::new(HashMap::new()),
        }
    }

    /// Run `f` while holding the lock for `key`.
    pub fn with_lock<R>(&self, key: &K, f: impl FnOnce() -> R) -> R {
        let lock = self.lock_for(key);
        let _guard = lock.lock();
        f()
    }

    pub fn len(&self) -> usize {
        self.locks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.read().is_empty()
    }

    fn lock_for(&self, key: &K) -> Arc<Mutex<()>> {
        if let Some(lock) = self.locks.read().get(key) {
            return Arc::clone(lock);
        }
        let mut locks = self.locks.write();
        Arc::clone(locks.entry(key.clone()).or_default())
    }
}

impl<K: Eq + Hash + Clone> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self::new()
    }
}
