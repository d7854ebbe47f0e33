// src/services/entity_locks.rs
//
// Per-entity write serialization. A read-merge-write sequence on one entity
// runs under that entity's lock; different entities proceed in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::AppResult;

#[derive(Default)]
pub struct EntityLocks {
    locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl EntityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `work` while holding the lock for `id`
    pub fn with_lock<R>(&self, id: i64, work: impl FnOnce() -> AppResult<R>) -> AppResult<R> {
        let lock = self.lock_for(id)?;
        let _guard = lock.lock()?;
        work()
    }

    fn lock_for(&self, id: i64) -> AppResult<Arc<Mutex<()>>> {
        let mut locks = self.locks.lock()?;
        // Entries nobody else holds can go
        locks.retain(|key, lock| *key == id || Arc::strong_count(lock) > 1);
        Ok(Arc::clone(locks.entry(id).or_default()))
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or_default()
    }
}
