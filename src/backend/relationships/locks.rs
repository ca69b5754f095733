//! Per-pair mutual exclusion
//!
//! Every relationship mutation holds the lock of its unordered pair for the
//! whole read-check-write sequence. Entries are created on demand and removed
//! when the last holder or waiter is gone. A waiter cancelled after being
//! handed the lock can leave an entry nobody references; `lock` sweeps those.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// Unordered pair of user ids, stored as (low, high)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey(Uuid, Uuid);

impl PairKey {
    pub fn new(a: Uuid, b: Uuid) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }
}

type LockTable = HashMap<PairKey, Arc<AsyncMutex<()>>>;

/// Table of async mutexes keyed by pair
#[derive(Debug, Clone, Default)]
pub struct PairLocks {
    table: Arc<Mutex<LockTable>>,
}

impl PairLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to the pair {a, b}
    pub async fn lock(&self, a: Uuid, b: Uuid) -> PairGuard {
        let key = PairKey::new(a, b);
        let mutex = {
            let mut table = self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            // Clones are only taken under this lock, so a count of one means unused.
            table.retain(|_, mutex| Arc::strong_count(mutex) > 1);
            table.entry(key).or_default().clone()
        };
        let guard = mutex.lock_owned().await;
        PairGuard {
            key,
            guard: Some(guard),
            table: self.table.clone(),
        }
    }

    /// Number of pairs with a live lock entry
    pub fn active_pairs(&self) -> usize {
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }
}

/// Held while a pair is being mutated
#[derive(Debug)]
pub struct PairGuard {
    key: PairKey,
    guard: Option<OwnedMutexGuard<()>>,
    table: Arc<Mutex<LockTable>>,
}

impl Drop for PairGuard {
    fn drop(&mut self) {
        // Release first so the strong count below only counts the table and waiters.
        drop(self.guard.take());
        let mut table = self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(mutex) = table.get(&self.key) {
            if Arc::strong_count(mutex) == 1 {
                table.remove(&self.key);
            }
        }
    }
}
