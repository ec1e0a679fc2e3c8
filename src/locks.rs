use std::collections::HashSet;
use std::sync::{Arc, Condvar, Mutex, PoisonError};

use crate::language::LanguageCode;

/// Advisory in-process locks, one per destination code.
///
/// Holding the guard covers the idempotency check and every write after it,
/// so two requests for the same destination never interleave.
#[derive(Debug, Clone, Default)]
pub struct DestinationLocks {
    inner: Arc<LockTable>,
}

#[derive(Debug, Default)]
struct LockTable {
    held: Mutex<HashSet<String>>,
    released: Condvar,
}

impl DestinationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until no other guard for `code` is alive.
    pub fn acquire(&self, code: &LanguageCode) -> DestinationGuard {
        let table = &self.inner;
        let mut held = table.held.lock().unwrap_or_else(PoisonError::into_inner);
        while held.contains(code.as_str()) {
            tracing::debug!(%code, "waiting for destination lock");
            held = table
                .released
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        held.insert(code.as_str().to_owned());

        DestinationGuard {
            table: Arc::clone(&self.inner),
            code: code.as_str().to_owned(),
        }
    }

    #[cfg(test)]
    fn is_held(&self, code: &LanguageCode) -> bool {
        self.inner
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(code.as_str())
    }
}

#[derive(Debug)]
pub struct DestinationGuard {
    table: Arc<LockTable>,
    code: String,
}

impl Drop for DestinationGuard {
    fn drop(&mut self) {
        let mut held = self
            .table
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        held.remove(&self.code);
        self.table.released.notify_all();
    }
}
