// Shutdown Flag

use std::sync::{PoisonError, RwLock, RwLockReadGuard};

/// Process-wide "shutdown requested" flag.
///
/// `false` until raised, then permanently `true`. Readers proceed
/// concurrently; the single `false -> true` write excludes all readers.
#[derive(Debug, Default)]
pub struct ShutdownFlag {
    raised: RwLock<bool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if shutdown was requested
    pub fn is_raised(&self) -> bool {
        *self.read()
    }

    /// Hold a read guard; a concurrent `raise` waits until it is dropped
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, bool> {
        // A panicking reader cannot leave a bool half-written
        self.raised.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Raise the flag. Returns `true` only for the call that flipped it.
    pub fn raise(&self) -> bool {
        let mut raised = self.raised.write().unwrap_or_else(PoisonError::into_inner);
        if *raised {
            return false;
        }
        *raised = true;
        true
    }
}
