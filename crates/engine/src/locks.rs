//! Advisory locks for callers that serialize access themselves
//!
//! The engine takes no locks internally: every call is synchronous and
//! the storage is single-writer by contract. Integration layers that used
//! to rely on a process-wide singleton serializing "read constants" and
//! "logging" activity construct one `AdvisoryLocks` value instead and
//! pass it to the code paths that need exclusion. If the storage backend
//! already serializes, no locks are needed at all.

use parking_lot::{Mutex, MutexGuard};

/// Two independent advisory locks: constants reading and logging
///
/// Purely advisory: nothing in the engine checks them. Guards unlock on
/// drop.
#[derive(Debug, Default)]
pub struct AdvisoryLocks {
    constants: Mutex<()>,
    log: Mutex<()>,
}

impl AdvisoryLocks {
    /// Create an unlocked pair
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the constants-reading lock, blocking until available
    pub fn lock_constants(&self) -> MutexGuard<'_, ()> {
        self.constants.lock()
    }

    /// Take the logging lock, blocking until available
    pub fn lock_log(&self) -> MutexGuard<'_, ()> {
        self.log.lock()
    }
}
