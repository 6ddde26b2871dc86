//! Named scratch-resource locks.
//!
//! Several subsystems materialize host output into shared scratch files
//! (one well-known member per subsystem). Access to each scratch name must
//! be serialized across threads of this process; the host side is already
//! serialized per connection.

use parking_lot::{Condvar, Mutex};
use std::collections::HashSet;
use std::sync::Arc;

/// Registry of named exclusive locks.
///
/// `acquire` blocks until the name is free and returns a guard that
/// releases on drop.
#[derive(Debug, Default)]
pub struct LockRegistry {
    held: Mutex<HashSet<String>>,
    freed: Condvar,
}

impl LockRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry wrapped in `Arc` for sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Acquire the named lock, blocking until it is free.
    pub fn acquire<'a>(&'a self, name: &str) -> LockGuard<'a> {
        let mut held = self.held.lock();
        while held.contains(name) {
            self.freed.wait(&mut held);
        }
        held.insert(name.to_string());
        LockGuard {
            registry: self,
            name: name.to_string(),
        }
    }

    /// Try to acquire the named lock without blocking.
    pub fn try_acquire<'a>(&'a self, name: &str) -> Option<LockGuard<'a>> {
        let mut held = self.held.lock();
        if held.contains(name) {
            return None;
        }
        held.insert(name.to_string());
        Some(LockGuard {
            registry: self,
            name: name.to_string(),
        })
    }

    fn release(&self, name: &str) {
        let mut held = self.held.lock();
        held.remove(name);
        self.freed.notify_all();
    }
}

/// Holds one named lock; releases it on drop.
#[derive(Debug)]
pub struct LockGuard<'a> {
    registry: &'a LockRegistry,
    name: String,
}

impl LockGuard<'_> {
    /// The held lock name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        self.registry.release(&self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn exclusive_per_name() {
        let registry = LockRegistry::new();
        let guard = registry.acquire("DSPFFD");
        assert!(registry.try_acquire("DSPFFD").is_none());
        assert!(registry.try_acquire("DSPOBJD").is_some());
        drop(guard);
        assert!(registry.try_acquire("DSPFFD").is_some());
    }

    #[test]
    fn acquire_blocks_until_released() {
        let registry = LockRegistry::shared();
        let guard = registry.acquire("SCRATCH");

        let shared = Arc::clone(&registry);
        let waiter = thread::spawn(move || {
            let guard = shared.acquire("SCRATCH");
            guard.name().to_string()
        });

        // Give the waiter time to block, then free the name.
        thread::sleep(Duration::from_millis(20));
        drop(guard);

        assert_eq!(waiter.join().unwrap(), "SCRATCH");
    }
}
