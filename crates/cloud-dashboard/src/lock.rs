//! Drop-if-busy render guard.
//!
//! A render requested while another one is in flight is skipped, never
//! queued. This bounds staleness to one refresh interval instead of piling
//! requests onto a slow API.

use tokio::sync::{Mutex, MutexGuard};

/// Non-blocking mutual exclusion for one renderable unit.
#[derive(Debug, Default)]
pub struct RenderLock {
    inner: Mutex<()>,
}

/// Held while a render is in flight. Releases on drop.
#[derive(Debug)]
pub struct RenderGuard<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl RenderLock {
    /// Create an unlocked guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock, or `None` if a render is already running.
    pub fn try_acquire(&self) -> Option<RenderGuard<'_>> {
        self.inner
            .try_lock()
            .ok()
            .map(|guard| RenderGuard { _guard: guard })
    }

    /// Whether a render currently holds the lock.
    pub fn is_busy(&self) -> bool {
        self.inner.try_lock().is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_while_held() {
        let lock = RenderLock::new();
        let guard = lock.try_acquire().expect("free");
        assert!(lock.is_busy());
        assert!(lock.try_acquire().is_none());
        drop(guard);
        assert!(!lock.is_busy());
        assert!(lock.try_acquire().is_some());
    }

    #[test]
    fn released_on_early_return() {
        fn render(lock: &RenderLock, fail: bool) -> Result<(), &'static str> {
            let Some(_guard) = lock.try_acquire() else {
                return Ok(());
            };
            if fail {
                return Err("fetch failed");
            }
            Ok(())
        }

        let lock = RenderLock::new();
        assert!(render(&lock, true).is_err());
        assert!(!lock.is_busy());
    }
}
