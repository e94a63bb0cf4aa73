//! A spinlock, the core primitive of this crate

use core::sync::atomic::{AtomicBool, Ordering};

/// Upper bound for the exponential backoff, as a power of two
const MAX_BACKOFF_SHIFT: u32 = 6;

/// A spin lock synchronization primitive.
///
/// Every holder in this crate is built on top of it, through
/// [Mutex](crate::mutex::Mutex)
pub struct SpinLock {
    lock: AtomicBool,
}

/// A guard for the [SpinLock]
///
/// This structure represents a borrow of the spinlock.
/// When droped, the [SpinLock] is marked as available again
#[must_use = "if unused, the lock will release automatically"]
pub struct SpinLockGuard<'a> {
    lock: &'a AtomicBool,
}

impl Drop for SpinLockGuard<'_> {
    fn drop(&mut self) {
        self.lock.store(false, Ordering::Release);
    }
}

impl SpinLock {

    /// Creates a new, unlocked `SpinLock`
    pub const fn new() -> Self {
        Self { lock: AtomicBool::new(false) }
    }

    /// Borrows the lock if it's available.
    /// If another guard is alive, returns [None] inmediately
    /// instead of waiting.
    pub fn try_lock(&self) -> Option<SpinLockGuard<'_>> {
        self.lock
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
            .then(|| SpinLockGuard { lock: &self.lock })
    }

    /// Waits for the lock to be available, and borrows it,
    /// returning a [SpinLockGuard]
    ///
    /// While the lock is taken, the thread spins on a plain load
    /// (not on the compare-exchange), backing off exponentially
    /// so that contending threads don't hammer the cache line.
    pub fn lock(&self) -> SpinLockGuard<'_> {
        let mut shift = 0;
        loop {
            if let Some(guard) = self.try_lock() {
                return guard
            }
            while self.lock.load(Ordering::Relaxed) {
                for _ in 0..(1u32 << shift) {
                    core::hint::spin_loop();
                }
                if shift < MAX_BACKOFF_SHIFT {
                    shift += 1;
                }
            }
        }
    }

    /// Returns true if the lock is currently borrowed
    pub fn is_locked(&self) -> bool {
        self.lock.load(Ordering::Relaxed)
    }
}

impl Default for SpinLock {
    fn default() -> Self {
        Self::new()
    }
}
