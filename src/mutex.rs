//! A mutex, providing unique syncronized access to a value

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};
use core::ptr::NonNull;

use crate::spin::{SpinLock, SpinLockGuard};

/// A spinning mutex.
///
/// This is the lock every holder in the crate keeps next to
/// its slot. It's held only while checking for, and building, the
/// instance.
pub struct Mutex<T> {
    lock: SpinLock,
    data: UnsafeCell<T>,
}

unsafe impl<T: Send> Sync for Mutex<T> {}
unsafe impl<T: Send> Send for Mutex<T> {}

#[must_use = "if unused, the mutex will unlock inmediately"]
pub struct MutexGuard<'a, T> {
    _lock: SpinLockGuard<'a>,
    data: NonNull<T>,
}

unsafe impl<T: Sync> Sync for MutexGuard<'_, T> {}

impl<T> Deref for MutexGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        /* SAFETY: The guard holds the spinlock, so no
         * other reference to data exists */
        unsafe { self.data.as_ref() }
    }
}

impl<T> DerefMut for MutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        unsafe { self.data.as_mut() }
    }
}

impl<T> Mutex<T> {

    /// Creates a new `Mutex` from the given value
    pub const fn new(val: T) -> Self {
        Self {
            lock: SpinLock::new(),
            data: UnsafeCell::new(val),
        }
    }

    fn guard<'a>(&'a self, lock: SpinLockGuard<'a>) -> MutexGuard<'a, T> {
        /* SAFETY: UnsafeCell::get never returns null */
        let data = unsafe { NonNull::new_unchecked(self.data.get()) };
        MutexGuard { _lock: lock, data }
    }

    /// Returns a [lock guard](MutexGuard) for `self`, if it is
    /// available.
    /// If the operation whould've locked the execution, returns
    /// [None] inmediately
    pub fn try_lock(&self) -> Option<MutexGuard<'_, T>> {
        self.lock.try_lock().map(|lock| self.guard(lock))
    }

    /// Locks the mutex until it's available, and returns
    /// a [guard](MutexGuard) to the object.
    ///
    /// The lock is held until the `MutexGuard` is dropped. If the
    /// thread unwinds while holding the guard, the lock is released
    /// (there's no poisoning).
    pub fn lock(&self) -> MutexGuard<'_, T> {
        let lock = self.lock.lock();
        self.guard(lock)
    }

    /// Returns true if some guard is currently alive
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// Gets a mutable reference to the object.
    ///
    /// `&mut self` proves there are no guards, so no locking
    /// is needed.
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    /// Consumes the mutex, returning the inner value
    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: Default> Default for Mutex<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
