use core::cell::UnsafeCell;
use core::convert::Infallible;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::Mutex;

/// A synchronization primitive that can only be written to once
///
/// Once the cell is written, reads are a single `Acquire` load. Only
/// threads that find it empty take the internal lock, re-check, and
/// (at most one of them) run the initializer.
///
/// # Example
/// ```
/// use singletonrs::OnceLock;
///
/// static CELL: OnceLock<usize> = OnceLock::new();
/// // `OnceLock` has not been written to yet.
/// assert!(CELL.get().is_none());
///
/// // Spawn a thread and write to `OnceLock`.
/// std::thread::spawn(|| {
///     let value = CELL.get_or_init(|| 12345);
///     assert_eq!(value, &12345);
/// })
/// .join()
/// .unwrap();
///
/// // `OnceLock` now contains the value.
/// assert_eq!(
///     CELL.get(),
///     Some(&12345),
/// );
/// ```
pub struct OnceLock<T> {
    elem: UnsafeCell<MaybeUninit<T>>,
    ready: AtomicBool,
    lock: Mutex<()>,
}

impl<T> OnceLock<T> {
    /// Creates a new uninitialized [OnceLock]
    pub const fn new() -> Self {
        Self {
            elem: UnsafeCell::new(MaybeUninit::uninit()),
            ready: AtomicBool::new(false),
            lock: Mutex::new(()),
        }
    }

    /// Gets the element, initialzing it with `init` if necessary
    ///
    /// # Panics
    /// If `init` panics, the panic is propagated to the caller and
    /// the cell stays empty.
    ///
    /// # Deadlocks
    /// Calling `get_or_init` on the same cell from inside `init`
    /// spins forever.
    ///
    /// # Example
    /// ```
    /// use singletonrs::OnceLock;
    ///
    /// static CELL: OnceLock<usize> = OnceLock::new();
    ///
    /// assert_eq!(
    ///     // CELL is empty, it will be initialized with the closure
    ///     CELL.get_or_init(|| 123),
    ///     &123,
    /// );
    ///
    /// assert_eq!(
    ///     // CELL is already initialized, so the closure won't be called
    ///     CELL.get_or_init(|| 999),
    ///     &123
    /// );
    /// ```
    pub fn get_or_init<F>(&self, init: F) -> &T
    where
        F: FnOnce() -> T
    {
        match self.get_or_try_init(|| Ok::<T, Infallible>(init())) {
            Ok(elem) => elem,
            Err(never) => match never {},
        }
    }

    /// Gets the element, initialzing it with `init` if necessary.
    ///
    /// If `init` fails, the error is returned to this caller and
    /// the cell is left empty, so a later call may try again.
    ///
    /// # Example
    /// ```
    /// use singletonrs::OnceLock;
    ///
    /// let cell = OnceLock::new();
    ///
    /// assert_eq!(cell.get_or_try_init(|| Err("not yet")), Err("not yet"));
    /// assert!(cell.get().is_none());
    ///
    /// assert_eq!(cell.get_or_try_init(|| Ok::<_, &str>(5)), Ok(&5));
    /// ```
    pub fn get_or_try_init<F, E>(&self, init: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>
    {
        if let Some(elem) = self.get() {
            return Ok(elem)
        }

        let _guard = self.lock.lock();
        /* Some other thread may have written the element while
         * we were waiting for the lock */
        if !self.ready.load(Ordering::Acquire) {
            let value = init()?;
            /* SAFETY: We hold the lock and the cell is not ready,
             * so nobody else is reading or writing the element */
            unsafe { (*self.elem.get()).write(value); }
            self.ready.store(true, Ordering::Release);
        }

        /* SAFETY: ready is true at this point */
        Ok(unsafe { self.get_unchecked() })
    }

    /// Tries to get the element, if it is initialized
    ///
    /// This never takes the lock.
    ///
    /// # Example
    /// ```
    /// use singletonrs::OnceLock;
    ///
    /// static CELL: OnceLock<usize> = OnceLock::new();
    ///
    /// assert!(CELL.get().is_none());
    /// CELL.get_or_init(|| 123);
    ///
    /// assert_eq!(
    ///     CELL.get(),
    ///     Some(&123),
    /// );
    /// ```
    pub fn get(&self) -> Option<&T> {
        /* The Acquire load pairs with the Release store in
         * get_or_try_init, so the write of the element is visible */
        self.ready
            .load(Ordering::Acquire)
            .then(|| unsafe { self.get_unchecked() })
    }

    /// Returns true if the element has been written
    pub fn is_initialized(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Gets a mutable reference to the element, if it's initialized
    pub fn get_mut(&mut self) -> Option<&mut T> {
        if *self.ready.get_mut() {
            Some(unsafe { self.elem.get_mut().assume_init_mut() })
        } else {
            None
        }
    }

    /// Takes the element out of the cell, leaving it uninitialized
    pub fn take(&mut self) -> Option<T> {
        if *self.ready.get_mut() {
            *self.ready.get_mut() = false;
            /* SAFETY: The element was initialized, and now that ready is
             * false it will never be read (or dropped) again */
            Some(unsafe { self.elem.get_mut().assume_init_read() })
        } else {
            None
        }
    }

    /// Consumes the cell, returning the element if it was initialized
    pub fn into_inner(mut self) -> Option<T> {
        self.take()
    }

    /// # Safety
    /// The cell must be initialized
    unsafe fn get_unchecked(&self) -> &T {
        unsafe { (*self.elem.get()).assume_init_ref() }
    }
}

impl<T> Default for OnceLock<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for OnceLock<T> {
    fn drop(&mut self) {
        if *self.ready.get_mut() {
            unsafe { self.elem.get_mut().assume_init_drop() }
        }
    }
}

/* Same bounds as the stdlib OnceLock.
 * `T: Send` is needed for Sync because a thread other than the
 * owner may write the value that the owner will later drop. */
unsafe impl<T: Sync + Send> Sync for OnceLock<T> {}
unsafe impl<T: Send> Send for OnceLock<T> {}
