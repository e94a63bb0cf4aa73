use core::cell::UnsafeCell;
use core::mem::MaybeUninit;

use crate::error::{InitError, InitResult};
use crate::Mutex;

struct State<F> {
    is_init: bool,
    factory: F,
}

/// A singleton holder that takes its lock on every access
///
/// It gives the same guarantees as [LazySingletonHolder](crate::LazySingletonHolder),
/// without the lock-free fast path: even after the instance is built,
/// each call locks and unlocks the internal mutex.
///
/// # Example
/// ```
/// use singletonrs::{SynchronizedHolder, GameSettings};
///
/// static SETTINGS: SynchronizedHolder<GameSettings> =
///     SynchronizedHolder::new(GameSettings::new);
///
/// let settings = SETTINGS.get_instance();
/// settings.set_volume(75);
/// settings.set_brightness(85);
///
/// let again = SETTINGS.get_instance();
/// assert_eq!(again.volume(), 75);
/// assert_eq!(again.brightness(), 85);
/// ```
pub struct SynchronizedHolder<T, F = fn() -> T> {
    elem: UnsafeCell<MaybeUninit<T>>,
    state: Mutex<State<F>>,
}

impl<T, F> SynchronizedHolder<T, F> {
    /// Creates an empty holder
    pub const fn new(factory: F) -> Self {
        Self {
            elem: UnsafeCell::new(MaybeUninit::uninit()),
            state: Mutex::new(State { is_init: false, factory }),
        }
    }

    /// Returns the shared instance, building it if this is the first access
    pub fn get_instance(&self) -> &T
    where
        F: FnMut() -> T
    {
        let mut state = self.state.lock();
        if !state.is_init {
            trace!(debug, ty = core::any::type_name::<T>(), "constructing synchronized instance");
            let value = (state.factory)();
            /* SAFETY: We've locked the mutex, so only one thread
             * can reach this place. Therefore, the mutable reference
             * won't alias, and the element will only initialize once */
            unsafe { (*self.elem.get()).write(value); }
            state.is_init = true;
        }
        /* The element is written before the guard is dropped, and
         * every other access goes through the same lock */
        unsafe { (*self.elem.get()).assume_init_ref() }
    }

    /// Returns the shared instance, building it with a fallible factory if
    /// this is the first access
    ///
    /// # Errors
    /// If the factory fails, the error is returned and the holder stays
    /// empty.
    pub fn try_get_instance<E>(&self) -> InitResult<'_, T, E>
    where
        F: FnMut() -> Result<T, E>
    {
        let mut state = self.state.lock();
        if !state.is_init {
            trace!(debug, ty = core::any::type_name::<T>(), "constructing synchronized instance");
            let value = (state.factory)().map_err(|err| {
                trace!(warn, ty = core::any::type_name::<T>(), "singleton construction failed");
                InitError::Construction(err)
            })?;
            unsafe { (*self.elem.get()).write(value); }
            state.is_init = true;
        }
        Ok(unsafe { (*self.elem.get()).assume_init_ref() })
    }

    /// Returns the instance if it has already been built
    pub fn get(&self) -> Option<&T> {
        let state = self.state.lock();
        state.is_init.then(|| {
            /* If is_init is true, a previous call has
             * initialized the element correctly. */
            unsafe { (*self.elem.get()).assume_init_ref() }
        })
    }

    /// Returns true if the instance has been built
    pub fn is_initialized(&self) -> bool {
        self.state.lock().is_init
    }
}

impl<T, F> Drop for SynchronizedHolder<T, F> {
    fn drop(&mut self) {
        if self.state.get_mut().is_init {
            unsafe { self.elem.get_mut().assume_init_drop() }
        }
    }
}

/* The factory is only reached through the mutex, so it
 * needs to be Send, not Sync */
unsafe impl<T: Sync + Send, F: Send> Sync for SynchronizedHolder<T, F> {}
