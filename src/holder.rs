//! The lazy singleton holder

use core::fmt;

use crate::error::{InitError, InitResult};
use crate::OnceLock;

/// Owns the one shared instance of `T`, built on first access by `F`.
///
/// Any number of threads may race to the first [get_instance](Self::get_instance):
/// the factory runs exactly once and every caller gets a reference to
/// the same, fully built, value. Once built, an access costs a single
/// atomic load.
///
/// The holder doesn't synchronize access to `T` itself. If the value
/// is mutated through shared references, `T` brings its own interior
/// synchronization (see [GameSettings](crate::GameSettings)).
///
/// The holder can live in a `static`, or be created on the stack and
/// passed around by reference to whoever needs the instance.
///
/// # Example
/// ```
/// use singletonrs::{LazySingletonHolder, GameSettings};
///
/// static SETTINGS: LazySingletonHolder<GameSettings> =
///     LazySingletonHolder::new(GameSettings::new);
///
/// let menu = SETTINGS.get_instance();
/// menu.set_volume(80);
///
/// let gameplay = SETTINGS.get_instance();
/// assert_eq!(gameplay.volume(), 80);
/// assert!(core::ptr::eq(menu, gameplay));
/// ```
pub struct LazySingletonHolder<T, F = fn() -> T> {
    instance: OnceLock<T>,
    factory: F,
}

impl<T, F> LazySingletonHolder<T, F> {
    /// Creates an empty holder. `factory` is not called until
    /// the first access
    pub const fn new(factory: F) -> Self {
        Self {
            instance: OnceLock::new(),
            factory,
        }
    }

    /// Returns the shared instance, building it if this is the first access
    ///
    /// # Panics
    /// If the factory panics, the panic reaches the caller that
    /// triggered the construction, and the holder stays empty.
    pub fn get_instance(&self) -> &T
    where
        F: Fn() -> T
    {
        self.instance.get_or_init(|| {
            trace!(debug, ty = core::any::type_name::<T>(), "constructing singleton instance");
            (self.factory)()
        })
    }

    /// Returns the shared instance, building it with a fallible factory if
    /// this is the first access.
    ///
    /// # Errors
    /// If the factory fails, the error is handed to this caller only.
    /// Nothing is cached: the next access runs the factory again.
    ///
    /// # Example
    /// ```
    /// use singletonrs::{LazySingletonHolder, InitError};
    /// use core::sync::atomic::{AtomicBool, Ordering};
    ///
    /// static READY: AtomicBool = AtomicBool::new(false);
    ///
    /// let holder = LazySingletonHolder::new(|| {
    ///     if READY.load(Ordering::Relaxed) { Ok(42) } else { Err("backend not ready") }
    /// });
    ///
    /// assert_eq!(holder.try_get_instance(), Err(InitError::Construction("backend not ready")));
    /// assert!(!holder.is_initialized());
    ///
    /// READY.store(true, Ordering::Relaxed);
    /// assert_eq!(holder.try_get_instance(), Ok(&42));
    /// ```
    pub fn try_get_instance<E>(&self) -> InitResult<'_, T, E>
    where
        F: Fn() -> Result<T, E>
    {
        self.instance
            .get_or_try_init(|| {
                trace!(debug, ty = core::any::type_name::<T>(), "constructing singleton instance");
                (self.factory)()
            })
            .map_err(|err| {
                trace!(warn, ty = core::any::type_name::<T>(), "singleton construction failed");
                InitError::Construction(err)
            })
    }

    /// Returns the instance if it has already been built.
    /// Never runs the factory.
    pub fn get(&self) -> Option<&T> {
        self.instance.get()
    }

    /// Returns true if the instance has been built
    pub fn is_initialized(&self) -> bool {
        self.instance.is_initialized()
    }

    /// Gets a mutable reference to the instance, if it has been built.
    ///
    /// `&mut self` guarantees no shared reference to the instance is alive.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.instance.get_mut()
    }

    /// Consumes the holder, returning the instance if it was built
    pub fn into_inner(self) -> Option<T> {
        self.instance.into_inner()
    }
}

impl<T: fmt::Debug, F> fmt::Debug for LazySingletonHolder<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_tuple("LazySingletonHolder");
        match self.get() {
            Some(instance) => d.field(instance),
            None => d.field(&format_args!("<uninit>")),
        };
        d.finish()
    }
}

#[cfg(test)]
mod test {
    extern crate std;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::vec::Vec;

    use super::*;

    #[test]
    fn builds_on_first_access_only() {
        let calls = AtomicUsize::new(0);
        let holder = LazySingletonHolder::new(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            5u8
        });

        assert!(holder.get().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let first = holder.get_instance();
        for _ in 0..10 {
            assert!(core::ptr::eq(first, holder.get_instance()));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_first_access() {
        let calls = AtomicUsize::new(0);
        let holder = LazySingletonHolder::new(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            std::string::String::from("settings")
        });

        let addrs = std::thread::scope(|s| {
            let handles = (0..32)
                .map(|_| s.spawn(|| holder.get_instance() as *const _ as usize))
                .collect::<Vec<_>>();
            handles.into_iter().map(|h| h.join().unwrap()).collect::<Vec<_>>()
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(addrs.iter().all(|a| *a == addrs[0]));
    }

    #[test]
    fn error_is_reported_and_not_cached() {
        let attempts = AtomicUsize::new(0);
        let holder = LazySingletonHolder::new(|| {
            match attempts.fetch_add(1, Ordering::SeqCst) {
                0 => Err("first attempt fails"),
                n => Ok(n),
            }
        });

        let err = holder.try_get_instance().unwrap_err();
        assert_eq!(err.into_inner(), "first attempt fails");
        assert!(!holder.is_initialized());

        assert_eq!(holder.try_get_instance(), Ok(&1));
        assert_eq!(holder.try_get_instance(), Ok(&1));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn into_inner_and_debug() {
        let mut holder = LazySingletonHolder::<i32, _>::new(|| 1);
        assert_eq!(std::format!("{holder:?}"), "LazySingletonHolder(<uninit>)");
        holder.get_instance();
        *holder.get_mut().unwrap() += 1;
        assert_eq!(std::format!("{holder:?}"), "LazySingletonHolder(2)");
        assert_eq!(holder.into_inner(), Some(2));
    }
}
