use core::ops::Deref;

use crate::once::OnceLock;
use crate::Mutex;

/// A value that is initialized on its first access
///
/// This is the "first reference triggers initialization" flavour of a
/// singleton: the initializer is fixed at compile time, runs at most
/// once, and the result lives for as long as the `LazyLock` does.
///
/// # Example
/// ```
/// use singletonrs::{LazyLock, GameSettings};
///
/// static SETTINGS: LazyLock<GameSettings> = LazyLock::new(GameSettings::new);
///
/// SETTINGS.set_volume(90); /* SETTINGS is initialized at this point */
///
/// let another = &*SETTINGS;
/// assert_eq!(another.volume(), 90);
/// assert!(core::ptr::eq(SETTINGS.get(), another));
/// ```
pub struct LazyLock<T, F = fn() -> T> {
    once: OnceLock<T>,
    init: Mutex<Option<F>>,
}

impl<T, F> LazyLock<T, F>
where
    F: FnOnce() -> T,
{
    /// Builds a new [LazyLock] with the given `init` function
    #[inline]
    pub const fn new(init: F) -> Self {
        Self {
            once: OnceLock::new(),
            init: Mutex::new(Some(init)),
        }
    }

    /// Gets the element inside `self`. If it's the first access,
    /// initializes it with the function passed to [Self::new]
    ///
    /// # Panics
    /// If the initialization function panics, the panic is propagated to
    /// the caller. The function has been consumed by then, so the lock is
    /// poisoned and every later access panics too.
    ///
    /// # Example
    /// ```
    /// use singletonrs::LazyLock;
    ///
    /// static N: LazyLock<u64> = LazyLock::new(|| 1234);
    ///
    /// let n = N.get(); /* N is initialized here */
    /// assert_eq!(n, &1234);
    /// ```
    pub fn get(&self) -> &T {
        self.once.get_or_init(|| {
            /* OnceLock runs this closure at most once successfully, so
             * the function is only missing if a previous run panicked */
            let init = self.init.lock().take();
            match init {
                Some(init) => {
                    trace!(debug, ty = core::any::type_name::<T>(), "initializing LazyLock");
                    init()
                }
                None => panic!("LazyLock instance has previously been poisoned"),
            }
        })
    }

    /// Forces the evaluation of this lazy value, like [Self::get]
    #[inline]
    pub fn force(this: &Self) -> &T {
        this.get()
    }

    /// Tries to get the element. Returns [None] if the
    /// element is not initialized
    ///
    /// # Example
    /// ```
    /// use singletonrs::LazyLock;
    ///
    /// static N: LazyLock<u64> = LazyLock::new(|| 1234);
    ///
    /// assert_eq!(N.try_get(), None);
    /// N.get(); /* N is initialized here */
    /// assert_eq!(N.try_get(), Some(&1234));
    /// ```
    #[inline]
    pub fn try_get(&self) -> Option<&T> {
        self.once.get()
    }
}

impl<T, F: FnOnce() -> T> Deref for LazyLock<T, F> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.get()
    }
}
