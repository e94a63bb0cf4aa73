use crate::error::InitError;
use crate::{Arc, OnceLock};

/// An owned handle to the instance kept by a [SharedHolder]
pub type SharedRef<T> = Arc<T>;

/// A singleton holder that hands out reference counted handles
///
/// Works like [LazySingletonHolder](crate::LazySingletonHolder), but
/// [get_instance](Self::get_instance) returns an owned [SharedRef]
/// instead of a borrow, so the instance can be moved into threads or
/// stored in structs that don't borrow the holder.
///
/// # Example
/// ```
/// use singletonrs::{Arc, SharedHolder, GameSettings};
///
/// let holder = SharedHolder::new(GameSettings::new);
///
/// let menu = holder.get_instance();
/// std::thread::spawn(move || menu.set_volume(80)).join().unwrap();
///
/// let gameplay = holder.get_instance();
/// assert_eq!(gameplay.volume(), 80);
/// assert!(Arc::ptr_eq(&gameplay, &holder.get_instance()));
/// ```
pub struct SharedHolder<T, F = fn() -> T> {
    instance: OnceLock<SharedRef<T>>,
    factory: F,
}

impl<T, F> SharedHolder<T, F> {
    pub const fn new(factory: F) -> Self {
        Self {
            instance: OnceLock::new(),
            factory,
        }
    }

    /// Returns a handle to the shared instance, building it if this is
    /// the first access
    pub fn get_instance(&self) -> SharedRef<T>
    where
        F: Fn() -> T
    {
        let instance = self.instance.get_or_init(|| {
            trace!(debug, ty = core::any::type_name::<T>(), "constructing shared instance");
            Arc::new((self.factory)())
        });
        Arc::clone(instance)
    }

    /// Fallible version of [get_instance](Self::get_instance)
    ///
    /// # Errors
    /// If the factory fails, the error is returned and the holder stays
    /// empty.
    pub fn try_get_instance<E>(&self) -> Result<SharedRef<T>, InitError<E>>
    where
        F: Fn() -> Result<T, E>
    {
        self.instance
            .get_or_try_init(|| {
                trace!(debug, ty = core::any::type_name::<T>(), "constructing shared instance");
                (self.factory)().map(Arc::new)
            })
            .map(Arc::clone)
            .map_err(|err| {
                trace!(warn, ty = core::any::type_name::<T>(), "singleton construction failed");
                InitError::Construction(err)
            })
    }

    /// Returns a handle to the instance if it has already been built
    pub fn get(&self) -> Option<SharedRef<T>> {
        self.instance.get().map(Arc::clone)
    }

    pub fn is_initialized(&self) -> bool {
        self.instance.is_initialized()
    }
}
