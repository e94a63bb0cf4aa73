use core::alloc::Layout;
use core::marker::PhantomData;
use core::ops::Deref;
use core::ptr::{self, NonNull};
use core::sync::atomic::{self, AtomicUsize, Ordering};

use allocator_api2::alloc::{self, Allocator, Global};

struct ArcInner<T> {
    strong_count: AtomicUsize,
    value: T,
}

/// A thread-safe reference counted smart pointer
///
/// This is the owned handle [SharedHolder](crate::SharedHolder) gives out.
///
/// # Example
/// ```
/// use singletonrs::Arc;
///
/// let n = Arc::new(123);
/// {
///     let n2 = Arc::clone(&n);
///     assert_eq!(n.strong_count(), 2);
///     assert!(Arc::ptr_eq(&n, &n2));
/// } // n2 is dropped here, but the value isn't
///
/// assert_eq!(n.strong_count(), 1);
/// ```
pub struct Arc<T, A: Allocator = Global> {
    inner: NonNull<ArcInner<T>>,
    _marker: PhantomData<ArcInner<T>>,
    allocator: A,
}

impl<T> Arc<T> {
    /// Creates a new [Arc] from `value`, using the [Global] allocator
    pub fn new(value: T) -> Self {
        Arc::new_in(value, Global)
    }
}

impl<T, A: Allocator> Arc<T, A> {

    /// Creates a new [Arc] from `value`, using the given `allocator`
    pub fn new_in(value: T, allocator: A) -> Self {
        let layout = Layout::new::<ArcInner<T>>();
        let inner = allocator
            .allocate(layout)
            .unwrap_or_else(|_| {
                alloc::handle_alloc_error(layout);
            })
            .cast();
        unsafe {
            inner.write(
                ArcInner {
                    value,
                    strong_count: AtomicUsize::new(1),
                }
            );
        }

        Self { inner, allocator, _marker: PhantomData }
    }

    fn inner(&self) -> &ArcInner<T> {
        /* SAFETY: inner stays allocated while any Arc is alive */
        unsafe { self.inner.as_ref() }
    }

    /// Returns the strong count for this pointer
    pub fn strong_count(&self) -> usize {
        self.inner().strong_count.load(Ordering::Acquire)
    }

    /// Returns true if both pointers point to the same allocation
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        ptr::addr_eq(this.inner.as_ptr(), other.inner.as_ptr())
    }
}

unsafe impl<T: Sync + Send, A: Allocator + Send> Send for Arc<T, A> {}
unsafe impl<T: Sync + Send, A: Allocator + Sync> Sync for Arc<T, A> {}

impl<T, A: Allocator> Deref for Arc<T, A> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner().value
    }
}

impl<T, A: Allocator> AsRef<T> for Arc<T, A> {
    fn as_ref(&self) -> &T {
        self
    }
}

impl<T, A: Allocator + Clone> Clone for Arc<T, A> {
    fn clone(&self) -> Self {
        /* A new reference is made from an existing one, so
         * no ordering is needed (same as the stdlib Arc) */
        self.inner().strong_count.fetch_add(1, Ordering::Relaxed);
        Self {
            inner: self.inner,
            allocator: self.allocator.clone(),
            _marker: PhantomData
        }
    }
}

impl<T, A: Allocator> Drop for Arc<T, A> {
    fn drop(&mut self) {
        if self.inner().strong_count.fetch_sub(1, Ordering::Release) != 1 {
            return
        }
        /* Pairs with the Release decrements of the other handles,
         * so their uses of the value happen before the drop */
        atomic::fence(Ordering::Acquire);
        unsafe {
            ptr::drop_in_place(self.inner.as_ptr());
            let layout = Layout::new::<ArcInner<T>>();
            self.allocator.deallocate(self.inner.cast(), layout);
        }
    }
}
