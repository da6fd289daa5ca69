//! Callbacks handed across the C boundary.
use crate::Appearance;
use std::ptr::NonNull;

/// Opaque callback as seen by foreign callers.
#[repr(C)]
pub struct OpaqueCallback {
    _private: [u8; 0],
}

/// Rust closure behind an [`OpaqueCallback`] pointer.
pub type BoxedCallback = Box<dyn Fn(Appearance)>;

/// Leak `callback` as an opaque pointer suitable for `observer_new`.
///
/// The closure is boxed twice so the pointer stays thin. Ownership stays with
/// the caller; reclaim it with [`drop_boxed_callback`] once no observer can
/// invoke it anymore.
pub fn box_callback(callback: impl Fn(Appearance) + 'static) -> *mut OpaqueCallback {
    let inner: BoxedCallback = Box::new(callback);
    Box::into_raw(Box::new(inner)).cast()
}

/// Reclaim a callback leaked with [`box_callback`].
///
/// # Safety
///
/// `callback` must come from [`box_callback`], must not have been dropped
/// already, and no live or running observer may still reference it.
pub unsafe fn drop_boxed_callback(callback: *mut OpaqueCallback) {
    if callback.is_null() {
        return;
    }
    drop(unsafe { Box::from_raw(callback.cast::<BoxedCallback>()) });
}

/// Invoke a callback leaked with [`box_callback`].
///
/// # Safety
///
/// `callback` must be null or a pointer returned by [`box_callback`] that
/// has not been reclaimed.
#[no_mangle]
pub unsafe extern "C" fn call_boxed_callback(
    callback: *mut OpaqueCallback,
    appearance: Appearance,
) {
    let Some(callback) = NonNull::new(callback.cast::<BoxedCallback>()) else {
        return;
    };
    let callback = unsafe { callback.as_ref() };
    callback(appearance)
}

/// Non-owning reference to a caller supplied callback.
///
/// The observer never frees what this points to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CallbackRef(NonNull<OpaqueCallback>);

impl CallbackRef {
    /// Wrap a raw callback pointer, `None` when it is null.
    pub fn new(callback: *mut OpaqueCallback) -> Option<Self> {
        NonNull::new(callback).map(Self)
    }

    pub fn as_ptr(self) -> *mut OpaqueCallback {
        self.0.as_ptr()
    }

    /// Invoke the callback through the boxed callback trampoline.
    pub fn invoke(self, appearance: Appearance) {
        // The caller of `observer_new` keeps the callback alive for the
        // observer's lifetime.
        unsafe { call_boxed_callback(self.as_ptr(), appearance) }
    }
}
