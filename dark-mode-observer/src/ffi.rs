//! C function table, declared in `include/dark_mode_observer.h`.
//!
//! Every contract violation (null or consumed handle, null callback, calling
//! off the main thread) aborts the process.
use crate::{
    callback::{box_callback, drop_boxed_callback, OpaqueCallback},
    handle::{self, abort_on_violation, HandleError, ObserverHandle},
    macos::AppKitHost,
    Appearance,
};
use std::convert::Infallible;

/// Opaque observer handle as seen by foreign callers.
#[repr(C)]
pub struct OpaqueObserver {
    _private: [u8; 0],
}

type AppKitHandle = ObserverHandle<AppKitHost>;

pub(crate) fn new_handle(
    callback: *mut OpaqueCallback,
    trigger_initially: bool,
) -> Result<*mut AppKitHandle, HandleError> {
    let host = AppKitHost::new().map_err(HandleError::HostUnavailable)?;
    handle::create(host, callback, trigger_initially)
}

/// Create an observer reporting to `callback`. With `trigger_initially` the
/// callback is invoked with the current appearance before this returns.
///
/// The caller owns the returned handle and must pass it to either
/// [`observer_run`] or [`observer_free`].
#[no_mangle]
pub extern "C" fn observer_new(
    callback: *mut OpaqueCallback,
    trigger_initially: bool,
) -> *mut OpaqueObserver {
    abort_on_violation(new_handle(callback, trigger_initially)).cast()
}

/// Consume `observer` and run the application event loop forever.
///
/// # Safety
///
/// `observer` must come from [`observer_new`] and not have been freed.
#[no_mangle]
pub unsafe extern "C" fn observer_run(observer: *mut OpaqueObserver) -> ! {
    match abort_on_violation(unsafe { handle::run(observer.cast::<AppKitHandle>()) }) {}
}

/// The callback `observer` was created with. Ownership is unchanged.
///
/// # Safety
///
/// Same as [`observer_run`].
#[no_mangle]
pub unsafe extern "C" fn observer_get_callback(
    observer: *mut OpaqueObserver,
) -> *mut OpaqueCallback {
    abort_on_violation(unsafe { handle::get_callback(observer.cast::<AppKitHandle>()) })
}

/// Remove the appearance subscription and deallocate `observer`. The callback
/// is not freed.
///
/// # Safety
///
/// Same as [`observer_run`]. `observer` is dangling afterwards.
#[no_mangle]
pub unsafe extern "C" fn observer_free(observer: *mut OpaqueObserver) {
    abort_on_violation(unsafe { handle::free(observer.cast::<AppKitHandle>()) })
}

/// Report the system appearance to `callback` until the process exits.
///
/// Must be called from the main thread. Only returns when the observer could
/// not be created.
pub fn observe(
    trigger_initially: bool,
    callback: impl Fn(Appearance) + 'static,
) -> anyhow::Result<Infallible> {
    let callback = box_callback(callback);
    let handle = new_handle(callback, trigger_initially).inspect_err(|_| {
        // Nothing else references the callback when creation fails.
        unsafe { drop_boxed_callback(callback) };
    })?;

    Ok(unsafe { handle::run(handle) }?)
}
