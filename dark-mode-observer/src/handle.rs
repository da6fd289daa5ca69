//! Ownership of observers handed to foreign callers.
//!
//! A handle is a leaked heap cell holding the observer and its lifecycle
//! state:
//!
//! ```text
//! Live --run--> Running   (never freed, the event loop keeps it alive)
//! Live --free-> Freed     (deallocated)
//! Live --get_callback--> Live
//! ```
//!
//! `Running` is a deliberate leak. A handle that is never run nor freed is
//! reclaimed by the OS at process exit. Transitions out of `Running` are
//! detected; anything after `Freed` touches deallocated memory and is
//! undefined behaviour.
use crate::{
    callback::{CallbackRef, OpaqueCallback},
    host::AppearanceHost,
    observer::Observer,
};
use log::{debug, error};
use std::{
    convert::Infallible,
    fmt,
    sync::atomic::{AtomicU8, Ordering},
};
use thiserror::Error;


/// Lifecycle of an [`ObserverHandle`].
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Lifecycle {
    /// Owned by the caller and usable.
    Live = 0,
    /// Consumed by `run`, alive until the process exits.
    Running = 1,
    /// Consumed by `free`.
    Freed = 2,
}

impl Lifecycle {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Lifecycle::Live,
            1 => Lifecycle::Running,
            _ => Lifecycle::Freed,
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::Live => write!(f, "live"),
            Lifecycle::Running => write!(f, "running"),
            Lifecycle::Freed => write!(f, "freed"),
        }
    }
}

/// Boundary operation on a handle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation {
    Create,
    Run,
    GetCallback,
    Free,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "observer_new"),
            Operation::Run => write!(f, "observer_run"),
            Operation::GetCallback => write!(f, "observer_get_callback"),
            Operation::Free => write!(f, "observer_free"),
        }
    }
}

/// Violation of the handle contract.
#[derive(Debug, Error)]
pub enum HandleError {
    #[error("{0} called with a null observer handle")]
    NullHandle(Operation),
    #[error("{0} called with a null callback")]
    NullCallback(Operation),
    #[error("{op} called on an observer handle that is {state}")]
    NotLive { op: Operation, state: Lifecycle },
    #[error("Appearance host unavailable: {0}")]
    HostUnavailable(anyhow::Error),
    #[error("Failed to subscribe to appearance changes: {0}")]
    Subscribe(#[from] anyhow::Error),
}

/// Observer owned by a foreign caller.
pub struct ObserverHandle<H: AppearanceHost> {
    lifecycle: AtomicU8,
    observer: Observer<H>,
}

impl<H: AppearanceHost> ObserverHandle<H> {
    pub fn lifecycle(&self) -> Lifecycle {
        Lifecycle::from_raw(self.lifecycle.load(Ordering::Acquire))
    }

    fn consume(&self, op: Operation, next: Lifecycle) -> Result<(), HandleError> {
        self.lifecycle
            .compare_exchange(
                Lifecycle::Live as u8,
                next as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map(|_| ())
            .map_err(|state| HandleError::NotLive {
                op,
                state: Lifecycle::from_raw(state),
            })
    }

    fn ensure_live(&self, op: Operation) -> Result<(), HandleError> {
        match self.lifecycle() {
            Lifecycle::Live => Ok(()),
            state => Err(HandleError::NotLive { op, state }),
        }
    }
}

/// Create an observer and transfer its ownership to the caller.
pub fn create<H: AppearanceHost>(
    host: H,
    callback: *mut OpaqueCallback,
    trigger_initially: bool,
) -> Result<*mut ObserverHandle<H>, HandleError> {
    let callback = CallbackRef::new(callback).ok_or(HandleError::NullCallback(Operation::Create))?;
    let observer = Observer::new(host, callback, trigger_initially)?;
    let handle = Box::into_raw(Box::new(ObserverHandle {
        lifecycle: AtomicU8::new(Lifecycle::Live as u8),
        observer,
    }));
    debug!("Created observer handle {handle:p}");

    Ok(handle)
}

/// Consume `handle` and run the host event loop. Only returns on a contract
/// violation.
///
/// # Safety
///
/// `handle` must be null or come from [`create`] and must not have been
/// passed to [`free`].
pub unsafe fn run<H: AppearanceHost>(
    handle: *mut ObserverHandle<H>,
) -> Result<Infallible, HandleError> {
    let handle = unsafe { handle.as_ref() }.ok_or(HandleError::NullHandle(Operation::Run))?;
    handle.consume(Operation::Run, Lifecycle::Running)?;
    debug!("Running observer handle {:p}", handle);

    handle.observer.run()
}

/// The callback of `handle`, which stays owned by the caller.
///
/// # Safety
///
/// Same as [`run`].
pub unsafe fn get_callback<H: AppearanceHost>(
    handle: *mut ObserverHandle<H>,
) -> Result<*mut OpaqueCallback, HandleError> {
    let handle =
        unsafe { handle.as_ref() }.ok_or(HandleError::NullHandle(Operation::GetCallback))?;
    handle.ensure_live(Operation::GetCallback)?;

    Ok(handle.observer.callback().as_ptr())
}

/// Consume `handle`, removing the host subscription and deallocating it.
///
/// # Safety
///
/// Same as [`run`]. The handle must not be used afterwards.
pub unsafe fn free<H: AppearanceHost>(handle: *mut ObserverHandle<H>) -> Result<(), HandleError> {
    unsafe { handle.as_ref() }
        .ok_or(HandleError::NullHandle(Operation::Free))?
        .consume(Operation::Free, Lifecycle::Freed)?;
    debug!("Freeing observer handle {handle:p}");
    drop(unsafe { Box::from_raw(handle) });

    Ok(())
}

/// Unwrap the result of a boundary operation, aborting the process on a
/// contract violation.
pub fn abort_on_violation<T>(result: Result<T, HandleError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            error!("Observer contract violation: {err}");
            std::process::abort()
        }
    }
}
