//! Headless observer for the system light/dark appearance.
//!
//! An [`Observer`] installs a subscription with the host appearance mechanism
//! and reports every change through a caller supplied callback. Foreign
//! callers drive it through the C function table in [`ffi`] (macOS only),
//! Rust callers can use [`handle`] directly with any [`AppearanceHost`].
use std::fmt;

pub mod callback;
pub mod handle;
pub mod host;
mod observer;

#[cfg(target_os = "macos")]
pub mod ffi;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(test)]
mod test_host;

pub use callback::{
    box_callback, call_boxed_callback, drop_boxed_callback, BoxedCallback, CallbackRef,
    OpaqueCallback,
};
pub use handle::{HandleError, Lifecycle, ObserverHandle, Operation};
pub use host::AppearanceHost;
pub use observer::Observer;

#[cfg(target_os = "macos")]
pub use ffi::observe;
#[cfg(target_os = "macos")]
pub use macos::AppKitHost;

/// Name of the light system appearance.
pub const AQUA: &str = "NSAppearanceNameAqua";
/// Name of the dark system appearance.
pub const DARK_AQUA: &str = "NSAppearanceNameDarkAqua";

/// Normalized system appearance passed to callbacks.
#[repr(u32)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Appearance {
    /// Light mode, also used when the host has no definitive answer.
    #[default]
    Light = 0,
    /// Dark mode enabled
    Dark = 1,
}

impl Appearance {
    /// Normalize the best matching appearance name reported by the host.
    ///
    /// Only the dark appearance name yields [`Appearance::Dark`].
    pub fn from_best_match(name: Option<&str>) -> Self {
        match name {
            Some(DARK_AQUA) => Appearance::Dark,
            _ => Appearance::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Appearance::Dark)
    }
}

impl fmt::Display for Appearance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Appearance::Light => write!(f, "light"),
            Appearance::Dark => write!(f, "dark"),
        }
    }
}
