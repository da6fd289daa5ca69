//! Host windowing framework access.

/// Change handler installed with [`AppearanceHost::subscribe`]. Receives the
/// best matching appearance name for the new value.
pub type ChangeHandler = Box<dyn Fn(Option<String>)>;

/// The host framework that reports the system appearance.
pub trait AppearanceHost {
    /// Active change registration. Dropping it removes the registration.
    type Subscription;

    /// Best match of the current appearance among the light and dark
    /// appearance names.
    fn current_best_match(&self) -> Option<String>;

    /// Register `on_change` for every future appearance change.
    fn subscribe(&self, on_change: ChangeHandler) -> anyhow::Result<Self::Subscription>;

    /// Mark the process as headless so no UI is ever presented.
    fn suppress_activation(&self);

    /// Hand the calling thread to the host event loop.
    fn run_event_loop(&self) -> !;
}
