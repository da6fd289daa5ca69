//! Appearance observer.
use crate::{callback::CallbackRef, host::AppearanceHost, Appearance};
use log::{debug, info};


/// Reports every appearance change of a host to a callback.
///
/// The host registration is active until the observer is dropped.
pub struct Observer<H: AppearanceHost> {
    // Dropped first so the registration goes away before the host.
    _subscription: H::Subscription,
    callback: CallbackRef,
    host: H,
}

impl<H: AppearanceHost> Observer<H> {
    /// Subscribe to appearance changes of `host`.
    ///
    /// With `trigger_initially` the callback is invoked once with the current
    /// appearance before this returns.
    pub fn new(host: H, callback: CallbackRef, trigger_initially: bool) -> anyhow::Result<Self> {
        if trigger_initially {
            let appearance = Appearance::from_best_match(host.current_best_match().as_deref());
            info!("Initial appearance: {appearance}");
            callback.invoke(appearance);
        }

        let subscription = host.subscribe(Box::new(move |name: Option<String>| {
            let appearance = Appearance::from_best_match(name.as_deref());
            debug!("Appearance changed to {appearance} ({name:?})");
            callback.invoke(appearance);
        }))?;

        Ok(Self {
            _subscription: subscription,
            callback,
            host,
        })
    }

    /// The callback this observer reports to.
    pub fn callback(&self) -> CallbackRef {
        self.callback
    }

    /// Run the host event loop, which delivers all future changes.
    pub fn run(&self) -> ! {
        info!("Entering event loop");
        self.host.suppress_activation();
        self.host.run_event_loop()
    }
}
