//! AppKit appearance host.
use crate::host::{AppearanceHost, ChangeHandler};
use anyhow::Context as _;
use log::{info, warn};
use objc2::{
    define_class, msg_send, rc::Retained, runtime::AnyObject, DefinedClass, MainThreadMarker,
    MainThreadOnly,
};
use objc2_app_kit::{
    NSAppearance, NSAppearanceNameAqua, NSAppearanceNameDarkAqua, NSApplication,
    NSApplicationActivationPolicy,
};
use objc2_foundation::{
    ns_string, NSArray, NSDictionary, NSKeyValueChangeKey, NSKeyValueChangeNewKey,
    NSKeyValueObservingOptions, NSObject, NSObjectNSKeyValueObserverRegistration, NSString,
};
use std::{ffi::c_void, ptr};


struct Ivars {
    on_change: ChangeHandler,
}

define_class!(
    // SAFETY: NSObject has no subclassing requirements and we don't implement Drop.
    #[unsafe(super(NSObject))]
    #[thread_kind = MainThreadOnly]
    #[name = "DarkModeAppearanceObserver"]
    #[ivars = Ivars]
    struct AppearanceObserver;

    impl AppearanceObserver {
        #[unsafe(method(observeValueForKeyPath:ofObject:change:context:))]
        fn observe_value(
            &self,
            _key_path: Option<&NSString>,
            _object: Option<&AnyObject>,
            change: Option<&NSDictionary<NSKeyValueChangeKey, AnyObject>>,
            _context: *mut c_void,
        ) {
            // A nil appearance arrives as NSNull and falls through to None.
            let appearance = change
                .and_then(|change| change.objectForKey(unsafe { NSKeyValueChangeNewKey }))
                .and_then(|new| new.downcast::<NSAppearance>().ok());

            (self.ivars().on_change)(appearance.as_deref().and_then(best_match));
        }
    }
);

impl AppearanceObserver {
    fn new(mtm: MainThreadMarker, on_change: ChangeHandler) -> Retained<Self> {
        let this = Self::alloc(mtm).set_ivars(Ivars { on_change });
        unsafe { msg_send![super(this), init] }
    }
}

/// Resolve `appearance` against the aqua and dark aqua appearances.
fn best_match(appearance: &NSAppearance) -> Option<String> {
    unsafe {
        let names = NSArray::from_slice(&[NSAppearanceNameAqua, NSAppearanceNameDarkAqua]);
        appearance.bestMatchFromAppearancesWithNames(&names)
    }
    .map(|name| name.to_string())
}

/// The shared `NSApplication` of this process.
pub struct AppKitHost {
    mtm: MainThreadMarker,
    app: Retained<NSApplication>,
}

impl AppKitHost {
    /// Must be called from the main thread.
    pub fn new() -> anyhow::Result<Self> {
        let mtm = MainThreadMarker::new().context("AppKit is only usable on the main thread")?;

        Ok(Self {
            mtm,
            app: NSApplication::sharedApplication(mtm),
        })
    }
}

/// Key-value observation of `effectiveAppearance`.
pub struct KvoRegistration {
    app: Retained<NSApplication>,
    observer: Retained<AppearanceObserver>,
}

impl Drop for KvoRegistration {
    fn drop(&mut self) {
        info!("Removing appearance observer");
        unsafe {
            self.app
                .removeObserver_forKeyPath(&self.observer, ns_string!("effectiveAppearance"));
        }
    }
}

impl AppearanceHost for AppKitHost {
    type Subscription = KvoRegistration;

    fn current_best_match(&self) -> Option<String> {
        best_match(&self.app.effectiveAppearance())
    }

    fn subscribe(&self, on_change: ChangeHandler) -> anyhow::Result<Self::Subscription> {
        let observer = AppearanceObserver::new(self.mtm, on_change);
        unsafe {
            self.app.addObserver_forKeyPath_options_context(
                &observer,
                ns_string!("effectiveAppearance"),
                NSKeyValueObservingOptions::New | NSKeyValueObservingOptions::Old,
                ptr::null_mut(),
            );
        }
        info!("Observing effectiveAppearance");

        Ok(KvoRegistration {
            app: self.app.clone(),
            observer,
        })
    }

    fn suppress_activation(&self) {
        if !self
            .app
            .setActivationPolicy(NSApplicationActivationPolicy::Prohibited)
        {
            warn!("Failed to set prohibited activation policy");
        }
    }

    fn run_event_loop(&self) -> ! {
        self.app.run();
        info!("Application event loop stopped");
        std::process::exit(0)
    }
}
