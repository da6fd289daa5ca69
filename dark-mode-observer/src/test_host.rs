//! In-memory appearance host for tests.
use crate::host::{AppearanceHost, ChangeHandler};
use std::{cell::RefCell, rc::Rc};

/// Panic payload raised instead of blocking in the event loop.
pub const EVENT_LOOP_ENTERED: &str = "event loop entered";

#[derive(Default)]
pub struct HostState {
    pub current: Option<String>,
    pub handler: Option<ChangeHandler>,
    pub subscriptions: usize,
    pub unsubscriptions: usize,
    pub activation_suppressed: bool,
    pub fail_subscribe: bool,
}

#[derive(Clone, Default)]
pub struct TestHost {
    pub state: Rc<RefCell<HostState>>,
}

impl TestHost {
    pub fn with_current(name: &str) -> Self {
        let host = Self::default();
        host.state.borrow_mut().current = Some(name.to_owned());
        host
    }

    /// Switch the current appearance and notify the subscriber, if any.
    pub fn change(&self, name: Option<&str>) {
        self.state.borrow_mut().current = name.map(str::to_owned);
        let state = self.state.borrow();
        if let Some(handler) = state.handler.as_ref() {
            handler(name.map(str::to_owned));
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.state.borrow().handler.is_some()
    }
}

pub struct TestSubscription {
    state: Rc<RefCell<HostState>>,
}

impl Drop for TestSubscription {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.handler = None;
        state.unsubscriptions += 1;
    }
}

impl AppearanceHost for TestHost {
    type Subscription = TestSubscription;

    fn current_best_match(&self) -> Option<String> {
        self.state.borrow().current.clone()
    }

    fn subscribe(&self, on_change: ChangeHandler) -> anyhow::Result<Self::Subscription> {
        let mut state = self.state.borrow_mut();
        if state.fail_subscribe {
            anyhow::bail!("subscription refused");
        }
        state.handler = Some(on_change);
        state.subscriptions += 1;

        Ok(TestSubscription {
            state: self.state.clone(),
        })
    }

    fn suppress_activation(&self) {
        self.state.borrow_mut().activation_suppressed = true;
    }

    fn run_event_loop(&self) -> ! {
        panic!("{EVENT_LOOP_ENTERED}")
    }
}

/// Collects every appearance a boxed callback receives.
pub fn recording_callback() -> (
    *mut crate::OpaqueCallback,
    Rc<RefCell<Vec<crate::Appearance>>>,
) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let callback = crate::box_callback(move |appearance| sink.borrow_mut().push(appearance));
    (callback, seen)
}
