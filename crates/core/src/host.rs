//! The host container seam and scoped event subscriptions.
//!
//! A field is sized to its host element's content box. Hosts that deliver
//! events (resize, pointer) hand out a [`Subscription`] per listener; the
//! listener stays registered exactly as long as the handle lives.

use std::cell::Cell;
use std::fmt;

/// The container a particle field is drawn into.
pub trait HostElement {
    /// Content-box size in logical pixels, `(width, height)`.
    fn client_size(&self) -> (f64, f64);
}

/// A host with a size set by its owner, for off-screen rendering and tests.
#[derive(Debug, Default)]
pub struct FixedHost {
    size: Cell<(f64, f64)>,
}

impl FixedHost {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Cell::new((width, height)),
        }
    }

    /// Changes the size the next `client_size` call reports.
    pub fn set_size(&self, width: f64, height: f64) {
        self.size.set((width, height));
    }
}

impl HostElement for FixedHost {
    fn client_size(&self) -> (f64, f64) {
        self.size.get()
    }
}

/// Handle for a registered listener. Dropping it (or calling
/// [`Subscription::dispose`]) unregisters the listener exactly once.
#[must_use = "dropping a Subscription unregisters its listener immediately"]
pub struct Subscription {
    name: &'static str,
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wraps the teardown for a listener called `name`.
    pub fn new(name: &'static str, release: impl FnOnce() + 'static) -> Self {
        Self {
            name,
            release: Some(Box::new(release)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Unregisters the listener now.
    pub fn dispose(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            tracing::debug!(listener = self.name, "disposing subscription");
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("name", &self.name)
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn fixed_host_reports_current_size() {
        let host = FixedHost::new(640.0, 480.0);
        assert_eq!(host.client_size(), (640.0, 480.0));
        host.set_size(320.0, 240.0);
        assert_eq!(host.client_size(), (320.0, 240.0));
    }

    #[test]
    fn drop_releases_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let sub = Subscription::new("resize", move || counter.set(counter.get() + 1));
        assert_eq!(calls.get(), 0);
        drop(sub);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn dispose_releases_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let sub = Subscription::new("pointermove", move || counter.set(counter.get() + 1));
        assert_eq!(sub.name(), "pointermove");
        sub.dispose();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn debug_shows_name_and_state() {
        let sub = Subscription::new("resize", || {});
        let dbg = format!("{sub:?}");
        assert!(dbg.contains("resize") && dbg.contains("active: true"), "{dbg}");
    }
}
