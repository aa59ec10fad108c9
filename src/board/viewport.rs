//! Responsive layout monitor.
//!
//! Resize notifications are fed in by the host event loop. Listeners hold a
//! `ResizeSubscription`; dropping it detaches the listener.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::debug;

/// Column arrangement derived from the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// All columns side by side
    Columns,
    /// One column visible, chosen from a tab strip
    Tabs { active: usize },
}

pub fn is_mobile_width(width: u16, breakpoint: u16) -> bool {
    width < breakpoint
}

type Listener = Box<dyn FnMut(bool)>;

struct MonitorInner {
    breakpoint: u16,
    width: u16,
    is_mobile: bool,
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
    // Subscriptions dropped while their listener was out being notified
    detached: Vec<u64>,
}

/// Observes viewport width and tracks the mobile flag
#[derive(Clone)]
pub struct ViewportMonitor {
    inner: Rc<RefCell<MonitorInner>>,
}

impl ViewportMonitor {
    pub fn new(breakpoint: u16, width: u16) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MonitorInner {
                breakpoint,
                width,
                is_mobile: is_mobile_width(width, breakpoint),
                next_id: 0,
                listeners: Vec::new(),
                detached: Vec::new(),
            })),
        }
    }

    pub fn is_mobile(&self) -> bool {
        self.inner.borrow().is_mobile
    }

    pub fn width(&self) -> u16 {
        self.inner.borrow().width
    }

    #[cfg(test)]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Register a listener called with the new flag whenever it flips
    pub fn subscribe<F>(&self, listener: F) -> ResizeSubscription
    where
        F: FnMut(bool) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Box::new(listener)));
        ResizeSubscription {
            id,
            monitor: Rc::downgrade(&self.inner),
        }
    }

    /// Record a new viewport width. Returns true when the mobile flag flipped.
    pub fn resize(&self, width: u16) -> bool {
        let (flipped, is_mobile, mut listeners) = {
            let mut inner = self.inner.borrow_mut();
            inner.width = width;
            let is_mobile = is_mobile_width(width, inner.breakpoint);
            let flipped = is_mobile != inner.is_mobile;
            inner.is_mobile = is_mobile;
            let listeners = if flipped {
                std::mem::take(&mut inner.listeners)
            } else {
                Vec::new()
            };
            (flipped, is_mobile, listeners)
        };

        if !flipped {
            return false;
        }

        debug!("Viewport width {} -> mobile={}", width, is_mobile);
        // Listeners run without the borrow held so they may query the monitor
        for (_, listener) in listeners.iter_mut() {
            listener(is_mobile);
        }

        let mut inner = self.inner.borrow_mut();
        let added = std::mem::take(&mut inner.listeners);
        inner.listeners = listeners;
        inner.listeners.extend(added);
        let detached = std::mem::take(&mut inner.detached);
        inner.listeners.retain(|(id, _)| !detached.contains(id));
        true
    }
}

/// Keeps a resize listener attached; detaches it on drop
pub struct ResizeSubscription {
    id: u64,
    monitor: Weak<RefCell<MonitorInner>>,
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        if let Some(shared) = self.monitor.upgrade() {
            let mut inner = shared.borrow_mut();
            let before = inner.listeners.len();
            inner.listeners.retain(|(id, _)| *id != self.id);
            if inner.listeners.len() == before {
                inner.detached.push(self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    // Browser-sized widths
    const BREAKPOINT: u16 = 768;

    #[test]
    fn test_breakpoint() {
        assert!(is_mobile_width(767, BREAKPOINT));
        assert!(!is_mobile_width(768, BREAKPOINT));
    }

    #[test]
    fn test_listener_notified_on_flip_only() {
        let monitor = ViewportMonitor::new(BREAKPOINT, 1024);
        let calls = Rc::new(Cell::new(0));
        let last = Rc::new(Cell::new(false));

        let _sub = {
            let calls = calls.clone();
            let last = last.clone();
            monitor.subscribe(move |mobile| {
                calls.set(calls.get() + 1);
                last.set(mobile);
            })
        };

        assert!(!monitor.resize(900));
        assert_eq!(calls.get(), 0);

        assert!(monitor.resize(500));
        assert_eq!(calls.get(), 1);
        assert!(last.get());
        assert!(monitor.is_mobile());

        assert!(monitor.resize(800));
        assert_eq!(calls.get(), 2);
        assert!(!last.get());
    }

    #[test]
    fn test_drop_detaches_listener() {
        let monitor = ViewportMonitor::new(BREAKPOINT, 1024);
        let calls = Rc::new(Cell::new(0));

        {
            let calls = calls.clone();
            let _sub = monitor.subscribe(move |_| calls.set(calls.get() + 1));
            assert_eq!(monitor.listener_count(), 1);
        }

        assert_eq!(monitor.listener_count(), 0);
        monitor.resize(320);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_subscription_outliving_monitor() {
        let monitor = ViewportMonitor::new(BREAKPOINT, 1024);
        let sub = monitor.subscribe(|_| {});
        drop(monitor);
        drop(sub);
    }
}
