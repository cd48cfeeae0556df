//! Frame timing and listener lifetimes.
//!
//! Every listener the widget attaches (frame tick, resize, input controllers)
//! is registered here. Dropping the registry detaches all of them, so a widget
//! torn down halfway through setup leaks nothing.

use std::collections::BTreeMap;
use strum::{Display as StrumDisplay, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, StrumDisplay)]
pub enum EventKind {
    Frame,
    Resize,
    Scroll,
    Key,
    Pointer,
    Control,
}

/// A live attachment to some host event source.
pub trait Subscription {
    fn cancel(self: Box<Self>);
}

impl<F: FnOnce()> Subscription for F {
    fn cancel(self: Box<Self>) {
        (*self)()
    }
}

#[derive(Default)]
pub struct Subscriptions {
    active: BTreeMap<EventKind, Vec<Box<dyn Subscription>>>,
}

impl std::fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: BTreeMap<_, _> = self.active.iter().map(|(k, v)| (k, v.len())).collect();
        f.debug_struct("Subscriptions").field("active", &counts).finish()
    }
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: EventKind, subscription: impl Subscription + 'static) {
        self.active
            .entry(kind)
            .or_default()
            .push(Box::new(subscription));
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.active.get(&kind).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.active.values().all(Vec::is_empty)
    }

    pub fn detach(&mut self, kind: EventKind) {
        if let Some(subs) = self.active.remove(&kind) {
            log::debug!("Detaching {} {} listener(s)", subs.len(), kind);
            subs.into_iter().for_each(Subscription::cancel);
        }
    }

    pub fn clear(&mut self) {
        let kinds: Vec<EventKind> = self.active.keys().copied().collect();
        kinds.into_iter().for_each(|kind| self.detach(kind));
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Turns monotonic frame timestamps (microseconds) into deltas.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<i64>,
}

impl FrameClock {
    /// Seconds since the previous frame; the first frame yields zero.
    pub fn tick(&mut self, frame_time_us: i64) -> f64 {
        let dt = self
            .last
            .map_or(0.0, |last| (frame_time_us - last).max(0) as f64 / 1_000_000.0);
        self.last = Some(frame_time_us);
        dt
    }

    /// Forget the previous timestamp, e.g. after the widget was hidden.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn counter() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn FnOnce()>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        let make = move |name: &'static str| {
            let l = l.clone();
            Box::new(move || l.borrow_mut().push(name)) as Box<dyn FnOnce()>
        };
        (log, make)
    }

    #[test]
    fn test_drop_cancels_everything() {
        let (log, make) = counter();
        {
            let mut subs = Subscriptions::new();
            subs.add(EventKind::Frame, make("frame"));
            subs.add(EventKind::Resize, make("resize"));
            subs.add(EventKind::Key, make("key"));
            assert_eq!(subs.count(EventKind::Frame), 1);
        }
        let mut cancelled = log.borrow().clone();
        cancelled.sort();
        assert_eq!(cancelled, vec!["frame", "key", "resize"]);
    }

    #[test]
    fn test_detach_single_kind() {
        let (log, make) = counter();
        let mut subs = Subscriptions::new();
        subs.add(EventKind::Scroll, make("scroll"));
        subs.add(EventKind::Frame, make("frame"));
        subs.detach(EventKind::Frame);
        assert_eq!(*log.borrow(), vec!["frame"]);
        assert_eq!(subs.count(EventKind::Frame), 0);
        assert!(!subs.is_empty());

        subs.clear();
        assert!(subs.is_empty());
        assert_eq!(log.borrow().len(), 2);
        drop(subs);
        // no double cancel
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_frame_clock() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.tick(1_000_000), 0.0);
        assert!((clock.tick(1_016_667) - 0.016667).abs() < 1e-9);
        assert_eq!(clock.tick(1_000_000), 0.0);
        clock.reset();
        assert_eq!(clock.tick(5_000_000), 0.0);
    }
}
