use serde::Deserialize;
use serde_with::{DurationMilliSeconds, serde_as};
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use strum::{Display as StrumDisplay, EnumString};

pub const SCROLL_DEBOUNCE: Duration = Duration::from_millis(500);
pub const DRAG_DEAD_ZONE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive)]
pub enum NavKey {
    #[strum(to_string = "Left", serialize = "ArrowLeft")]
    Left,
    #[strum(to_string = "Right", serialize = "ArrowRight")]
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavInput {
    Scroll { delta_y: f64 },
    Key(NavKey),
    DragEnd { offset_x: f64 },
    Click(usize),
    Jump(usize),
    Next,
    Prev,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
}

/// Gating thresholds for the noisy input modalities.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputPolicy {
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub scroll_debounce: Duration,
    pub drag_dead_zone: f64,
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self {
            scroll_debounce: SCROLL_DEBOUNCE,
            drag_dead_zone: DRAG_DEAD_ZONE,
        }
    }
}

/// Sole owner of the active index.
#[derive(Debug, Clone)]
pub struct RotationController {
    active: usize,
    total: NonZeroUsize,
    policy: InputPolicy,
    last_scroll: Option<Instant>,
}

impl RotationController {
    pub fn new(total: NonZeroUsize, policy: InputPolicy) -> Self {
        Self {
            active: 0,
            total,
            policy,
            last_scroll: None,
        }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn total(&self) -> usize {
        self.total.get()
    }

    pub fn policy(&self) -> InputPolicy {
        self.policy
    }

    /// Takes effect from the next input; the debounce clock is kept.
    pub fn set_policy(&mut self, policy: InputPolicy) {
        self.policy = policy;
    }

    pub fn next(&mut self) -> Option<Transition> {
        self.set((self.active + 1) % self.total.get())
    }

    pub fn prev(&mut self) -> Option<Transition> {
        let total = self.total.get();
        self.set((self.active + total - 1) % total)
    }

    /// Refuses indices outside the ring and leaves the state untouched.
    pub fn jump_to(&mut self, index: usize) -> Option<Transition> {
        if index >= self.total.get() {
            log::warn!(
                "Ignoring jump to index {} (ring has {} items)",
                index,
                self.total
            );
            return None;
        }
        self.set(index)
    }

    pub fn reset(&mut self) -> Option<Transition> {
        self.set(0)
    }

    /// Re-bounds the state after the item list changed size.
    pub fn retarget(&mut self, total: NonZeroUsize) -> Option<Transition> {
        self.total = total;
        self.set(self.active % total.get())
    }

    pub fn handle(&mut self, input: NavInput, now: Instant) -> Option<Transition> {
        match input {
            NavInput::Scroll { delta_y } => self.handle_scroll(delta_y, now),
            NavInput::Key(NavKey::Right) | NavInput::Next => self.next(),
            NavInput::Key(NavKey::Left) | NavInput::Prev => self.prev(),
            NavInput::DragEnd { offset_x } => self.handle_drag_end(offset_x),
            NavInput::Click(index) if index != self.active => self.jump_to(index),
            NavInput::Click(_) => None,
            NavInput::Jump(index) => self.jump_to(index),
            NavInput::Reset => self.reset(),
        }
    }

    fn handle_scroll(&mut self, delta_y: f64, now: Instant) -> Option<Transition> {
        // zero delta (pure horizontal scroll) does not consume the window
        if delta_y == 0.0 {
            return None;
        }

        let open = self
            .last_scroll
            .is_none_or(|last| now.saturating_duration_since(last) > self.policy.scroll_debounce);
        if !open {
            log::trace!("Scroll tick dropped inside debounce window");
            return None;
        }
        self.last_scroll = Some(now);

        if delta_y > 0.0 { self.next() } else { self.prev() }
    }

    fn handle_drag_end(&mut self, offset_x: f64) -> Option<Transition> {
        let dead_zone = self.policy.drag_dead_zone;
        if offset_x < -dead_zone {
            self.next()
        } else if offset_x > dead_zone {
            self.prev()
        } else {
            None
        }
    }

    fn set(&mut self, index: usize) -> Option<Transition> {
        let from = self.active;
        self.active = index;
        (from != index).then_some(Transition { from, to: index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(total: usize) -> RotationController {
        RotationController::new(NonZeroUsize::new(total).unwrap(), InputPolicy::default())
    }

    #[test]
    fn test_index_stays_in_range() {
        for total in 1..=7 {
            let mut c = controller(total);
            // deterministic mixed walk
            for step in 0..100usize {
                if (step * 7 + total) % 3 == 0 {
                    c.prev();
                } else {
                    c.next();
                }
                assert!(c.active() < total);
            }
        }
    }

    #[test]
    fn test_next_prev_are_inverse() {
        for total in 1..=6 {
            for start in 0..total {
                let mut c = controller(total);
                c.jump_to(start);
                c.next();
                c.prev();
                assert_eq!(c.active(), start);
                c.prev();
                c.next();
                assert_eq!(c.active(), start);
            }
        }
    }

    #[test]
    fn test_wraparound() {
        let mut c = controller(5);
        assert_eq!(c.prev(), Some(Transition { from: 0, to: 4 }));
        assert_eq!(c.next(), Some(Transition { from: 4, to: 0 }));
    }

    #[test]
    fn test_reset_always_zero() {
        let mut c = controller(5);
        c.reset();
        assert_eq!(c.active(), 0);
        c.jump_to(3);
        assert_eq!(c.reset(), Some(Transition { from: 3, to: 0 }));
        assert_eq!(c.active(), 0);
    }

    #[test]
    fn test_jump_to_is_idempotent() {
        let mut c = controller(5);
        assert_eq!(c.jump_to(2), Some(Transition { from: 0, to: 2 }));
        assert_eq!(c.jump_to(2), None);
        assert_eq!(c.active(), 2);
    }

    #[test]
    fn test_jump_out_of_range_is_refused() {
        let mut c = controller(5);
        c.jump_to(1);
        assert_eq!(c.jump_to(5), None);
        assert_eq!(c.active(), 1);
    }

    #[test]
    fn test_drag_dead_zone_is_strict() {
        let now = Instant::now();
        let mut c = controller(5);
        assert_eq!(c.handle(NavInput::DragEnd { offset_x: 50.0 }, now), None);
        assert_eq!(c.handle(NavInput::DragEnd { offset_x: -50.0 }, now), None);
        assert_eq!(c.handle(NavInput::DragEnd { offset_x: 12.0 }, now), None);
        assert_eq!(c.active(), 0);

        c.handle(NavInput::DragEnd { offset_x: -51.0 }, now);
        assert_eq!(c.active(), 1);
        c.handle(NavInput::DragEnd { offset_x: 51.0 }, now);
        assert_eq!(c.active(), 0);
    }

    #[test]
    fn test_scroll_debounce() {
        let t0 = Instant::now();
        let mut c = controller(5);
        assert!(c.handle(NavInput::Scroll { delta_y: 3.0 }, t0).is_some());
        let t1 = t0 + Duration::from_millis(100);
        assert!(c.handle(NavInput::Scroll { delta_y: 3.0 }, t1).is_none());
        assert_eq!(c.active(), 1);

        let mut c = controller(5);
        c.handle(NavInput::Scroll { delta_y: 3.0 }, t0);
        let t2 = t0 + Duration::from_millis(600);
        c.handle(NavInput::Scroll { delta_y: 3.0 }, t2);
        assert_eq!(c.active(), 2);
    }

    #[test]
    fn test_scroll_window_measured_from_last_accepted() {
        let t0 = Instant::now();
        let mut c = controller(5);
        c.handle(NavInput::Scroll { delta_y: 1.0 }, t0);
        // dropped ticks do not extend the window
        c.handle(NavInput::Scroll { delta_y: 1.0 }, t0 + Duration::from_millis(400));
        c.handle(NavInput::Scroll { delta_y: -1.0 }, t0 + Duration::from_millis(501));
        assert_eq!(c.active(), 0);
    }

    #[test]
    fn test_zero_scroll_is_ignored() {
        let t0 = Instant::now();
        let mut c = controller(5);
        assert!(c.handle(NavInput::Scroll { delta_y: 0.0 }, t0).is_none());
        assert!(c.handle(NavInput::Scroll { delta_y: 1.0 }, t0).is_some());
    }

    #[test]
    fn test_click_active_item_is_noop() {
        let now = Instant::now();
        let mut c = controller(5);
        assert_eq!(c.handle(NavInput::Click(0), now), None);
        assert_eq!(
            c.handle(NavInput::Click(3), now),
            Some(Transition { from: 0, to: 3 })
        );
    }

    #[test]
    fn test_keys() {
        let now = Instant::now();
        let mut c = controller(3);
        c.handle(NavInput::Key(NavKey::Right), now);
        c.handle(NavInput::Key(NavKey::Right), now);
        assert_eq!(c.active(), 2);
        c.handle(NavInput::Key(NavKey::Left), now);
        assert_eq!(c.active(), 1);
        assert_eq!("arrowright".parse::<NavKey>().unwrap(), NavKey::Right);
    }

    #[test]
    fn test_retarget_shrinks_index() {
        let mut c = controller(5);
        c.jump_to(4);
        assert_eq!(
            c.retarget(NonZeroUsize::new(3).unwrap()),
            Some(Transition { from: 4, to: 1 })
        );
        assert_eq!(c.total(), 3);
    }

    #[test]
    fn test_set_policy_widens_dead_zone() {
        let now = Instant::now();
        let mut c = controller(5);
        c.set_policy(InputPolicy {
            drag_dead_zone: 120.0,
            ..Default::default()
        });
        assert_eq!(c.handle(NavInput::DragEnd { offset_x: -100.0 }, now), None);
        assert!(c.handle(NavInput::DragEnd { offset_x: -121.0 }, now).is_some());
    }

    #[test]
    fn test_policy_deserialization() {
        let policy: InputPolicy =
            serde_json::from_str(r#"{"scroll_debounce": 250}"#).unwrap();
        assert_eq!(policy.scroll_debounce, Duration::from_millis(250));
        assert_eq!(policy.drag_dead_zone, DRAG_DEAD_ZONE);
    }
}
