use crate::bob;
use crate::geometry::{Geometry, Point};
use crate::item::ItemList;
use crate::spring::{Spring, SpringConfig};

/// Screen angle the active item is pinned to (degrees, 0 = right, clockwise positive).
pub const TOP_ANGLE: f64 = -90.0;
pub const HOVER_SCALE: f64 = 1.05;

/// Ring rotation that brings `active` to the top. Not normalised, so index 4
/// of 5 yields -378 rather than -18.
pub fn target_rotation(active: usize, total: usize) -> f64 {
    TOP_ANGLE - active as f64 * (360.0 / total as f64)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemPlacement {
    pub index: usize,
    /// Item's fixed angle on the ring (degrees).
    pub ring_angle: f64,
    /// Where the disc center lands on screen, bobbing included.
    pub center: Point,
    /// Applied to the item's content so it stays upright (degrees).
    pub counter_rotation: f64,
    /// Idle float added after the counter-rotation, in screen pixels.
    pub lift: f64,
    pub diameter: f64,
    pub active: bool,
    pub hovered: bool,
}

impl ItemPlacement {
    pub fn contains(&self, point: Point) -> bool {
        self.center.distance(point) <= self.diameter / 2.0
    }

    /// Disc center in the ring's own frame: relative to the ring center and
    /// before the ring rotation is applied.
    pub fn ring_offset(&self, radius: f64) -> Point {
        Point::default().polar_offset(self.ring_angle.to_radians(), radius)
    }
}

/// Spring-driven ring rotation. Holds no navigation state of its own; it is
/// retargeted from the controller's index.
#[derive(Debug, Clone)]
pub struct RingAnimator {
    spring: Spring,
}

impl RingAnimator {
    /// Starts from an unrotated ring and swings into place on the first frames.
    pub fn new(config: SpringConfig, active: usize, total: usize) -> Self {
        let mut spring = Spring::new(config, 0.0);
        spring.set_target(target_rotation(active, total));
        Self { spring }
    }

    pub fn set_config(&mut self, config: SpringConfig) {
        self.spring.set_config(config);
    }

    pub fn sync(&mut self, active: usize, total: usize) {
        self.spring.set_target(target_rotation(active, total));
    }

    pub fn step(&mut self, dt: f64) -> bool {
        self.spring.step(dt)
    }

    pub fn rotation(&self) -> f64 {
        self.spring.position()
    }

    pub fn target(&self) -> f64 {
        self.spring.target()
    }

    pub fn is_settled(&self) -> bool {
        self.spring.is_settled()
    }
}

/// Per-item layout for one frame, in paint order (active item last).
pub fn placements(
    items: &ItemList,
    geometry: &Geometry,
    rotation: f64,
    active: usize,
    hovered: Option<usize>,
    elapsed: f64,
) -> Vec<ItemPlacement> {
    let mut out: Vec<ItemPlacement> = (0..items.len())
        .map(|index| {
            let is_active = index == active;
            let is_hovered = hovered == Some(index);
            let ring_angle = items.angle(index);
            let screen = (ring_angle + rotation).to_radians();
            let base = geometry.center.polar_offset(screen, geometry.radius);
            let scale = if is_hovered { HOVER_SCALE } else { 1.0 };
            let lift = bob::offset(elapsed, index, is_active);

            ItemPlacement {
                index,
                ring_angle,
                center: Point::new(base.x, base.y + lift),
                counter_rotation: -rotation,
                lift,
                diameter: geometry.layout.item_diameter(is_active) * scale,
                active: is_active,
                hovered: is_hovered,
            }
        })
        .collect();

    out.sort_by_key(|p| p.active);
    out
}

/// Topmost item under `point`.
pub fn hit_test(placements: &[ItemPlacement], point: Point) -> Option<usize> {
    placements
        .iter()
        .rev()
        .find(|p| p.contains(point))
        .map(|p| p.index)
}
