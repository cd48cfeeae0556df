use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumString};

/// Viewports narrower than this use the compact layout.
pub const COMPACT_BREAKPOINT: f64 = 768.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point at `distance` from `self` along `angle` (radians, 0 = right, clockwise positive).
    pub fn polar_offset(&self, angle: f64, distance: f64) -> Point {
        Point::new(
            self.x + distance * angle.cos(),
            self.y + distance * angle.sin(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Compact,
    Standard,
}

impl Layout {
    pub fn for_width(width: f64) -> Self {
        if width < COMPACT_BREAKPOINT {
            Self::Compact
        } else {
            Self::Standard
        }
    }

    pub fn ring_radius(&self) -> f64 {
        match self {
            Self::Compact => 120.0,
            Self::Standard => 200.0,
        }
    }

    /// Downward shift of the shared center. Every consumer of the center goes
    /// through this, otherwise the ring and the particle orbit decenter.
    pub fn vertical_offset(&self) -> f64 {
        match self {
            Self::Compact => 48.0,
            Self::Standard => 64.0,
        }
    }

    /// Diameter of an item disc.
    pub fn item_diameter(&self, active: bool) -> f64 {
        match (self, active) {
            (Self::Compact, true) => 112.0,
            (Self::Compact, false) => 80.0,
            (Self::Standard, true) => 160.0,
            (Self::Standard, false) => 128.0,
        }
    }
}

/// One consistent snapshot of the layout. Consumers copy it out whole so a
/// center from one generation is never paired with a radius from another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub center: Point,
    pub radius: f64,
    pub layout: Layout,
    pub viewport: Viewport,
    pub generation: u64,
}

impl Geometry {
    pub fn from_viewport(viewport: Viewport, generation: u64) -> Self {
        let layout = Layout::for_width(viewport.width);
        Self {
            center: Point::new(
                viewport.width / 2.0,
                viewport.height / 2.0 + layout.vertical_offset(),
            ),
            radius: layout.ring_radius(),
            layout,
            viewport,
            generation,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeometryProvider {
    current: Geometry,
}

impl GeometryProvider {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            current: Geometry::from_viewport(viewport, 0),
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.current
    }

    /// Recomputes the geometry for a new viewport. Returns `false` when the
    /// dimensions did not change.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if viewport == self.current.viewport {
            return false;
        }
        self.current = Geometry::from_viewport(viewport, self.current.generation + 1);
        log::debug!(
            "Geometry gen {}: {}x{} {} center=({:.1}, {:.1}) radius={}",
            self.current.generation,
            viewport.width,
            viewport.height,
            self.current.layout,
            self.current.center.x,
            self.current.center.y,
            self.current.radius
        );
        true
    }
}
