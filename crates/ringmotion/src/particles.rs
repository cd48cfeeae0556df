use crate::geometry::{Geometry, Point, Viewport};
use crate::surface::TrailSurface;
use palette::{Srgb, Srgba};
use rand::Rng;
use serde::Deserialize;
use std::f64::consts::TAU;

pub const DEFAULT_COUNT: usize = 100;
pub const MIN_ORBIT: f64 = 50.0;
/// Orbits reach out to `min(width, height) / ORBIT_SPREAD` beyond `MIN_ORBIT`.
pub const ORBIT_SPREAD: f64 = 1.5;
pub const MIN_SPEED: f64 = 0.0005;
pub const SPEED_SPREAD: f64 = 0.002;
pub const MAX_SIZE: f64 = 1.5;
pub const MIN_OPACITY: f64 = 0.05;
pub const OPACITY_SPREAD: f64 = 0.4;

const PURPLE: (u8, u8, u8) = (0x8b, 0x5c, 0xf6);
const BLUE: (u8, u8, u8) = (0x3b, 0x82, 0xf6);
const TRAIL_TINT: (u8, u8, u8) = (10, 10, 20);

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    pub count: usize,
    /// Alpha of the fade painted over the previous frame. Lower is longer trails.
    pub trail_alpha: f64,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            trail_alpha: 0.1,
        }
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Srgb<f64> {
    Srgb::new(r, g, b).into_format()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Radians, kept in `[0, 2π)`.
    pub angle: f64,
    /// Radians per frame.
    pub speed: f64,
    pub distance: f64,
    pub size: f64,
    pub color: Srgb<f64>,
    pub opacity: f64,
}

impl Particle {
    pub fn random<R: Rng>(rng: &mut R, viewport: Viewport) -> Self {
        Self {
            angle: rng.random::<f64>() * TAU,
            speed: MIN_SPEED + rng.random::<f64>() * SPEED_SPREAD,
            distance: MIN_ORBIT
                + rng.random::<f64>() * (viewport.min_side().max(0.0) / ORBIT_SPREAD),
            size: rng.random::<f64>() * MAX_SIZE,
            color: if rng.random_bool(0.5) { rgb(PURPLE) } else { rgb(BLUE) },
            opacity: MIN_OPACITY + rng.random::<f64>() * OPACITY_SPREAD,
        }
    }

    pub fn advance(&mut self) {
        self.angle = (self.angle + self.speed).rem_euclid(TAU);
    }

    /// Position is always derived from the live center, never stored.
    pub fn position(&self, center: Point) -> Point {
        center.polar_offset(self.angle, self.distance)
    }
}

/// Fixed pool of particles orbiting the shared center.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    trail: Srgba<f64>,
}

impl ParticleField {
    pub fn new<R: Rng>(settings: ParticleSettings, viewport: Viewport, rng: &mut R) -> Self {
        let particles = (0..settings.count)
            .map(|_| Particle::random(rng, viewport))
            .collect();
        let tint = rgb(TRAIL_TINT);
        Self {
            particles,
            trail: Srgba::new(tint.red, tint.green, tint.blue, settings.trail_alpha),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// One animation frame of orbital motion.
    pub fn advance(&mut self) {
        self.particles.iter_mut().for_each(Particle::advance);
    }

    pub fn positions(&self, geometry: &Geometry) -> impl Iterator<Item = (Point, &Particle)> {
        let center = geometry.center;
        self.particles.iter().map(move |p| (p.position(center), p))
    }

    pub fn render<S: TrailSurface>(
        &self,
        surface: &mut S,
        geometry: &Geometry,
    ) -> Result<(), S::Error> {
        surface.fill_rect(self.trail)?;
        for (pos, p) in self.positions(geometry) {
            let c = p.color;
            let color = Srgba::new(c.red, c.green, c.blue, p.opacity);
            surface.fill_circle(pos, p.size, color)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryProvider;
    use crate::surface::recording::{Command, RecordingSurface};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn field(count: usize, viewport: Viewport) -> ParticleField {
        let mut rng = StdRng::seed_from_u64(7);
        ParticleField::new(
            ParticleSettings {
                count,
                ..Default::default()
            },
            viewport,
            &mut rng,
        )
    }

    #[test]
    fn test_initial_ranges() {
        let viewport = Viewport::new(1200.0, 900.0);
        let f = field(500, viewport);
        assert_eq!(f.len(), 500);
        let max_orbit = MIN_ORBIT + 900.0 / ORBIT_SPREAD;
        for p in f.particles() {
            assert!((MIN_ORBIT..=max_orbit).contains(&p.distance));
            assert!((MIN_SPEED..=MIN_SPEED + SPEED_SPREAD).contains(&p.speed));
            assert!((0.0..=MAX_SIZE).contains(&p.size));
            assert!((MIN_OPACITY..=MIN_OPACITY + OPACITY_SPREAD).contains(&p.opacity));
            assert!((0.0..TAU).contains(&p.angle));
            assert!(p.color == rgb(PURPLE) || p.color == rgb(BLUE));
        }
    }

    #[test]
    fn test_angle_integration_ignores_geometry() {
        let mut provider = GeometryProvider::new(Viewport::new(1200.0, 900.0));
        let mut f = field(20, provider.geometry().viewport);
        let initial: Vec<(f64, f64, f64)> = f
            .particles()
            .iter()
            .map(|p| (p.angle, p.speed, p.distance))
            .collect();

        let k = 250;
        for frame in 0..k {
            if frame == 100 {
                provider.resize(Viewport::new(500.0, 700.0));
            }
            f.advance();
        }

        for (p, (angle, speed, distance)) in f.particles().iter().zip(initial) {
            let expected = (angle + k as f64 * speed).rem_euclid(TAU);
            let diff = (p.angle - expected).abs();
            assert!(diff < 1e-9 || (TAU - diff) < 1e-9);
            assert_eq!(p.distance, distance);
        }
    }

    #[test]
    fn test_position_follows_current_center() {
        let f = field(10, Viewport::new(1200.0, 900.0));
        let before = Geometry::from_viewport(Viewport::new(1200.0, 900.0), 0);
        let after = Geometry::from_viewport(Viewport::new(600.0, 900.0), 1);
        for ((a, p), (b, _)) in f.positions(&before).zip(f.positions(&after)) {
            assert!((a.distance(before.center) - p.distance).abs() < 1e-9);
            assert!((b.distance(after.center) - p.distance).abs() < 1e-9);
        }
    }

    #[test]
    fn test_render_fades_before_drawing() {
        let f = field(3, Viewport::new(800.0, 600.0));
        let geometry = Geometry::from_viewport(Viewport::new(800.0, 600.0), 0);
        let mut surface = RecordingSurface::default();
        f.render(&mut surface, &geometry).unwrap();

        assert_eq!(surface.commands.len(), 4);
        match &surface.commands[0] {
            Command::Rect(c) => assert!((c.alpha - 0.1).abs() < 1e-9),
            other => panic!("expected trail fade first, got {other:?}"),
        }
        for (cmd, p) in surface.commands[1..].iter().zip(f.particles()) {
            match cmd {
                Command::Circle(_, r, c) => {
                    assert_eq!(*r, p.size);
                    assert_eq!(c.alpha, p.opacity);
                }
                other => panic!("expected particle, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_zero_viewport_does_not_panic() {
        let f = field(5, Viewport::default());
        assert!(f.particles().iter().all(|p| p.distance == MIN_ORBIT));
    }
}
