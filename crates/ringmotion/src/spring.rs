//! Damped harmonic oscillator used for the ring rotation.
//!
//! The spring is stepped once per frame with the frame's wall-clock delta.
//! Integration is semi-implicit Euler over fixed sub-steps so that a slow
//! frame cannot destabilise a stiff spring. Once position and velocity fall
//! below the rest thresholds the value snaps exactly onto the target and
//! stays there until the target moves.

use serde::Deserialize;

/// Longest frame delta honoured in one step (seconds).
pub const MAX_FRAME_DT: f64 = 0.05;
/// Integration sub-step (seconds).
pub const SUB_STEP: f64 = 1.0 / 240.0;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    /// Distance from target below which the spring may settle.
    pub rest_delta: f64,
    /// Speed below which the spring may settle.
    pub rest_speed: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 40.0,
            damping: 9.0,
            mass: 1.0,
            rest_delta: 0.01,
            rest_speed: 0.05,
        }
    }
}

impl SpringConfig {
    /// ζ = c / (2·√(k·m)). Below 1.0 the spring overshoots.
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }
}

#[derive(Debug, Clone)]
pub struct Spring {
    config: SpringConfig,
    position: f64,
    velocity: f64,
    target: f64,
    settled: bool,
}

impl Spring {
    /// A spring at rest on `position`.
    pub fn new(config: SpringConfig, position: f64) -> Self {
        Self {
            config,
            position,
            velocity: 0.0,
            target: position,
            settled: true,
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Swaps the physical constants without disturbing position or velocity.
    pub fn set_config(&mut self, config: SpringConfig) {
        self.config = config;
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    /// Moves the rest point. Current velocity is kept so retargeting
    /// mid-flight stays continuous.
    pub fn set_target(&mut self, target: f64) {
        if target != self.target {
            self.target = target;
            self.settled = false;
        }
    }

    /// Advances by `dt` seconds. Returns `true` while still moving.
    pub fn step(&mut self, dt: f64) -> bool {
        if self.settled {
            return false;
        }

        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        let steps = (dt / SUB_STEP).ceil() as usize;
        if steps > 0 {
            let h = dt / steps as f64;
            for _ in 0..steps {
                self.integrate(h);
            }
        }

        if self.at_rest() {
            self.position = self.target;
            self.velocity = 0.0;
            self.settled = true;
            return false;
        }
        true
    }

    fn integrate(&mut self, h: f64) {
        let SpringConfig {
            stiffness,
            damping,
            mass,
            ..
        } = self.config;
        let spring_force = -stiffness * (self.position - self.target);
        let damping_force = -damping * self.velocity;
        self.velocity += (spring_force + damping_force) / mass * h;
        self.position += self.velocity * h;
    }

    fn at_rest(&self) -> bool {
        (self.position - self.target).abs() < self.config.rest_delta
            && self.velocity.abs() < self.config.rest_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1.0 / 60.0;

    #[test]
    fn test_default_is_underdamped() {
        assert!(SpringConfig::default().damping_ratio() < 1.0);
    }

    #[test]
    fn test_new_spring_is_settled() {
        let mut s = Spring::new(SpringConfig::default(), -90.0);
        assert!(s.is_settled());
        assert!(!s.step(FRAME));
        assert_eq!(s.position(), -90.0);
    }

    #[test]
    fn test_overshoots_then_settles_exactly() {
        let mut s = Spring::new(SpringConfig::default(), -90.0);
        s.set_target(-234.0);

        let mut lowest = f64::MAX;
        let mut frames = 0;
        while s.step(FRAME) {
            lowest = lowest.min(s.position());
            frames += 1;
            assert!(frames < 600, "spring failed to settle");
        }

        assert!(lowest < -234.0, "expected overshoot past target, got {lowest}");
        assert_eq!(s.position(), -234.0);
        assert_eq!(s.velocity(), 0.0);
        assert!(s.is_settled());
        // holds once settled
        assert!(!s.step(FRAME));
        assert_eq!(s.position(), -234.0);
    }

    #[test]
    fn test_large_dt_is_clamped() {
        let mut s = Spring::new(SpringConfig::default(), 0.0);
        s.set_target(100.0);
        s.step(10.0);
        assert!(s.position().is_finite());
        assert!(s.position() < 100.0);
    }

    #[test]
    fn test_retarget_keeps_velocity() {
        let mut s = Spring::new(SpringConfig::default(), 0.0);
        s.set_target(100.0);
        for _ in 0..5 {
            s.step(FRAME);
        }
        let v = s.velocity();
        assert!(v > 0.0);
        s.set_target(-50.0);
        assert_eq!(s.velocity(), v);
        assert!(!s.is_settled());
    }

    #[test]
    fn test_set_config_keeps_motion() {
        let mut s = Spring::new(SpringConfig::default(), 0.0);
        s.set_target(100.0);
        for _ in 0..5 {
            s.step(FRAME);
        }
        let (x, v) = (s.position(), s.velocity());
        let stiff = SpringConfig {
            stiffness: 120.0,
            ..Default::default()
        };
        s.set_config(stiff);
        assert_eq!(s.config(), stiff);
        assert_eq!((s.position(), s.velocity()), (x, v));
        assert!(!s.is_settled());
    }

    #[test]
    fn test_config_deserialization() {
        let cfg: SpringConfig = serde_json::from_str(r#"{"damping": 6.0}"#).unwrap();
        assert_eq!(cfg.damping, 6.0);
        assert_eq!(cfg.stiffness, 40.0);
    }
}
