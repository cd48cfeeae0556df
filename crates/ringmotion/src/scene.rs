use crate::controller::{InputPolicy, NavInput, RotationController, Transition};
use crate::description::{DescriptionFrame, DescriptionPanel};
use crate::geometry::{Geometry, GeometryProvider, Point, Viewport};
use crate::item::{Item, ItemList};
use crate::particles::{ParticleField, ParticleSettings};
use crate::ring::{self, ItemPlacement, RingAnimator};
use crate::spring::SpringConfig;
use crate::surface::TrailSurface;
use rand::Rng;
use serde::Deserialize;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    pub input: InputPolicy,
    pub spring: SpringConfig,
    pub particles: ParticleSettings,
}

/// Whether anything visible changed during a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStatus {
    pub ring_moving: bool,
    pub description_moving: bool,
}

/// The whole widget minus the toolkit. The controller's index is the only
/// navigation state; ring target and description are derived from it on
/// every transition.
#[derive(Debug, Clone)]
pub struct Scene {
    items: ItemList,
    geometry: GeometryProvider,
    controller: RotationController,
    ring: RingAnimator,
    description: DescriptionPanel,
    particles: ParticleField,
    settings: SceneSettings,
    hovered: Option<usize>,
    elapsed: f64,
}

impl Scene {
    pub fn new<R: Rng>(
        items: ItemList,
        viewport: Viewport,
        settings: SceneSettings,
        rng: &mut R,
    ) -> Self {
        let controller = RotationController::new(items.count(), settings.input);
        let ring = RingAnimator::new(settings.spring, controller.active(), items.len());
        let description = DescriptionPanel::new(
            items
                .get(controller.active())
                .and_then(|item| item.description.clone()),
        );
        let particles = ParticleField::new(settings.particles, viewport, rng);

        Self {
            items,
            geometry: GeometryProvider::new(viewport),
            controller,
            ring,
            description,
            particles,
            settings,
            hovered: None,
            elapsed: 0.0,
        }
    }

    pub fn items(&self) -> &ItemList {
        &self.items
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry.geometry()
    }

    pub fn active(&self) -> usize {
        self.controller.active()
    }

    pub fn active_item(&self) -> Option<&Item> {
        self.items.get(self.controller.active())
    }

    pub fn rotation(&self) -> f64 {
        self.ring.rotation()
    }

    pub fn target_rotation(&self) -> f64 {
        self.ring.target()
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn settings(&self) -> SceneSettings {
        self.settings
    }

    /// Rebuilds the particle pool with orbits sized for the current viewport.
    /// The starting viewport is often a guess made before the window was
    /// allocated.
    pub fn reseed_particles<R: Rng>(&mut self, rng: &mut R) {
        let viewport = self.geometry().viewport;
        self.particles = ParticleField::new(self.settings.particles, viewport, rng);
        log::debug!(
            "Reseeded {} particles for {}x{}",
            self.particles.len(),
            viewport.width,
            viewport.height
        );
    }

    /// Applies reloaded tuning. Motion in flight is kept; the particle pool
    /// is only rebuilt when its own settings changed.
    pub fn apply_settings<R: Rng>(&mut self, settings: SceneSettings, rng: &mut R) {
        let particles_changed = settings.particles != self.settings.particles;
        self.settings = settings;
        self.controller.set_policy(settings.input);
        self.ring.set_config(settings.spring);
        if particles_changed {
            self.reseed_particles(rng);
        }
    }

    pub fn handle(&mut self, input: NavInput, now: Instant) -> Option<Transition> {
        let transition = self.controller.handle(input, now)?;
        log::debug!(
            "{:?}: item {} -> {}",
            input,
            transition.from,
            transition.to
        );
        self.sync_derived();
        Some(transition)
    }

    fn sync_derived(&mut self) {
        self.ring.sync(self.controller.active(), self.items.len());
        let text = self
            .active_item()
            .and_then(|item| item.description.clone());
        self.description.show(text);
    }

    pub fn resize(&mut self, viewport: Viewport) -> bool {
        self.geometry.resize(viewport)
    }

    /// Swaps in a reloaded item list, keeping the index in range.
    pub fn replace_items(&mut self, items: ItemList) {
        let count = items.count();
        self.items = items;
        self.hovered = None;
        if let Some(t) = self.controller.retarget(count) {
            log::info!("Active item moved {} -> {} after reload", t.from, t.to);
        }
        self.sync_derived();
    }

    /// One frame: particles advance a step, the spring and fades by `dt` seconds.
    pub fn tick(&mut self, dt: f64) -> FrameStatus {
        self.elapsed += dt.max(0.0);
        self.particles.advance();
        let ring_moving = self.ring.step(dt);
        self.description.tick(dt);
        FrameStatus {
            ring_moving,
            description_moving: self.description.is_animating(),
        }
    }

    pub fn placements(&self) -> Vec<ItemPlacement> {
        ring::placements(
            &self.items,
            &self.geometry(),
            self.ring.rotation(),
            self.controller.active(),
            self.hovered,
            self.elapsed,
        )
    }

    /// Item under `point`, if any.
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        ring::hit_test(&self.placements(), point)
    }

    /// Updates the hovered item. Returns `true` when it changed.
    pub fn hover(&mut self, point: Option<Point>) -> bool {
        let hovered = point.and_then(|p| self.hit_test(p));
        let changed = hovered != self.hovered;
        self.hovered = hovered;
        changed
    }

    pub fn description(&self) -> DescriptionFrame<'_> {
        self.description.frame()
    }

    pub fn render_particles<S: TrailSurface>(&self, surface: &mut S) -> Result<(), S::Error> {
        self.particles.render(surface, &self.geometry())
    }
}
