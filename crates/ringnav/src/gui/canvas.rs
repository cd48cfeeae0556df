use cairo::{Context, Format, ImageSurface};
use palette::Srgba;
use ringmotion::{Point, Scene, TrailSurface, Viewport};
use std::f64::consts::PI;

/// Cairo-backed trail surface. Only fades and circles, nothing else.
struct CairoTrail<'a> {
    cr: &'a Context,
    viewport: Viewport,
}

impl TrailSurface for CairoTrail<'_> {
    type Error = cairo::Error;

    fn fill_rect(&mut self, color: Srgba<f64>) -> Result<(), Self::Error> {
        let (r, g, b, a) = color.into_components();
        self.cr.set_source_rgba(r, g, b, a);
        self.cr
            .rectangle(0.0, 0.0, self.viewport.width, self.viewport.height);
        self.cr.fill()
    }

    fn fill_circle(
        &mut self,
        center: Point,
        radius: f64,
        color: Srgba<f64>,
    ) -> Result<(), Self::Error> {
        let (r, g, b, a) = color.into_components();
        self.cr.set_source_rgba(r, g, b, a);
        self.cr.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
        self.cr.fill()
    }
}

/// Off-screen image the particle field accumulates into across frames.
#[derive(Default)]
pub struct ParticleCanvas {
    surface: Option<ImageSurface>,
}

impl ParticleCanvas {
    /// Recreates the backing image. On failure the canvas stays empty and
    /// the particle layer simply draws nothing.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.surface = match ImageSurface::create(Format::ARgb32, width.max(1), height.max(1)) {
            Ok(s) => Some(s),
            Err(e) => {
                log::debug!("Particle surface unavailable ({}x{}): {}", width, height, e);
                None
            }
        };
    }

    pub fn is_available(&self) -> bool {
        self.surface.is_some()
    }

    /// Fades the previous frame and draws the particles at their current positions.
    pub fn paint(&self, scene: &Scene) -> Result<(), cairo::Error> {
        let Some(surface) = &self.surface else {
            return Ok(());
        };
        let cr = Context::new(surface)?;
        let mut trail = CairoTrail {
            cr: &cr,
            viewport: Viewport::new(surface.width() as f64, surface.height() as f64),
        };
        scene.render_particles(&mut trail)
    }

    pub fn draw_onto(&self, cr: &Context) -> Result<(), cairo::Error> {
        let Some(surface) = &self.surface else {
            return Ok(());
        };
        cr.set_source_surface(surface, 0.0, 0.0)?;
        cr.paint()
    }
}
