use crate::geometry::Point;
use palette::Srgba;

/// A persistent 2D surface that keeps its pixels between frames. The
/// particle field fades it instead of clearing it, which leaves trails.
pub trait TrailSurface {
    type Error: std::error::Error;

    /// Blends `color` over the whole surface.
    fn fill_rect(&mut self, color: Srgba<f64>) -> Result<(), Self::Error>;

    fn fill_circle(
        &mut self,
        center: Point,
        radius: f64,
        color: Srgba<f64>,
    ) -> Result<(), Self::Error>;
}
