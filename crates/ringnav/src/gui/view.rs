use crate::gui::theme::ThemeColors;
use cairo::{Context, RadialGradient};
use palette::Srgba;
use ringmotion::description::DescriptionFrame;
use ringmotion::ring::ItemPlacement;
use ringmotion::{Geometry, Item, Layout, Scene};
use std::f64::consts::PI;

/// Distance of the description baseline from the bottom edge.
fn description_inset(layout: Layout) -> f64 {
    match layout {
        Layout::Compact => 96.0,
        Layout::Standard => 128.0,
    }
}

struct FontSizes {
    title: f64,
    subtitle: f64,
    number: f64,
}

impl FontSizes {
    fn new(layout: Layout, active: bool) -> Self {
        let (subtitle, number) = match layout {
            Layout::Compact => (8.0, 30.0),
            Layout::Standard => (10.0, 60.0),
        };
        let title = match (layout, active) {
            (Layout::Compact, true) => 14.0,
            (Layout::Compact, false) => 10.0,
            (Layout::Standard, true) => 18.0,
            (Layout::Standard, false) => 14.0,
        };
        Self {
            title,
            subtitle,
            number,
        }
    }
}

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn with_alpha(color: Srgba<f64>, alpha: f64) -> Srgba<f64> {
    Srgba::new(color.red, color.green, color.blue, alpha)
}

fn show_centered(cr: &Context, text: &str, x: f64, y: f64) -> Result<(), cairo::Error> {
    let ext = cr.text_extents(text)?;
    cr.move_to(
        x - ext.width() / 2.0 - ext.x_bearing(),
        y - ext.height() / 2.0 - ext.y_bearing(),
    );
    cr.show_text(text)
}

struct ItemRenderer<'a> {
    item: &'a Item,
    placement: &'a ItemPlacement,
    geometry: &'a Geometry,
}

impl<'a> ItemRenderer<'a> {
    fn new(item: &'a Item, placement: &'a ItemPlacement, geometry: &'a Geometry) -> Self {
        Self {
            item,
            placement,
            geometry,
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let g = self.geometry;
        let p = self.placement;
        let local = p.ring_offset(g.radius);
        cr.save()?;
        // ring frame
        cr.translate(g.center.x, g.center.y);
        cr.rotate((-p.counter_rotation).to_radians());
        cr.translate(local.x, local.y);
        // upright item frame
        cr.rotate(p.counter_rotation.to_radians());
        cr.translate(0.0, p.lift);
        self.draw_disc(cr, colors)?;
        self.draw_content(cr, colors)?;
        cr.restore()
    }

    fn radius(&self) -> f64 {
        self.placement.diameter / 2.0
    }

    fn draw_disc(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let r = self.radius();

        if self.placement.active {
            // glow
            let glow = RadialGradient::new(0.0, 0.0, r * 0.8, 0.0, 0.0, r + 30.0);
            let (gr, gg, gb, _) = colors.accent.into_components();
            glow.add_color_stop_rgba(0.0, gr, gg, gb, 0.2);
            glow.add_color_stop_rgba(1.0, gr, gg, gb, 0.0);
            cr.set_source(&glow)?;
            cr.arc(0.0, 0.0, r + 30.0, 0.0, 2.0 * PI);
            cr.fill()?;
        }

        let fill = match (self.placement.active, self.placement.hovered) {
            (true, _) | (false, true) => colors.item_fill_active,
            (false, false) => colors.item_fill,
        };
        set_source(cr, fill);
        cr.arc(0.0, 0.0, r, 0.0, 2.0 * PI);
        cr.fill()?;

        let border = if self.placement.active {
            colors.item_border_active
        } else {
            colors.item_border
        };
        set_source(cr, border);
        cr.set_line_width(1.0);
        cr.arc(0.0, 0.0, r, 0.0, 2.0 * PI);
        cr.stroke()?;

        if self.placement.active {
            // indicator ring in the item's own color
            let tint = self.item.color.rgb();
            set_source(cr, Srgba::new(tint.red, tint.green, tint.blue, 0.5));
            cr.arc(0.0, 0.0, r - 1.5, 0.0, 2.0 * PI);
            cr.stroke()?;
        }
        Ok(())
    }

    fn draw_content(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let sizes = FontSizes::new(self.geometry.layout, self.placement.active);

        // number watermark
        let number = format!("0{}", self.item.id);
        let watermark = if self.placement.active {
            with_alpha(colors.accent, 0.05)
        } else {
            Srgba::new(1.0, 1.0, 1.0, 0.05)
        };
        set_source(cr, watermark);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(sizes.number);
        show_centered(cr, &number, 0.0, 0.0)?;

        let title_alpha = if self.placement.active { 1.0 } else { 0.6 };
        set_source(cr, with_alpha(colors.title, title_alpha));
        cr.set_font_size(sizes.title);
        show_centered(cr, self.item.title.as_str(), 0.0, -sizes.subtitle * 0.6)?;

        let subtitle = if self.placement.active {
            colors.subtitle_active
        } else {
            Srgba::new(1.0, 1.0, 1.0, 0.3)
        };
        set_source(cr, subtitle);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
        cr.set_font_size(sizes.subtitle);
        show_centered(
            cr,
            &self.item.subtitle.to_uppercase(),
            0.0,
            sizes.title * 0.5 + sizes.subtitle,
        )
    }
}

fn draw_backdrop(
    cr: &Context,
    geometry: &Geometry,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let (cx, cy, r) = (geometry.center.x, geometry.center.y, geometry.radius);

    // outer soft glow
    let halo = RadialGradient::new(cx, cy, 0.0, cx, cy, r * 1.5);
    let (hr, hg, hb, ha) = colors.halo.into_components();
    halo.add_color_stop_rgba(0.0, hr, hg, hb, ha);
    halo.add_color_stop_rgba(1.0, hr, hg, hb, 0.0);
    cr.set_source(&halo)?;
    cr.arc(cx, cy, r * 1.5, 0.0, 2.0 * PI);
    cr.fill()?;

    // track and inner faint ring
    set_source(cr, colors.track);
    cr.set_line_width(1.0);
    cr.arc(cx, cy, r, 0.0, 2.0 * PI);
    cr.stroke()?;
    cr.arc(cx, cy, r * 0.7, 0.0, 2.0 * PI);
    cr.stroke()?;

    // center light refraction
    let core = RadialGradient::new(cx, cy, 0.0, cx, cy, 50.0);
    let (ar, ag, ab, _) = colors.accent.into_components();
    core.add_color_stop_rgba(0.0, ar, ag, ab, 0.1);
    core.add_color_stop_rgba(1.0, ar, ag, ab, 0.0);
    cr.set_source(&core)?;
    cr.arc(cx, cy, 50.0, 0.0, 2.0 * PI);
    cr.fill()
}

fn draw_description(
    cr: &Context,
    frame: &DescriptionFrame<'_>,
    geometry: &Geometry,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let Some(text) = frame.text else {
        return Ok(());
    };
    let base = colors.description;
    set_source(cr, with_alpha(base, base.alpha * frame.opacity));
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
    cr.set_font_size(match geometry.layout {
        Layout::Compact => 12.0,
        Layout::Standard => 14.0,
    });
    let y = geometry.viewport.height - description_inset(geometry.layout) + frame.offset_y;
    show_centered(cr, text, geometry.viewport.width / 2.0, y)
}

pub fn draw(cr: &Context, scene: &Scene, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let geometry = scene.geometry();
    draw_backdrop(cr, &geometry, colors)?;

    for placement in scene.placements() {
        if let Some(item) = scene.items().get(placement.index) {
            ItemRenderer::new(item, &placement, &geometry).draw(cr, colors)?;
        }
    }

    draw_description(cr, &scene.description(), &geometry, colors)
}
