use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

const ACCENT: &str = "ringnav_accent";
const TRACK: &str = "ringnav_track";
const HALO: &str = "ringnav_halo";
/// Text color. The window paints its own dark backdrop, so the desktop
/// theme's foreground (dark on light themes) is never used.
const FOREGROUND: &str = "ringnav_fg";

const CSS: &str = "
@define-color ringnav_accent #8b5cf6;
@define-color ringnav_track #ffffff;
@define-color ringnav_halo #581c87;
@define-color ringnav_fg #ffffff;

.ringnav-window {
    background-image: linear-gradient(to bottom, #0B0B15, #101020, #05050a);
    color: @ringnav_fg;
}
.ringnav-window.overlay {
    background: none;
    background-color: rgba(11, 11, 21, 0.85);
}
.ringnav-drawing-area {
    background: none;
    background-color: transparent;
}
.ringnav-title {
    font-size: 30px;
    letter-spacing: 3px;
    color: alpha(@ringnav_fg, 0.9);
}
.ringnav-tagline {
    font-size: 11px;
    letter-spacing: 2px;
    color: alpha(@ringnav_fg, 0.4);
}
.ringnav-control {
    min-width: 48px;
    min-height: 48px;
    border-radius: 12px;
    border: 1px solid rgba(255, 255, 255, 0.1);
    background: rgba(255, 255, 255, 0.05);
    color: alpha(@ringnav_fg, 0.7);
    box-shadow: none;
}
.ringnav-control:hover {
    background: rgba(255, 255, 255, 0.1);
    border-color: rgba(255, 255, 255, 0.3);
    color: @ringnav_fg;
}
";

pub struct ThemeColors {
    pub accent: Srgba<f64>,
    pub track: Srgba<f64>,
    pub halo: Srgba<f64>,
    pub item_fill: Srgba<f64>,
    pub item_fill_active: Srgba<f64>,
    pub item_border: Srgba<f64>,
    pub item_border_active: Srgba<f64>,
    pub title: Srgba<f64>,
    pub subtitle_active: Srgba<f64>,
    pub description: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            accent: Self::lookup_color(
                context,
                ACCENT,
                Srgba::new(0.545, 0.361, 0.965, 0.5),
                Some(0.5),
            ),
            track: Self::lookup_color(
                context,
                TRACK,
                Srgba::new(1.0, 1.0, 1.0, 0.05),
                Some(0.05),
            ),
            halo: Self::lookup_color(
                context,
                HALO,
                Srgba::new(0.345, 0.11, 0.529, 0.1),
                Some(0.1),
            ),
            item_fill: Srgba::new(0.0, 0.0, 0.0, 0.2),
            item_fill_active: Srgba::new(1.0, 1.0, 1.0, 0.05),
            item_border: Srgba::new(1.0, 1.0, 1.0, 0.1),
            item_border_active: Self::lookup_color(
                context,
                ACCENT,
                Srgba::new(0.753, 0.518, 0.988, 0.3),
                Some(0.3),
            ),
            title: Self::lookup_color(
                context,
                FOREGROUND,
                Srgba::new(1.0, 1.0, 1.0, 1.0),
                Some(1.0),
            ),
            subtitle_active: Srgba::new(0.847, 0.706, 0.996, 1.0),
            description: Self::lookup_color(
                context,
                FOREGROUND,
                Srgba::new(1.0, 1.0, 1.0, 0.5),
                Some(0.5),
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    provider.load_from_data(CSS);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_looked_up_color_is_defined() {
        for name in [ACCENT, TRACK, HALO, FOREGROUND] {
            let definition = format!("@define-color {name} ");
            assert!(CSS.contains(&definition), "{name} missing from stylesheet");
        }
    }

    #[test]
    fn test_foreground_is_light() {
        let line = CSS
            .lines()
            .find(|l| l.starts_with(&format!("@define-color {FOREGROUND} ")))
            .unwrap();
        assert!(line.ends_with("#ffffff;"));
        assert!(!CSS.contains("theme_fg_color"));
    }
}
