use gtk::prelude::*;
use gtk4 as gtk;
use gtk4_layer_shell::{Edge, Layer, LayerShell};

/// Turns the window into a full-screen overlay on layer-shell compositors.
pub fn init_layer_shell(window: &gtk::ApplicationWindow) {
    if !gtk4_layer_shell::is_supported() {
        log::warn!("Layer shell not supported by this compositor, using a normal window");
        return;
    }
    window.init_layer_shell();
    window.set_layer(Layer::Overlay);
    window.set_namespace(Some("ringnav"));
    window.set_exclusive_zone(-1);
    for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
        window.set_anchor(edge, true);
    }
    window.set_keyboard_mode(gtk4_layer_shell::KeyboardMode::OnDemand);
    window.add_css_class("overlay");
}
