use crate::config::{self, Config, WindowConfig};
use crate::events::AppEvent;
use crate::gui::canvas::ParticleCanvas;
use crate::gui::theme::{self, ThemeColors};
use crate::gui::{view, window};
use gdk4 as gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use ringmotion::{
    EventKind, FrameClock, ItemLink, NavInput, NavKey, Point, Scene, Subscriptions, Viewport,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

pub struct AppModel {
    pub scene: Rc<RefCell<Scene>>,
    pub canvas: Rc<RefCell<ParticleCanvas>>,
    pub clock: Rc<RefCell<FrameClock>>,
    pub visible: bool,
    pub window: WindowConfig,
    pub particle_area: gtk::DrawingArea,
    pub ring_area: gtk::DrawingArea,
    pub subscriptions: Subscriptions,
    /// Particle orbits were sized for the allocated area, not the configured one.
    pub particles_seeded: bool,
}

#[derive(Debug, PartialEq)]
pub enum AppMsg {
    Show,
    Hide,
    Navigate(NavInput),
    Press(Point),
    Pointer(Option<Point>),
    Resize(i32, i32),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Show => AppMsg::Show,
            AppEvent::Hide => AppMsg::Hide,
            AppEvent::Navigate(input) => AppMsg::Navigate(input),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

fn attach_controller<W, C>(subs: &mut Subscriptions, kind: EventKind, widget: &W, controller: C)
where
    W: IsA<gtk::Widget>,
    C: IsA<gtk::EventController>,
{
    widget.add_controller(controller.clone());
    let widget = widget.clone().upcast::<gtk::Widget>();
    subs.add(kind, move || widget.remove_controller(&controller));
}

/// Window-wide key bindings.
fn key_message(key: gdk::Key) -> Option<AppMsg> {
    if key == gdk::Key::Right {
        Some(AppMsg::Navigate(NavInput::Key(NavKey::Right)))
    } else if key == gdk::Key::Left {
        Some(AppMsg::Navigate(NavInput::Key(NavKey::Left)))
    } else if key == gdk::Key::Escape {
        Some(AppMsg::Hide)
    } else {
        None
    }
}

fn open_link(link: &ItemLink) {
    log::info!("Opening {}", link);
    if let Err(e) = std::process::Command::new("xdg-open")
        .arg(link.as_str())
        .spawn()
    {
        log::error!("Failed to open '{}': {}", link, e);
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Scene, WindowConfig, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some(model.window.title.as_str()),
            set_default_size: (model.window.width, model.window.height),
            #[watch]
            set_visible: model.visible,
            add_css_class: "ringnav-window",

            #[name = "overlay"]
            gtk::Overlay {
                #[wrap(Some)]
                #[name = "particle_area"]
                set_child = &gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    set_can_target: false,
                    add_css_class: "ringnav-drawing-area",
                },

                #[name = "ring_area"]
                add_overlay = &gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    add_css_class: "ringnav-drawing-area",
                },

                add_overlay = &gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,
                    set_halign: gtk::Align::Center,
                    set_valign: gtk::Align::Start,
                    set_margin_top: 48,
                    set_spacing: 8,
                    set_can_target: false,

                    gtk::Label {
                        set_label: &model.window.title,
                        add_css_class: "ringnav-title",
                    },
                    gtk::Label {
                        set_label: &model.window.tagline.to_uppercase(),
                        add_css_class: "ringnav-tagline",
                    },
                },

                add_overlay = &gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_halign: gtk::Align::Center,
                    set_valign: gtk::Align::End,
                    set_margin_bottom: 40,
                    set_spacing: 16,

                    gtk::Button {
                        set_icon_name: "go-previous-symbolic",
                        set_focusable: false,
                        set_tooltip_text: Some("Previous"),
                        add_css_class: "ringnav-control",
                        connect_clicked => AppMsg::Navigate(NavInput::Prev),
                    },
                    gtk::Button {
                        set_icon_name: "go-next-symbolic",
                        set_focusable: false,
                        set_tooltip_text: Some("Next"),
                        add_css_class: "ringnav-control",
                        connect_clicked => AppMsg::Navigate(NavInput::Next),
                    },
                    gtk::Button {
                        set_label: "RESET",
                        set_focusable: false,
                        add_css_class: "ringnav-control",
                        connect_clicked => AppMsg::Navigate(NavInput::Reset),
                    },
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (scene, window_config, rx) = init;

        theme::load_css();
        if window_config.overlay {
            window::init_layer_shell(&root);
        }

        let model = AppModel {
            scene: Rc::new(RefCell::new(scene)),
            canvas: Rc::default(),
            clock: Rc::default(),
            // overlays wait for `ringnav show`
            visible: !window_config.overlay,
            window: window_config,
            particle_area: gtk::DrawingArea::default(),
            ring_area: gtk::DrawingArea::default(),
            subscriptions: Subscriptions::new(),
            particles_seeded: false,
        };

        let widgets = view_output!();

        let mut model = model;
        model.particle_area = widgets.particle_area.clone();
        model.ring_area = widgets.ring_area.clone();

        let canvas_draw = model.canvas.clone();
        widgets.particle_area.set_draw_func(move |_, cr, _, _| {
            if let Err(e) = canvas_draw.borrow().draw_onto(cr) {
                log::error!("Particle blit error: {}", e);
            }
        });

        let scene_draw = model.scene.clone();
        widgets.ring_area.set_draw_func(move |drawing_area, cr, _, _| {
            let style_context = drawing_area.style_context();
            let colors = ThemeColors::from_context(&style_context);
            if let Err(e) = view::draw(cr, &scene_draw.borrow(), &colors) {
                log::error!("Drawing error: {}", e);
            }
        });

        model.attach_listeners(&root, &sender, rx);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Show => {
                self.clock.borrow_mut().reset();
                self.visible = true;
            }
            AppMsg::Hide => {
                // a plain window has no way back from hidden
                if self.window.overlay {
                    self.visible = false;
                }
            }
            AppMsg::Navigate(input) => {
                if !self.visible {
                    return;
                }
                if self
                    .scene
                    .borrow_mut()
                    .handle(input, Instant::now())
                    .is_some()
                {
                    self.ring_area.queue_draw();
                }
            }
            AppMsg::Press(point) => self.press(point),
            AppMsg::Pointer(point) => {
                if self.scene.borrow_mut().hover(point) {
                    self.ring_area.queue_draw();
                }
            }
            AppMsg::Resize(width, height) => {
                let viewport = Viewport::new(width as f64, height as f64);
                let changed = {
                    let mut scene = self.scene.borrow_mut();
                    let changed = scene.resize(viewport);
                    if !self.particles_seeded {
                        scene.reseed_particles(&mut rand::rng());
                        self.particles_seeded = true;
                    }
                    changed
                };
                if changed || !self.canvas.borrow().is_available() {
                    self.canvas.borrow_mut().resize(width, height);
                }
                self.particle_area.queue_draw();
                self.ring_area.queue_draw();
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(config) => self.apply_config(config),
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }

    fn shutdown(&mut self, _widgets: &mut Self::Widgets, _output: relm4::Sender<Self::Output>) {
        self.subscriptions.clear();
    }
}

impl AppModel {
    /// Every listener goes through `subscriptions` so shutdown detaches all of them.
    fn attach_listeners(
        &mut self,
        root: &gtk::ApplicationWindow,
        sender: &ComponentSender<Self>,
        rx: async_channel::Receiver<AppEvent>,
    ) {
        let subs = &mut self.subscriptions;

        // one tick drives both the particle orbit and the ring spring
        let scene = self.scene.clone();
        let canvas = self.canvas.clone();
        let clock = self.clock.clone();
        let particle_area = self.particle_area.clone();
        let tick = self.ring_area.add_tick_callback(move |ring_area, frame_clock| {
            let dt = clock.borrow_mut().tick(frame_clock.frame_time());
            let mut scene = scene.borrow_mut();
            scene.tick(dt);
            if let Err(e) = canvas.borrow().paint(&scene) {
                log::error!("Particle drawing error: {}", e);
            }
            particle_area.queue_draw();
            ring_area.queue_draw();
            glib::ControlFlow::Continue
        });
        subs.add(EventKind::Frame, move || tick.remove());

        let s = sender.clone();
        let handler = self
            .ring_area
            .connect_resize(move |_, width, height| s.input(AppMsg::Resize(width, height)));
        let area = self.ring_area.clone();
        subs.add(EventKind::Resize, move || area.disconnect(handler));

        let scroll = gtk::EventControllerScroll::new(gtk::EventControllerScrollFlags::VERTICAL);
        let s = sender.clone();
        scroll.connect_scroll(move |_, _, dy| {
            s.input(AppMsg::Navigate(NavInput::Scroll { delta_y: dy }));
            glib::Propagation::Stop
        });
        attach_controller(subs, EventKind::Scroll, root, scroll);

        let keys = gtk::EventControllerKey::new();
        let s = sender.clone();
        // capture runs ahead of the window's own arrow-key focus bindings
        keys.set_propagation_phase(gtk::PropagationPhase::Capture);
        keys.connect_key_pressed(move |_, key, _, _| match key_message(key) {
            Some(msg) => {
                s.input(msg);
                glib::Propagation::Stop
            }
            None => glib::Propagation::Proceed,
        });
        attach_controller(subs, EventKind::Key, root, keys);

        let drag = gtk::GestureDrag::new();
        let s = sender.clone();
        drag.connect_drag_end(move |_, offset_x, _| {
            s.input(AppMsg::Navigate(NavInput::DragEnd { offset_x }));
        });
        attach_controller(subs, EventKind::Pointer, &self.ring_area, drag);

        let click = gtk::GestureClick::new();
        let s = sender.clone();
        click.connect_released(move |_, _, x, y| {
            s.input(AppMsg::Press(Point::new(x, y)));
        });
        attach_controller(subs, EventKind::Pointer, &self.ring_area, click);

        let motion = gtk::EventControllerMotion::new();
        let s = sender.clone();
        motion.connect_motion(move |_, x, y| {
            s.input(AppMsg::Pointer(Some(Point::new(x, y))));
        });
        let s = sender.clone();
        motion.connect_leave(move |_| s.input(AppMsg::Pointer(None)));
        attach_controller(subs, EventKind::Pointer, &self.ring_area, motion);

        let s = sender.clone();
        let bridge = relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                s.input(AppMsg::from(event));
            }
        });
        subs.add(EventKind::Control, move || bridge.abort());

        log::debug!("Listeners attached: {:?}", subs);
    }

    fn apply_config(&mut self, config: Config) {
        let items = match config.item_list() {
            Ok(items) => items,
            Err(e) => {
                log::error!("Keeping previous items: {}", e);
                return;
            }
        };

        {
            let mut scene = self.scene.borrow_mut();
            scene.replace_items(items);
            scene.apply_settings(config.scene, &mut rand::rng());
        }
        if config.window != self.window {
            log::warn!("Window settings changed, restart ringnav to apply them");
        }

        self.ring_area.queue_draw();
        log::info!("Configuration reloaded");
    }

    fn press(&mut self, point: Point) {
        let mut scene = self.scene.borrow_mut();
        let Some(index) = scene.hit_test(point) else {
            return;
        };

        if index == scene.active() {
            if let Some(link) = scene.active_item().and_then(|item| item.link.as_ref()) {
                open_link(link);
            }
            return;
        }

        if scene.handle(NavInput::Click(index), Instant::now()).is_some() {
            self.ring_area.queue_draw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys_navigate() {
        assert_eq!(
            key_message(gdk::Key::Right),
            Some(AppMsg::Navigate(NavInput::Key(NavKey::Right)))
        );
        assert_eq!(
            key_message(gdk::Key::Left),
            Some(AppMsg::Navigate(NavInput::Key(NavKey::Left)))
        );
        assert_eq!(key_message(gdk::Key::Escape), Some(AppMsg::Hide));
    }

    #[test]
    fn test_other_keys_pass_through() {
        assert_eq!(key_message(gdk::Key::Tab), None);
        assert_eq!(key_message(gdk::Key::space), None);
        assert_eq!(key_message(gdk::Key::Up), None);
    }
}
