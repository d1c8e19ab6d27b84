use crate::config;
use crate::events::AppEvent;
use crate::gui::scheduler::GtkScheduler;
use crate::gui::theme;
use crate::sys::assets::ChannelFetcher;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use spinwheel::error::AssetError;
use spinwheel::{AssetUrl, Outcome, Wake, WheelConfig, WheelEngine};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

const IDLE_TEXT: &str = "Press Space to spin";
const SPIN_KEYS: [gtk::gdk::Key; 3] = [
    gtk::gdk::Key::space,
    gtk::gdk::Key::Return,
    gtk::gdk::Key::KP_Enter,
];

pub struct AppInit {
    pub config: WheelConfig,
    pub config_path: PathBuf,
    pub seed: Option<u64>,
    pub rx: async_channel::Receiver<AppEvent>,
    pub fetch_tx: async_channel::Sender<AssetUrl>,
}

pub struct AppModel {
    pub engine: Rc<RefCell<WheelEngine<GtkScheduler>>>,
    pub spinning: bool,
    pub last_outcome: String,
    pub config_path: PathBuf,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Spin,
    Wake(Wake),
    Announced(Outcome),
    AssetLoaded {
        url: AssetUrl,
        result: Result<Vec<u8>, AssetError>,
    },
    ConfigReload,
    Quit,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Spin => AppMsg::Spin,
            AppEvent::AssetLoaded { url, result } => AppMsg::AssetLoaded { url, result },
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

fn describe(outcome: &Outcome) -> String {
    if outcome.label.trim().is_empty() {
        outcome.id.to_string()
    } else {
        outcome.label.clone()
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Spin Wheel"),
            set_default_size: (560, 640),

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Quit);
                        return glib::Propagation::Stop;
                    }
                    if SPIN_KEYS.contains(&key) {
                        sender.input(AppMsg::Spin);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_spacing: 12,
                set_margin_all: 12,

                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    set_content_width: 480,
                    set_content_height: 480,
                    add_css_class: "spinwheel-drawing-area",
                },

                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 12,
                    set_halign: gtk::Align::Center,

                    gtk::Button {
                        set_label: "Spin",
                        add_css_class: "spinwheel-spin-button",
                        add_css_class: "suggested-action",
                        #[watch]
                        set_sensitive: !model.spinning,
                        connect_clicked => AppMsg::Spin,
                    },

                    gtk::Label {
                        add_css_class: "spinwheel-outcome",
                        #[watch]
                        set_label: &model.last_outcome,
                    },
                },
            },
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let AppInit {
            config,
            config_path,
            seed,
            rx,
            fetch_tx,
        } = init;

        theme::load_css();

        let wake_sender = sender.clone();
        let scheduler = GtkScheduler::new(root.clone(), move |wake| {
            wake_sender.input(AppMsg::Wake(wake));
        });
        let outcome_sender = sender.clone();
        let mut engine = WheelEngine::new(config, scheduler, move |outcome: &Outcome| {
            outcome_sender.input(AppMsg::Announced(outcome.clone()));
        })
        .with_fetcher(Box::new(ChannelFetcher::new(fetch_tx)));
        if let Some(seed) = seed {
            engine = engine.with_seed(seed);
        }

        let model = AppModel {
            engine: Rc::new(RefCell::new(engine)),
            spinning: false,
            last_outcome: IDLE_TEXT.to_string(),
            config_path,
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let engine_draw = model.engine.clone();
        widgets
            .drawing_area
            .set_draw_func(move |_, cr, width, height| {
                let Ok(mut engine) = engine_draw.try_borrow_mut() else {
                    return;
                };
                if let Err(e) = engine.paint(cr, width as f64, height as f64, Instant::now()) {
                    log::error!("Drawing error: {}", e);
                }
            });

        // bulbs, rainbow borders and the pointer spring animate even when idle
        widgets.drawing_area.add_tick_callback(|area, _| {
            area.queue_draw();
            glib::ControlFlow::Continue
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Spin => {
                if self.engine.borrow_mut().spin(Instant::now()).is_some() {
                    self.spinning = true;
                    self.last_outcome = "Spinning\u{2026}".to_string();
                }
            }
            AppMsg::Wake(wake) => {
                let mut engine = self.engine.borrow_mut();
                engine.wake(wake, Instant::now());
                if !engine.is_spinning() {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Announced(outcome) => {
                self.spinning = false;
                self.last_outcome = describe(&outcome);
            }
            AppMsg::AssetLoaded { url, result } => {
                if self.engine.borrow_mut().asset_loaded(&url, result) {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::ConfigReload => match config::load_config(&self.config_path) {
                Ok(new_config) => {
                    if self.engine.borrow_mut().reconfigure(new_config) {
                        self.drawing_area.queue_draw();
                        log::info!("Configuration reloaded");
                    }
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppMsg::Quit => {
                self.engine.borrow_mut().dispose();
                relm4::main_application().quit();
            }
        }
    }

    fn shutdown(&mut self, _widgets: &mut Self::Widgets, _output: relm4::Sender<Self::Output>) {
        self.engine.borrow_mut().dispose();
    }
}
