use anyhow::Context;
use clap::{Parser, Subcommand};
use relm4::prelude::*;
use ringmotion::{Scene, Viewport};
use ringnav::config;
use ringnav::events::ControlCommand;
use ringnav::gui::app::AppModel;
use ringnav::sys::{runtime, server};

#[derive(Parser, Debug)]
#[command(name = "ringnav", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Show the ring (overlay mode)
    Show,
    /// Hide the ring (overlay mode)
    Hide,
    /// Rotate to the next item
    Next,
    /// Rotate to the previous item
    Prev,
    /// Rotate back to the first item
    Reset,
    /// Jump to the item at INDEX (zero-based)
    Jump { index: usize },
    /// Write the default config file if none exists and print its path
    InitConfig,
}

impl Commands {
    fn control(&self) -> Option<ControlCommand> {
        match self {
            Self::Show => Some(ControlCommand::Show),
            Self::Hide => Some(ControlCommand::Hide),
            Self::Next => Some(ControlCommand::Next),
            Self::Prev => Some(ControlCommand::Prev),
            Self::Reset => Some(ControlCommand::Reset),
            Self::Jump { index } => Some(ControlCommand::Jump(*index)),
            Self::InitConfig => None,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        None => run(),
        Some(Commands::InitConfig) => {
            let path = config::write_default_config().context("Failed to write config")?;
            println!("{}", path.display());
            Ok(())
        }
        Some(command) => match command.control() {
            Some(control) => server::send_command(control),
            None => Ok(()),
        },
    }
}

fn run() -> anyhow::Result<()> {
    // first run drops the bundled defaults where the user can edit them
    if let Err(e) = config::write_default_config() {
        log::warn!("Could not write default config: {}", e);
    }

    let config = config::load_config().context("Failed to load configuration")?;
    let items = config
        .item_list()
        .context("Configuration does not describe a usable ring")?;

    let viewport = Viewport::new(config.window.width as f64, config.window.height as f64);
    let scene = Scene::new(items, viewport, config.scene, &mut rand::rng());

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx).context("Failed to start background services")?;

    let app = RelmApp::new("org.ringnav.ringnav").with_args(Vec::new());

    app.run::<AppModel>((scene, config.window, rx));
    Ok(())
}
