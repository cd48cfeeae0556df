use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use ringmotion::{Item, ItemError, ItemList, SceneSettings};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub tagline: String,
    pub width: i32,
    pub height: i32,
    pub overlay: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Ring of Ideas".to_string(),
            tagline: "Scroll or click to rotate".to_string(),
            width: 1280,
            height: 800,
            overlay: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub scene: SceneSettings,
    #[serde(default)]
    pub window: WindowConfig,
}

impl Config {
    pub fn item_list(&self) -> Result<ItemList, ItemError> {
        ItemList::new(self.items.clone())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid item list: {0}")]
    Items(#[from] ItemError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "ringnav", "ringnav").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

fn build(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();
    builder = match path {
        Some(p) => builder.add_source(config::File::from(p).required(true)),
        None => builder.add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        )),
    };

    let s = builder
        .add_source(config::Environment::with_prefix("RINGNAV").separator("__"))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Loads the user's config file. Falls back to the bundled defaults when no
/// file exists yet. The item list is validated so an empty or malformed ring
/// is rejected here rather than at draw time.
pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;
    let config = if config_path.exists() {
        log::info!("Loading config from {}", config_path.display());
        build(Some(&config_path))?
    } else {
        log::info!(
            "No config at {}, using built-in defaults",
            config_path.display()
        );
        build(None)?
    };
    config.item_list()?;
    Ok(config)
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
