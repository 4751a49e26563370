//! Entry point for the **splitwm** window manager.
//!
//! Loads the configuration, takes over the X display, and processes events
//! on the main thread until a quit shortcut fires or a fatal error occurs.

use log::{error, info};
use splitwm::config::Config;
use splitwm::manager::Manager;
use splitwm::spawn::ProcessSpawner;

/// Resolve the config directory (`$XDG_CONFIG_HOME/splitwm`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("splitwm")
}

/// Try to load the config from `$XDG_CONFIG_HOME/splitwm/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

fn main() {
    env_logger::init();

    let config = load_config();
    if let Err(e) = config.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    let shortcuts = config.shortcut_table();
    let backend = match splitwm::x11::connect(&shortcuts) {
        Ok(b) => b,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    info!(
        "{} workspace(s), {} shortcut(s)",
        config.tiling.workspaces,
        shortcuts.len()
    );

    let mut events = backend.events;
    let mut manager = Manager::new(
        &config,
        backend.screen,
        backend.display,
        backend.keys,
        ProcessSpawner,
    );

    if let Err(e) = manager.run(&mut events) {
        error!("{}", e);
        std::process::exit(1);
    }
}
