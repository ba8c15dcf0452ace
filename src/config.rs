use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::system::window::DEFAULT_CAPACITY;

const MIN_REFRESH_RATE_MS: u64 = 200;

/// Shortest sampling period accepted. sysinfo cannot compute CPU usage over
/// anything shorter than `MINIMUM_CPU_UPDATE_INTERVAL`.
pub fn min_refresh_period() -> Duration {
    Duration::from_millis(MIN_REFRESH_RATE_MS).max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub colors: ColorsConfig,
    pub keybinds: KeybindsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub refresh_rate_ms: u64,
    pub window_capacity: usize,
    pub disk_path: PathBuf,
    pub log_file: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            refresh_rate_ms: 2000,
            window_capacity: DEFAULT_CAPACITY,
            disk_path: PathBuf::from("/"),
            log_file: None,
        }
    }
}

impl GeneralConfig {
    pub fn refresh_period(&self) -> Duration {
        Duration::from_millis(self.refresh_rate_ms).max(min_refresh_period())
    }

    pub fn window_capacity(&self) -> usize {
        self.window_capacity.max(1)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub theme: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        ColorsConfig {
            theme: "dark".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeybindsConfig {
    pub quit: String,
    pub kill: String,
    pub force_kill: String,
    pub filter: String,
    pub help: String,
    pub refresh: String,
}

impl Default for KeybindsConfig {
    fn default() -> Self {
        KeybindsConfig {
            quit: "q".to_string(),
            kill: "k".to_string(),
            force_kill: "K".to_string(),
            filter: "/".to_string(),
            help: "?".to_string(),
            refresh: "r".to_string(),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("hostmon").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}
