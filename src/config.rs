use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::controller::Timings;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_loading_delay_ms")]
    pub loading_delay_ms: u64,
    #[serde(default = "default_flip_anim_ms")]
    pub flip_anim_ms: u64,
    #[serde(default = "default_swipe_anim_ms")]
    pub swipe_anim_ms: u64,
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default = "default_deck")]
    pub default_deck: String,
    #[serde(default = "default_decks_dir")]
    pub decks_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_loading_delay_ms() -> u64 {
    800
}
fn default_flip_anim_ms() -> u64 {
    240
}
fn default_swipe_anim_ms() -> u64 {
    280
}
fn default_deck() -> String {
    "japanese-greetings".to_string()
}
fn default_decks_dir() -> String {
    data_dir().join("decks").to_string_lossy().to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

/// `<data_dir>/deckr`, falling back to the working directory.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("deckr")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            loading_delay_ms: default_loading_delay_ms(),
            flip_anim_ms: default_flip_anim_ms(),
            swipe_anim_ms: default_swipe_anim_ms(),
            shuffle: false,
            default_deck: default_deck(),
            decks_dir: default_decks_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("deckr")
            .join("config.toml")
    }

    pub fn timings(&self) -> Timings {
        Timings {
            loading_delay: Duration::from_millis(self.loading_delay_ms),
            flip: Duration::from_millis(self.flip_anim_ms),
            swipe: Duration::from_millis(self.swipe_anim_ms),
        }
    }

    pub fn decks_dir(&self) -> PathBuf {
        PathBuf::from(&self.decks_dir)
    }
}
