//! Launcher settings, read from a TOML file
//!
//! ```toml
//! scene = "levels/deck.bin"
//! tileset = "tilesets/deck.tset"
//! log_filter = "levelrun=debug"
//! inventory_capacity = 8
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::inventory::DEFAULT_CAPACITY;

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_inventory_capacity() -> usize {
    DEFAULT_CAPACITY
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Scene blob; the built-in scene is used when absent or invalid
    #[serde(default)]
    pub scene: Option<PathBuf>,
    /// Tileset blob; the built-in tileset is used when absent
    #[serde(default)]
    pub tileset: Option<PathBuf>,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default = "default_inventory_capacity")]
    pub inventory_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            scene: None,
            tileset: None,
            log_filter: default_log_filter(),
            inventory_capacity: default_inventory_capacity(),
        }
    }
}

impl Settings {
    pub fn from_toml(text: &str) -> Result<Settings, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Settings, ConfigError> {
        let text = fs::read_to_string(path)?;
        Settings::from_toml(&text)
    }
}
