//! Persisted viewer settings.
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

fn default_window_width() -> f32 {
    1024.0
}
fn default_window_height() -> f32 {
    720.0
}
fn default_ui_scale() -> f32 {
    1.0
}
fn default_log_lines() -> usize {
    500
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    /// Multiplier applied to the native pixels-per-point.
    #[serde(default = "default_ui_scale")]
    pub ui_scale: f32,
    /// Lines kept in the log panel.
    #[serde(default = "default_log_lines")]
    pub log_lines: usize,
    /// Directory the open dialog starts in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_directory: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            ui_scale: default_ui_scale(),
            log_lines: default_log_lines(),
            last_directory: None,
        }
    }
}

impl ViewerConfig {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lvlexplorer").join("config.toml"))
    }

    /// Load config from disk, or return default
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        let Ok(content) = fs::read_to_string(&path) else {
            debug!("no config at {}", path.display());
            return Self::default();
        };
        match Self::from_toml(&content) {
            Ok(config) => config,
            Err(err) => {
                warn!("ignoring invalid config {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save config to disk
    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            self.save_to(&path);
        }
    }

    fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                warn!("failed to create config directory {}: {}", parent.display(), err);
                return;
            }
        }
        match toml::to_string_pretty(self) {
            Ok(content) => {
                if let Err(err) = fs::write(path, content) {
                    warn!("failed to write config {}: {}", path.display(), err);
                }
            }
            Err(err) => warn!("failed to serialize config: {}", err),
        }
    }
}
