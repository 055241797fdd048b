//! Configuration handling for the editor and the overlap endpoint.
//!
//! Settings live in `config.toml` under the platform config directory. A
//! missing file is created with the defaults on first load.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::error::ConfigError;
use crate::geometry::{ReferenceSpace, BORDER_SIZE, CANVAS_HEIGHT, CANVAS_WIDTH};

const APP_DIR: &str = "smash-waldo";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Logical canvas grid, independent of the displayed size.
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub border_size: f64,
    pub stroke_color: [u8; 3],
    /// Undo steps kept before the oldest is dropped.
    pub history_limit: usize,
    pub store_name: String,
    pub reference_width: f64,
    pub reference_height: f64,
    pub server_addr: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        let reference = ReferenceSpace::default();
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            border_size: BORDER_SIZE,
            stroke_color: [0xa3, 0xe6, 0x35],
            history_limit: 100,
            store_name: "canvas-store".to_string(),
            reference_width: reference.width,
            reference_height: reference.height,
            server_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl EditorConfig {
    /// Get the path to the configuration file
    pub fn get_config_path() -> PathBuf {
        let config_dir = if let Some(config_dir) = dirs::config_dir() {
            config_dir.join(APP_DIR)
        } else {
            PathBuf::from(".config").join(APP_DIR)
        };

        config_dir.join("config.toml")
    }

    /// Where the shape list is persisted between sessions.
    pub fn store_path(&self) -> PathBuf {
        let data_dir = if let Some(data_dir) = dirs::data_dir() {
            data_dir.join(APP_DIR)
        } else {
            PathBuf::from(".local/share").join(APP_DIR)
        };

        data_dir.join(format!("{}.json", self.store_name))
    }

    pub fn reference_space(&self) -> ReferenceSpace {
        ReferenceSpace {
            width: self.reference_width,
            height: self.reference_height,
        }
    }

    pub fn load_from_file() -> Result<Self, ConfigError> {
        Self::load_from(&Self::get_config_path())
    }

    /// Load configuration from `path`, writing the defaults there if absent
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let default_config = Self::default();
                default_config.save_to(path)?;
                Ok(default_config)
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = EditorConfig::load_from(&path).unwrap();
        assert_eq!(config, EditorConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "border_size = 8.0\nhistory_limit = 10\n").unwrap();

        let config = EditorConfig::load_from(&path).unwrap();
        assert_eq!(config.border_size, 8.0);
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.canvas_width, 1280.0);
        assert_eq!(config.store_name, "canvas-store");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "border_size = \"wide\"").unwrap();

        assert!(matches!(
            EditorConfig::load_from(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn store_file_is_named_after_store() {
        let config = EditorConfig::default();
        assert!(config.store_path().ends_with("smash-waldo/canvas-store.json"));
    }
}
