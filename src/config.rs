//! Application configuration.
//!
//! Read from an optional TOML file (`TARJETAS_CONFIG`, or
//! `<config dir>/tarjetas/config.toml`). `TARJETAS_SERVER_URL` overrides the
//! server address. Every key has a default, so no file is needed.

use crate::error::ConfigError;
use crate::models::DEFAULT_CARD_COUNT;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_PATH_ENV: &str = "TARJETAS_CONFIG";
pub const SERVER_URL_ENV: &str = "TARJETAS_SERVER_URL";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CategoryOption {
    /// Sent to the server as `categoria`.
    pub key: String,
    pub label: String,
}

impl CategoryOption {
    fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server_url: String,
    pub default_count: u32,
    pub request_timeout_secs: Option<u64>,
    /// Font with CJK glyphs; egui's bundled fonts have no kanji.
    pub cjk_font_path: Option<PathBuf>,
    pub categories: Vec<CategoryOption>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            default_count: DEFAULT_CARD_COUNT,
            request_timeout_secs: None,
            cjk_font_path: None,
            categories: vec![
                CategoryOption::new("verbo", "Verbos"),
                CategoryOption::new("adjetivo", "Adjetivos"),
                CategoryOption::new("adverbio", "Adverbios"),
                CategoryOption::new("jlpt", "JLPT N5"),
            ],
        }
    }
}

impl Config {
    /// Loads the config file (if any) and applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .or_else(default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => {
                log::info!("reading config from {}", path.display());
                Self::from_file(&path)?
            }
            _ => Self::default(),
        };

        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            config.apply_server_override(url);
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(contents)?;
        if config.default_count == 0 {
            config.default_count = DEFAULT_CARD_COUNT;
        }
        if config.categories.is_empty() {
            config.categories = Self::default().categories;
        }
        Ok(config)
    }

    pub fn apply_server_override(&mut self, url: String) {
        let url = url.trim();
        if !url.is_empty() {
            self.server_url = url.to_string();
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tarjetas").join("config.toml"))
}
