//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/trep-search/config.toml

pub mod defaults;

use crate::coord::Coordinates;
use crate::engine::EngineSettings;
use crate::error::{Error, Result};
use crate::query::{MapDefaults, MapType};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Search engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Default values for requests and output
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// URL generation settings
    #[serde(default)]
    pub url: UrlConfig,
}

/// Search engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Engine backend name ("catalog" or "remote")
    #[serde(default = "default_engine")]
    pub backend: String,

    /// Location of the engine index
    #[serde(default = "default_index_path")]
    pub index_path: String,

    /// SQL database type
    #[serde(default = "default_db_type")]
    pub db_type: String,

    /// SQL database connection string
    #[serde(default = "default_db_connection")]
    pub db_connection: String,

    /// Log file the engine writes to
    #[serde(default = "default_log_path")]
    pub log_path: String,

    /// Base URL of the remote engine service
    #[serde(default = "default_remote_url")]
    pub remote_url: String,

    /// Remote engine request timeout in seconds
    #[serde(default = "default_remote_timeout")]
    pub remote_timeout_secs: u64,
}

/// Default values for requests and output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default map zoom level
    #[serde(default = "default_zoom_level")]
    pub zoom_level: i32,

    /// Default map type
    #[serde(default = "default_map_type")]
    pub map_type: String,

    /// Default CLI output format
    #[serde(default = "default_format")]
    pub format: String,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// URL generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

// Default value functions for serde
fn default_engine() -> String {
    DEFAULT_ENGINE.to_string()
}
fn default_index_path() -> String {
    DEFAULT_INDEX_PATH.to_string()
}
fn default_db_type() -> String {
    DEFAULT_DB_TYPE.to_string()
}
fn default_db_connection() -> String {
    DEFAULT_DB_CONNECTION.to_string()
}
fn default_log_path() -> String {
    DEFAULT_LOG_PATH.to_string()
}
fn default_remote_url() -> String {
    DEFAULT_REMOTE_URL.to_string()
}
fn default_remote_timeout() -> u64 {
    DEFAULT_REMOTE_TIMEOUT_SECS
}
fn default_zoom_level() -> i32 {
    DEFAULT_ZOOM_LEVEL
}
fn default_map_type() -> String {
    DEFAULT_MAP_TYPE.to_string()
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/@?api=1&map_action=map&center={lat},{lon}&zoom={zoom}&basemap={basemap}"
            .to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/#map={zoom}/{lat}/{lon}".to_string(),
    );
    providers.insert(
        "apple".to_string(),
        "https://maps.apple.com/?ll={lat},{lon}&z={zoom}".to_string(),
    );
    providers
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            defaults: DefaultsConfig::default(),
            server: ServerConfig::default(),
            url: UrlConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: default_engine(),
            index_path: default_index_path(),
            db_type: default_db_type(),
            db_connection: default_db_connection(),
            log_path: default_log_path(),
            remote_url: default_remote_url(),
            remote_timeout_secs: default_remote_timeout(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            zoom_level: default_zoom_level(),
            map_type: default_map_type(),
            format: default_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["engine", "backend"] => Some(self.engine.backend.clone()),
            ["engine", "index_path"] => Some(self.engine.index_path.clone()),
            ["engine", "db_type"] => Some(self.engine.db_type.clone()),
            ["engine", "db_connection"] => Some(self.engine.db_connection.clone()),
            ["engine", "log_path"] => Some(self.engine.log_path.clone()),
            ["engine", "remote_url"] => Some(self.engine.remote_url.clone()),
            ["engine", "remote_timeout_secs"] => {
                Some(self.engine.remote_timeout_secs.to_string())
            }

            ["defaults", "zoom_level"] => Some(self.defaults.zoom_level.to_string()),
            ["defaults", "map_type"] => Some(self.defaults.map_type.clone()),
            ["defaults", "format"] => Some(self.defaults.format.clone()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["url", "default"] => Some(self.url.default.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["engine", "backend"] => {
                self.engine.backend = value.to_string();
            }
            ["engine", "index_path"] => {
                self.engine.index_path = value.to_string();
            }
            ["engine", "db_type"] => {
                self.engine.db_type = value.to_string();
            }
            ["engine", "db_connection"] => {
                self.engine.db_connection = value.to_string();
            }
            ["engine", "log_path"] => {
                self.engine.log_path = value.to_string();
            }
            ["engine", "remote_url"] => {
                self.engine.remote_url = value.to_string();
            }
            ["engine", "remote_timeout_secs"] => {
                self.engine.remote_timeout_secs = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid timeout value: {}", value))
                })?;
            }

            ["defaults", "zoom_level"] => {
                self.defaults.zoom_level = MapDefaults::parse_zoom(value)
                    .map_err(|e| Error::Config(e.to_string()))?;
            }
            ["defaults", "map_type"] => {
                let map_type: MapType = value
                    .parse()
                    .map_err(|e: Error| Error::Config(e.to_string()))?;
                self.defaults.map_type = map_type.to_string();
            }
            ["defaults", "format"] => {
                self.defaults.format = value.to_string();
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid port value: {}", value))
                })?;
            }

            ["url", "default"] => {
                self.url.default = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "engine.backend",
            "engine.index_path",
            "engine.db_type",
            "engine.db_connection",
            "engine.log_path",
            "engine.remote_url",
            "engine.remote_timeout_secs",
            "defaults.zoom_level",
            "defaults.map_type",
            "defaults.format",
            "server.host",
            "server.port",
            "url.default",
        ]
    }

    /// Settings handed to the engine on initialisation
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            index_path: PathBuf::from(&self.engine.index_path),
            db_type: self.engine.db_type.clone(),
            db_connection: self.engine.db_connection.clone(),
            log_path: PathBuf::from(&self.engine.log_path),
        }
    }

    /// Map display defaults applied before any request parameter
    ///
    /// A hand-edited, unrecognised map type falls back to HYBRID.
    pub fn map_defaults(&self) -> MapDefaults {
        let map_type = self.defaults.map_type.parse().unwrap_or_else(|_| {
            warn!(
                "Ignoring unknown map type in config: {}",
                self.defaults.map_type
            );
            MapType::default()
        });

        MapDefaults {
            zoom_level: MapDefaults::clamp_zoom(self.defaults.zoom_level),
            map_type,
        }
    }

    /// Format a map URL using the specified provider
    ///
    /// Replaces {lat}, {lon}, {zoom} and {basemap} placeholders
    pub fn format_url(
        &self,
        provider: Option<&str>,
        center: Coordinates,
        zoom_level: i32,
        map_type: MapType,
    ) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat}", &center.lat.to_string())
            .replace("{lon}", &center.lon.to_string())
            .replace("{zoom}", &zoom_level.to_string())
            .replace("{basemap}", map_type.basemap()))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
