//! Server shared state
//!
//! Holds configuration and the search engine shared by all requests.

use crate::config::Config;
use crate::engine::{get_engine, EngineSettings, SearchEngine};
use crate::error::Result;
use crate::query::MapDefaults;
use std::sync::Arc;

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration
    pub config: Config,

    /// Engine used by every request; each request opens its own handle
    engine: Arc<dyn SearchEngine>,

    /// Settings handed to the engine on every initialisation
    settings: EngineSettings,

    /// Map values applied before request parameters
    map_defaults: MapDefaults,
}

impl AppState {
    /// Create new application state with the engine named in the config
    pub fn new(config: Config) -> Result<Self> {
        let engine: Arc<dyn SearchEngine> = Arc::from(get_engine(&config.engine.backend, &config)?);
        Ok(Self::with_engine(config, engine))
    }

    /// Create new application state around a given engine
    pub fn with_engine(config: Config, engine: Arc<dyn SearchEngine>) -> Self {
        let settings = config.engine_settings();
        let map_defaults = config.map_defaults();
        Self {
            config,
            engine,
            settings,
            map_defaults,
        }
    }

    /// Get the search engine
    pub fn engine(&self) -> Arc<dyn SearchEngine> {
        Arc::clone(&self.engine)
    }

    /// Get the engine initialisation settings
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Get the map defaults
    pub fn map_defaults(&self) -> &MapDefaults {
        &self.map_defaults
    }
}
