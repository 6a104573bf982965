//! Search engine gateway
//!
//! The place-resolution engine is an external collaborator. This module
//! defines the narrow contract the rest of the crate relies on:
//!
//! - `SearchEngine` / `EngineHandle`: initialise, search, generate, finalise,
//!   exchanging serialized answers as raw bytes
//! - `wire`: the only code that knows the serialized answer format
//! - `EngineSession`: scoped acquisition of a handle, finalised exactly once
//!
//! ## Flex Point
//! Adding a new engine backend requires:
//! 1. Create `src/engine/{backend_name}.rs` implementing `SearchEngine`
//! 2. Add `pub mod {backend_name};` below
//! 3. Register it in `get_engine` and `available_engines`

pub mod catalog;
pub mod remote;
pub mod session;
pub mod wire;

#[cfg(test)]
pub(crate) mod testing;

pub use session::EngineSession;

use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Kind of entity the engine resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceKind {
    /// Points of reference (airports, cities)
    Place,
}

impl PlaceKind {
    /// One-letter code used on the engine boundary
    pub fn as_char(&self) -> char {
        match self {
            Self::Place => 'P',
        }
    }
}

/// A resolved place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Short identifier (IATA-style code)
    pub code: String,

    /// Display name, when the engine knows one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub coordinates: Coordinates,

    /// The engine's corrected spelling of the query words matching this place
    pub corrected_keywords: Vec<String>,
}

impl Place {
    pub fn new(code: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            code: code.into(),
            name: None,
            coordinates: Coordinates::new(lat, lon),
            corrected_keywords: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.corrected_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }
}

/// Structured engine answer to a search or a random draw
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAnswer {
    pub ok: bool,

    /// Present iff `ok` is false
    pub error_message: Option<String>,

    pub places: Vec<Place>,

    /// Query words the engine could not resolve
    pub unmatched_keywords: Vec<String>,
}

impl QueryAnswer {
    /// A successful answer
    pub fn success(places: Vec<Place>, unmatched_keywords: Vec<String>) -> Self {
        Self {
            ok: true,
            error_message: None,
            places,
            unmatched_keywords,
        }
    }

    /// A failed answer carrying the engine's message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error_message: Some(message.into()),
            places: Vec::new(),
            unmatched_keywords: Vec::new(),
        }
    }
}

/// Settings handed to the engine on initialisation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EngineSettings {
    /// Location of the engine index
    pub index_path: PathBuf,

    /// SQL database type ("nodb", "sqlite", ...)
    pub db_type: String,

    /// SQL database connection string
    pub db_connection: String,

    /// Log file the engine writes to
    pub log_path: PathBuf,
}

/// A place-resolution engine
///
/// Implementations must be thread-safe (Send + Sync) to be shared by the
/// server; each request opens its own handle.
pub trait SearchEngine: Send + Sync {
    /// Returns the engine name (e.g., "catalog", "remote")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of this engine
    fn description(&self) -> &'static str;

    /// Open a handle on the engine
    fn initialize(&self, settings: &EngineSettings) -> Result<Box<dyn EngineHandle + '_>>;
}

/// An open engine handle
///
/// `search` and `generate_random` return the serialized answer; decode it
/// with `wire::parse_answer`.
pub trait EngineHandle: Send {
    /// Draw `count` distinct random entities
    fn generate_random(&mut self, kind: PlaceKind, count: usize) -> Result<Vec<u8>>;

    /// Resolve a UTF-8 encoded free-text query
    fn search(&mut self, kind: PlaceKind, query: &[u8]) -> Result<Vec<u8>>;

    /// Release engine resources
    fn finalize(&mut self);
}

/// Information about an engine backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineInfo {
    /// Engine name (used in config/API)
    pub name: String,
    /// Human-readable description
    pub description: String,
}

/// Get an engine by name, configured from `config`
pub fn get_engine(name: &str, config: &Config) -> Result<Box<dyn SearchEngine>> {
    match name {
        "catalog" => Ok(Box::new(catalog::CatalogEngine::new())),
        "remote" => Ok(Box::new(remote::RemoteEngine::new(
            &config.engine.remote_url,
            Duration::from_secs(config.engine.remote_timeout_secs),
        ))),
        _ => Err(Error::Config(format!("Unknown engine: {}", name))),
    }
}

/// List all available engines with their info
pub fn available_engines() -> Vec<EngineInfo> {
    vec![
        EngineInfo {
            name: "catalog".to_string(),
            description: "Local place catalog (CSV), exact code and name lookup".to_string(),
        },
        EngineInfo {
            name: "remote".to_string(),
            description: "Out-of-process search engine service over HTTP".to_string(),
        },
    ]
}
