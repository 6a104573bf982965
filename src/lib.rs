//! trep-search: travel place search
//!
//! A library, web service and CLI that resolves free-text travel queries
//! ("nce sfo", "rio de janeiro", "JFK CDG Tokyo") into places through a
//! pluggable search engine, then builds the itinerary between them with
//! great-circle distances.
//!
//! ## Features
//!
//! - Scoped engine sessions, finalized exactly once
//! - CSV catalog engine and remote HTTP engine backends
//! - Random airport / itinerary draws
//! - JSON, text, GPX and map URL output
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use trep_search::engine::catalog::{CatalogEngine, CatalogEntry};
//! use trep_search::engine::EngineSettings;
//! use trep_search::query::{MapDefaults, RequestParams};
//!
//! let engine = CatalogEngine::from_entries(vec![
//!     CatalogEntry::new("NCE", "Nice", 43.6584, 7.2159),
//!     CatalogEntry::new("SFO", "San Francisco", 37.6213, -122.3790),
//! ]);
//!
//! let params = RequestParams::for_query("nce sfo", &MapDefaults::default());
//! let response = trep_search::search::run(&engine, &EngineSettings::default(), &params).unwrap();
//!
//! assert_eq!(response.nb_of_places, 2);
//! println!("{} km", response.dist_total);
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod engine;
pub mod error;
pub mod format;
pub mod itinerary;
pub mod query;
pub mod search;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use coord::Coordinates;
pub use engine::{Place, QueryAnswer, SearchEngine};
pub use error::{Error, Result};
pub use search::SearchResponse;
