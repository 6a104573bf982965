//! Search command handler
//!
//! Resolves a query (or a random draw) against the configured engine and
//! prints the result in the requested format.

use crate::cli::init_logging;
use crate::config::Config;
use crate::constants::params;
use crate::engine::get_engine;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter};
use crate::query::{MapDefaults, ParamSource, RequestParams};
use crate::search;
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Query words: place codes or names, in itinerary order
    pub query: Vec<String>,

    /// Resolve one randomly drawn place
    #[arg(long, conflicts_with_all = ["query", "itinerary"])]
    pub airport: bool,

    /// Resolve a random itinerary of three places
    #[arg(long, conflicts_with_all = ["query", "airport"])]
    pub itinerary: bool,

    /// Map zoom level
    #[arg(long, short = 'z')]
    pub zoom: Option<String>,

    /// Map type (ROADMAP, SATELLITE, HYBRID, TERRAIN)
    #[arg(long)]
    pub map_type: Option<String>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Search engine backend
    #[arg(long, short = 'e')]
    pub engine: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

impl SearchArgs {
    /// The arguments as request parameters, like the index route receives them
    fn param_source(&self) -> ParamSource {
        let mut source = ParamSource::new();

        if self.airport {
            source.insert(params::SHOW_AIRPORT.to_string(), String::new());
        } else if self.itinerary {
            source.insert(params::SHOW_ITINERARY.to_string(), String::new());
        } else if !self.query.is_empty() {
            source.insert(params::QUERY.to_string(), self.query.join(" "));
        }

        if let Some(zoom) = &self.zoom {
            source.insert(params::ZOOM_LEVEL.to_string(), zoom.clone());
        }
        if let Some(map_type) = &self.map_type {
            source.insert(params::MAP_TYPE.to_string(), map_type.clone());
        }

        source
    }

    /// Normalize the arguments on top of the configured map defaults
    pub fn request_params(&self, defaults: &MapDefaults) -> RequestParams {
        RequestParams::from_sources(&[&self.param_source()], defaults)
    }
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    init_logging("warn");

    let config = Config::load()?;
    let request = args.request_params(&config.map_defaults());
    if request.is_empty() {
        return Err(Error::InvalidParameter(
            "No query given: pass place codes or names, --airport or --itinerary".to_string(),
        ));
    }

    let format = args.format.clone().unwrap_or(config.defaults.format.clone());
    let formatter = get_formatter(&format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;

    let engine_name = args.engine.clone().unwrap_or(config.engine.backend.clone());
    let engine = get_engine(&engine_name, &config)?;
    let settings = config.engine_settings();

    let response = tokio::task::spawn_blocking(move || {
        search::run(engine.as_ref(), &settings, &request)
    })
    .await
    .map_err(|e| Error::Server(format!("Search task failed: {}", e)))??;

    let output = formatter.format(&response, &config)?;

    if let Some(path) = args.output {
        std::fs::write(&path, &output)?;
        eprintln!("Output written to {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}
