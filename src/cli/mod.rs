//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod search;
pub mod serve;
pub mod status;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Travel place search: free text to airports, itineraries and distances
#[derive(Parser)]
#[command(name = "trep-search")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a query into places and an itinerary
    Search(search::SearchArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Show engine/server status
    Status(status::StatusArgs),
}

/// Initialize logging, `RUST_LOG` overriding `default_filter`
///
/// Logs go to stderr so command output on stdout stays clean.
pub(crate) fn init_logging(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => search::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
        Commands::Status(args) => status::run(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "trep-search", "search", "nce", "sfo", "-z", "3", "--map-type", "terrain", "-f", "gpx",
        ])
        .unwrap();

        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.query, vec!["nce", "sfo"]);
                assert_eq!(args.zoom.as_deref(), Some("3"));
                assert_eq!(args.map_type.as_deref(), Some("terrain"));
                assert_eq!(args.format.as_deref(), Some("gpx"));
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_directives_conflict() {
        assert!(Cli::try_parse_from(["trep-search", "search", "--airport", "--itinerary"]).is_err());
        assert!(Cli::try_parse_from(["trep-search", "search", "--airport", "nce"]).is_err());
    }
}
