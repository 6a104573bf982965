//! trep-search CLI entry point
//!
//! Travel place search - CLI + web app

use trep_search::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
