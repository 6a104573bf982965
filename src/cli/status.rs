//! Status command handler
//!
//! Shows whether the configured engine initializes and, optionally, whether
//! the server is up.

use crate::config::Config;
use crate::engine::{get_engine, EngineSession};
use crate::error::{Error, Result};
use clap::Args;

/// Status command arguments
#[derive(Args)]
pub struct StatusArgs {
    /// Check a specific engine backend
    #[arg(long, short = 'e')]
    pub engine: Option<String>,

    /// Check if server is running (tries to connect)
    #[arg(long)]
    pub server: bool,
}

/// Run the status command
pub async fn run(args: StatusArgs) -> Result<()> {
    let config = Config::load()?;

    // Check server status if requested
    if args.server {
        check_server_status(&config).await;
    }

    let engine_name = args.engine.unwrap_or(config.engine.backend.clone());
    let engine = get_engine(&engine_name, &config)?;

    println!("trep-search v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("Engine: {} ({})", engine.name(), engine.description());
    println!("  Index: {}", config.engine.index_path);
    if engine.name() == "remote" {
        println!("  URL: {}", config.engine.remote_url);
    }

    let settings = config.engine_settings();
    let check = tokio::task::spawn_blocking(move || {
        EngineSession::open(engine.as_ref(), &settings).map(EngineSession::close)
    })
    .await
    .map_err(|e| Error::Server(format!("Engine check failed: {}", e)))?;

    match check {
        Ok(()) => println!("  Status: READY"),
        Err(e) => println!("  Status: UNAVAILABLE ({})", e),
    }

    Ok(())
}

/// Check if the server is running
async fn check_server_status(config: &Config) {
    let url = format!("http://{}/api/status", config.server_addr());

    match reqwest::get(&url).await {
        Ok(response) => {
            if response.status().is_success() {
                println!("Server: RUNNING on {}", config.server_addr());
                if let Ok(body) = response.text().await {
                    if let Ok(status) = serde_json::from_str::<serde_json::Value>(&body) {
                        if let Some(version) = status.get("version").and_then(|v| v.as_str()) {
                            println!("  Version: {}", version);
                        }
                        if let Some(engine) = status.get("engine").and_then(|v| v.as_str()) {
                            println!("  Engine: {}", engine);
                        }
                        if let Some(ready) = status.get("engine_ready").and_then(|v| v.as_bool()) {
                            println!("  Engine ready: {}", ready);
                        }
                    }
                }
            } else {
                println!("Server: ERROR (status {})", response.status());
            }
        }
        Err(_) => {
            println!("Server: NOT RUNNING on {}", config.server_addr());
        }
    }
    println!();
}
