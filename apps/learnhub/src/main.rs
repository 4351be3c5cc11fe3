//! # Learnhub - Content Server
//!
//! The main binary for the Learnhub educational content hub.
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server on the seed dataset
//! learnhub server --host 0.0.0.0 --port 5000
//!
//! # Start from a snapshot written by `export`
//! learnhub server --data hub.json
//!
//! # Inspect and export
//! learnhub status --json-mode
//! learnhub export -o hub.json
//! ```

use clap::Parser;
use learnhub::cli;
use learnhub::config::{LogFormat, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Config decides the log format, so it is loaded before tracing exists.
    let config = match ServerConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format);

    if !cli.quiet {
        print_banner();
    }

    if let Err(e) = cli::execute(cli, config).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "learnhub=info,tower_http=debug".into());

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

fn print_banner() {
    println!(
        r#"
  _                          _           _
 | |    ___  __ _ _ __ _ __ | |__  _   _| |__
 | |   / _ \/ _` | '__| '_ \| '_ \| | | | '_ \
 | |__|  __/ (_| | |  | | | | | | | |_| | |_) |
 |_____\___|\__,_|_|  |_| |_|_| |_|\__,_|_.__/

  Content Server v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
