//! SmartSearch Relay Server
//!
//! Same-origin relay in front of the SmartSearch RAG service.

use clap::Parser;
use smartsearch_core::{init_logging, LoggingConfig, SearchConfig};
use smartsearch_relay::server::RelayServerBuilder;
use std::path::PathBuf;

/// SmartSearch relay - forwards text and file queries to the RAG service
#[derive(Parser)]
#[command(name = "smartsearch-relay")]
#[command(about = "Relay server for the SmartSearch RAG service")]
#[command(version)]
struct Args {
    /// Server host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Upstream origin to forward to
    #[arg(long)]
    upstream: Option<String>,

    /// Configuration file path (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable development mode
    #[arg(long)]
    dev: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Load environment variables before anything reads them
    dotenvy::dotenv().ok();

    let logging = LoggingConfig::default().with_level(&args.log_level);
    if let Err(e) = init_logging(&logging) {
        eprintln!("failed to initialize logging: {}", e);
    }

    // Layering: config file, then environment, then command line flags
    let search = match &args.config {
        Some(path) => match SearchConfig::from_file(path) {
            Ok(mut search) => {
                search.apply_env_overrides();
                search
            }
            Err(e) => {
                eprintln!("failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut search = SearchConfig::default();
            search.apply_env_overrides();
            search
        }
    };

    let mut builder = RelayServerBuilder::new()
        .host(args.host)
        .port(args.port)
        .dev_mode(args.dev)
        .search_config(search);

    if let Some(upstream) = args.upstream {
        builder = builder.upstream_origin(upstream);
    }

    let server = match builder.build() {
        Ok(server) => server,
        Err(e) => {
            eprintln!("failed to build server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.start().await {
        eprintln!("server failed: {}", e);
        std::process::exit(1);
    }
}
