//! Stack service entry point.
//!
//! Initializes logging, loads configuration, creates the shared stack, and
//! serves the HTTP API until the process is stopped.

use std::env;
use std::sync::Arc;

use tokio::sync::RwLock;

use lib_stack::BoundedStack;
use stackd::config::{load_configuration, CliArgs};
use stackd::server::HttpServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_cli_args();

    // Initialize logging
    let filter = env::var("RUST_LOG").unwrap_or_else(|_| args.log_level.clone());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load and validate configuration
    let config = load_configuration(&args)?;

    let stack = Arc::new(RwLock::new(BoundedStack::<i32>::new(
        config.default_capacity,
    )));

    let server = HttpServer::new(stack);
    let listener = HttpServer::bind(&config).await?;
    server.run(listener).await
}

/// Parse command-line arguments.
fn parse_cli_args() -> CliArgs {
    let args: Vec<String> = env::args().collect();

    let mut port = None;
    let mut capacity = None;
    let mut log_level = "info".to_string();

    // Simple argument parser
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    if let Ok(parsed) = args[i + 1].parse() {
                        port = Some(parsed);
                    }
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--capacity" => {
                if i + 1 < args.len() {
                    if let Ok(parsed) = args[i + 1].parse() {
                        capacity = Some(parsed);
                    }
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--log-level" => {
                if i + 1 < args.len() {
                    log_level = args[i + 1].clone();
                    i += 2;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }

    CliArgs {
        port,
        capacity,
        log_level,
    }
}
