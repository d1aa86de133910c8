//! Binary crate for the `weatherchat` HTTP service.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Logging setup
//! - Interactive configuration
//! - Serving the router from `weatherchat_server`

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

const DEFAULT_LOG_FILTER: &str =
    "weatherchat=info,weatherchat_server=info,weatherchat_core=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` may carry RUST_LOG, so it has to be loaded before the filter is built.
    let env_file = dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(log_filter("RUST_LOG"))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(path) = env_file {
        info!(path = %path.display(), "Loaded environment file");
    }

    let cmd = cli::Cli::parse();
    cmd.run().await
}

fn log_filter(var: &str) -> EnvFilter {
    EnvFilter::try_from_env(var).unwrap_or_else(|_| DEFAULT_LOG_FILTER.into())
}
