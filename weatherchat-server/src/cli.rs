use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{CustomType, Password, PasswordDisplayMode};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use weatherchat_core::{Config, WeatherChat};
use weatherchat_server::{AppState, create_router};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weatherchat",
    version,
    about = "Weather questions answered in natural language",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub serve: ServeArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server (default).
    Serve(ServeArgs),

    /// Store API keys and the listen port in the config file.
    Configure {
        /// Config file to write instead of the platform default.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct ServeArgs {
    /// Listen port; overrides the config file and $PORT.
    #[arg(long)]
    pub port: Option<u16>,

    /// Config file to read instead of the platform default.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Serve(args)) => serve(args).await,
            Some(Command::Configure { config }) => configure(config),
            None => serve(self.serve).await,
        }
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    config.apply_env();
    if let Some(port) = args.port {
        config.port = port;
    }

    for name in config.missing_secrets() {
        warn!("{name} is not set; requests depending on it will fail");
    }

    let state = AppState::new(WeatherChat::from_config(&config));
    let router = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener =
        TcpListener::bind(addr).await.with_context(|| format!("Failed to bind {addr}"))?;

    info!(
        %addr,
        model = %config.gemini.model,
        language = %config.openweather.language,
        "Server listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn configure(path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = match &path {
        Some(path) => Config::load_or_default(path)?,
        None => Config::load()?,
    };

    let gemini = prompt_secret("Gemini API key", config.gemini_api_key.is_some())?;
    if let Some(key) = gemini {
        config.gemini_api_key = Some(key);
    }

    let openweather = prompt_secret("OpenWeather API key", config.openweather_api_key.is_some())?;
    if let Some(key) = openweather {
        config.openweather_api_key = Some(key);
    }

    config.port = CustomType::<u16>::new("Listen port:")
        .with_default(config.port)
        .with_error_message("Please enter a valid port number")
        .prompt()?;

    let saved_to = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };

    println!("Configuration saved to {}", saved_to.display());
    Ok(())
}

/// Ask for a secret. Empty input keeps the stored value, if any.
fn prompt_secret(label: &str, has_existing: bool) -> anyhow::Result<Option<String>> {
    let message = if has_existing {
        format!("{label} (leave empty to keep the current one):")
    } else {
        format!("{label}:")
    };

    let value = Password::new(&message)
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?;

    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_serves() {
        let cli = Cli::try_parse_from(["weatherchat", "--port", "8080"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.serve.port, Some(8080));
    }

    #[test]
    fn serve_subcommand_takes_config() {
        let cli =
            Cli::try_parse_from(["weatherchat", "serve", "--config", "/tmp/wc.toml"]).unwrap();
        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.config, Some(PathBuf::from("/tmp/wc.toml")));
                assert_eq!(args.port, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn serve_flags_before_subcommand_are_rejected() {
        assert!(Cli::try_parse_from(["weatherchat", "--port", "9000", "serve"]).is_err());
        assert!(Cli::try_parse_from(["weatherchat", "--config", "a.toml", "configure"]).is_err());

        let cli = Cli::try_parse_from(["weatherchat", "serve", "--port", "9000"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Serve(ServeArgs { port: Some(9000), .. }))));
    }

    #[test]
    fn configure_subcommand_parses() {
        let cli = Cli::try_parse_from(["weatherchat", "configure"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Configure { config: None })));
    }
}
