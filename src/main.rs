//! hero-api - Health-check API for the Hero function app
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use hero_api::cli::{Cli, Commands};
use hero_api::config::{Config, ConfigManager};
use hero_api::error::HeroResult;
use std::process::ExitCode;
use tracing::{debug, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Layer, Registry};

type FormatLayer = Box<dyn Layer<Registry> + Send + Sync>;
type FormatHandle = reload::Handle<FormatLayer, Registry>;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> HeroResult<()> {
    let cli = Cli::parse();
    let log_format = init_logging(&cli);

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };

    debug!("Using config file {}", config_manager.path().display());
    let config = config_manager.load_with_env().await?;
    apply_log_format(&log_format, &config);

    match cli.command {
        Commands::Serve(args) => hero_api::cli::commands::serve(args, &config).await,
        Commands::Health(args) => hero_api::cli::commands::health(args, &config).await,
        Commands::Secret(args) => hero_api::cli::commands::secret(args, &config).await,
        Commands::Config(args) => {
            hero_api::cli::commands::config(args, &config, &config_manager).await
        }
    }
}

fn init_logging(cli: &Cli) -> FormatHandle {
    // Serving defaults to info; one-shot commands stay quiet
    let base = match (cli.verbose, &cli.command) {
        (0, Commands::Serve(_)) => "info",
        (0, _) => "warn",
        (1, _) => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hero_api={}", base)));

    let text: FormatLayer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .boxed();
    let (format, handle) = reload::Layer::new(text);

    tracing_subscriber::registry()
        .with(format)
        .with(filter)
        .init();
    handle
}

/// Switch to the JSON formatter once the config says so
fn apply_log_format(handle: &FormatHandle, config: &Config) {
    if config.general.log_format != "json" {
        return;
    }
    let json: FormatLayer = fmt::layer().json().with_writer(std::io::stderr).boxed();
    if let Err(e) = handle.reload(json) {
        warn!("Keeping text log format: {}", e);
    }
}
