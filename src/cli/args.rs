//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// hero-api - Health-check API for the Hero function app
///
/// Serves /Ping and /Healthy, backed by Key Vault and Table Storage
/// through the signed-in Azure CLI.
#[derive(Parser, Debug)]
#[command(name = "hero-api")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "HERO_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run the health check once and print the report
    Health(HealthArgs),

    /// Fetch secrets from Key Vault through the secret cache
    Secret(SecretArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port to listen on (overrides config and FUNCTIONS_CUSTOMHANDLER_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Route prefix, e.g. /api
    #[arg(long)]
    pub route_prefix: Option<String>,
}

/// Arguments for the health command
#[derive(Parser, Debug)]
pub struct HealthArgs {
    /// Print the raw JSON report
    #[arg(long)]
    pub json: bool,

    /// Also check Table Storage
    #[arg(long)]
    pub check_tables: bool,

    /// Resolve the storage host to IP addresses
    #[arg(long)]
    pub resolve_dns: bool,
}

/// Arguments for the secret command
#[derive(Parser, Debug)]
pub struct SecretArgs {
    /// Secret names
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Print secret values instead of their lengths
    #[arg(long)]
    pub reveal: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., key_vault.name)
        key: String,
        /// Value to set
        value: String,
    },
}
