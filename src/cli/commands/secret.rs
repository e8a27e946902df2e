//! Secret command - fetch secrets through the cache

use crate::cli::args::SecretArgs;
use crate::config::Config;
use crate::error::HeroResult;
use crate::secrets::{KeyVaultCli, SecretProvider, SecretStore};
use console::style;
use std::sync::Arc;
use tracing::info;

/// Execute the secret command
pub async fn execute(args: SecretArgs, config: &Config) -> HeroResult<()> {
    let vault: Arc<dyn SecretStore> = Arc::new(KeyVaultCli::from_config(config)?);
    let secrets = SecretProvider::new(vault, config.cache.mode);

    let values = secrets.get_secrets(&args.names).await?;

    info!(
        "Fetched {} secret(s) from {}, {} distinct cached",
        values.len(),
        secrets.store_name(),
        secrets.cached_count()
    );

    for (name, value) in args.names.iter().zip(&values) {
        println!("{} {}", style(name).bold(), display_value(value, args.reveal));
    }

    Ok(())
}

fn display_value(value: &str, reveal: bool) -> String {
    if reveal {
        value.to_string()
    } else {
        format!("<{} chars>", value.chars().count())
    }
}
