//! Config command - show or edit configuration

use crate::cache::LoadMode;
use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::schema::parse_bool;
use crate::config::{Config, ConfigManager};
use crate::error::{HeroError, HeroResult};
use console::{style, Emoji};

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "[OK] ");
static WARN: Emoji<'_, '_> = Emoji("⚠ ", "[WARN] ");

const VALID_KEYS: &[&str] = &[
    "general.log_format",
    "server.bind",
    "server.port",
    "server.route_prefix",
    "azure.subscription",
    "key_vault.name",
    "table_storage.account",
    "table_storage.endpoint_suffix",
    "health.check_table_storage",
    "health.resolve_dns",
    "health.table_name",
    "health.required_secrets",
    "cache.mode",
];

/// Execute the config command
pub async fn execute(args: ConfigArgs, config: &Config, manager: &ConfigManager) -> HeroResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => {
            // Edit the file as written, without environment overrides
            let mut stored = manager.load().await?;
            set_value(&mut stored, &key, &value)?;
            manager.save(&stored).await?;
            println!("{} Set {} = {}", CHECK, key, value);
        }
    }

    Ok(())
}

fn show_config(config: &Config) -> HeroResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> HeroResult<()> {
    let path = manager.path();

    if path.exists() && !force {
        println!(
            "{} Config already exists at {} {}",
            WARN,
            path.display(),
            style("(use --force to overwrite)").dim()
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    println!(
        "{} Configuration initialized at {}",
        CHECK,
        style(path.display()).bold()
    );

    Ok(())
}

/// Set a dot-separated key on `config`
fn set_value(config: &mut Config, key: &str, value: &str) -> HeroResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => match value {
            "text" | "json" => config.general.log_format = value.to_string(),
            _ => return Err(invalid(key, "expected text or json")),
        },

        ["server", "bind"] => config.server.bind = value.to_string(),
        ["server", "port"] => {
            config.server.port = value.parse().map_err(|_| invalid(key, "expected a port number"))?
        }
        ["server", "route_prefix"] => config.server.route_prefix = value.to_string(),

        ["azure", "subscription"] => config.azure.subscription = optional(value),
        ["key_vault", "name"] => config.key_vault.name = optional(value),
        ["table_storage", "account"] => config.table_storage.account = optional(value),
        ["table_storage", "endpoint_suffix"] => {
            config.table_storage.endpoint_suffix = value.to_string()
        }

        ["health", "check_table_storage"] => {
            config.health.check_table_storage = parse_bool(key, value)?
        }
        ["health", "resolve_dns"] => config.health.resolve_dns = parse_bool(key, value)?,
        ["health", "table_name"] => config.health.table_name = value.to_string(),
        ["health", "required_secrets"] => {
            config.health.required_secrets = value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        ["cache", "mode"] => {
            config.cache.mode = match value {
                "single-flight" => LoadMode::SingleFlight,
                "racy" => LoadMode::Racy,
                _ => return Err(invalid(key, "expected single-flight or racy")),
            }
        }

        _ => {
            return Err(HeroError::User(format!(
                "Unknown config key: {}. Valid keys: {}",
                key,
                VALID_KEYS.join(", ")
            )))
        }
    }

    Ok(())
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn invalid(key: &str, reason: &str) -> HeroError {
    HeroError::ConfigValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn set_known_keys() {
        let mut config = Config::default();

        set_value(&mut config, "key_vault.name", "hero-kv").unwrap();
        set_value(&mut config, "server.port", "8080").unwrap();
        set_value(&mut config, "health.check_table_storage", "true").unwrap();
        set_value(&mut config, "health.required_secrets", "A, B,,C").unwrap();
        set_value(&mut config, "cache.mode", "racy").unwrap();

        assert_eq!(config.key_vault.name.as_deref(), Some("hero-kv"));
        assert_eq!(config.server.port, 8080);
        assert!(config.health.check_table_storage);
        assert_eq!(config.health.required_secrets, vec!["A", "B", "C"]);
        assert_eq!(config.cache.mode, LoadMode::Racy);
    }

    #[test]
    fn empty_value_clears_optional_key() {
        let mut config = Config::default();
        config.azure.subscription = Some("sub".to_string());

        set_value(&mut config, "azure.subscription", "").unwrap();

        assert!(config.azure.subscription.is_none());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut config = Config::default();
        let err = set_value(&mut config, "vm.name", "x").unwrap_err();
        assert!(err.to_string().contains("Unknown config key: vm.name"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = Config::default();
        assert!(set_value(&mut config, "server.port", "seventy").is_err());
        assert!(set_value(&mut config, "cache.mode", "lazy").is_err());
        assert!(set_value(&mut config, "general.log_format", "xml").is_err());
    }

    #[tokio::test]
    async fn init_does_not_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[key_vault]\nname = \"keep-me\"\n").unwrap();
        let manager = ConfigManager::with_path(path);

        init_config(&manager, false).await.unwrap();
        let loaded = manager.load().await.unwrap();
        assert_eq!(loaded.key_vault.name.as_deref(), Some("keep-me"));

        init_config(&manager, true).await.unwrap();
        let loaded = manager.load().await.unwrap();
        assert!(loaded.key_vault.name.is_none());
    }
}
