//! Configuration schema for hero-api
//!
//! Configuration is stored at `~/.config/hero-api/config.toml`. The app
//! settings used by the Functions host (`KeyVaultName`,
//! `TableStorageAccountName`, `FUNCTIONS_CUSTOMHANDLER_PORT`) override the
//! file when present.

use crate::cache::LoadMode;
use crate::error::{HeroError, HeroResult};
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// HTTP listener settings
    pub server: ServerConfig,

    /// Shared Azure CLI settings
    pub azure: AzureConfig,

    /// Key Vault settings
    pub key_vault: KeyVaultConfig,

    /// Table Storage settings
    pub table_storage: TableStorageConfig,

    /// Health endpoint behavior
    pub health: HealthConfig,

    /// Secret cache settings
    pub cache: CacheConfig,
}

impl Config {
    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> HeroResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn apply_overrides<F>(&mut self, lookup: F) -> HeroResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("KeyVaultName").filter(|v| !v.is_empty()) {
            self.key_vault.name = Some(name);
        }
        if let Some(account) = lookup("TableStorageAccountName").filter(|v| !v.is_empty()) {
            self.table_storage.account = Some(account);
        }
        if let Some(port) = lookup("FUNCTIONS_CUSTOMHANDLER_PORT") {
            self.server.port = port.trim().parse().map_err(|_| HeroError::ConfigValue {
                key: "FUNCTIONS_CUSTOMHANDLER_PORT".to_string(),
                reason: format!("'{}' is not a valid port", port),
            })?;
        }
        if let Some(value) = lookup("HERO_CHECK_TABLE_STORAGE") {
            self.health.check_table_storage = parse_bool("HERO_CHECK_TABLE_STORAGE", &value)?;
        }
        if let Some(value) = lookup("HERO_RESOLVE_DNS") {
            self.health.resolve_dns = parse_bool("HERO_RESOLVE_DNS", &value)?;
        }
        Ok(())
    }

    /// Host name of the Table Storage endpoint, if an account is configured
    pub fn table_storage_host(&self) -> Option<String> {
        self.table_storage.account.as_ref().map(|account| {
            format!(
                "{}.table.{}",
                account, self.table_storage.endpoint_suffix
            )
        })
    }
}

/// Parse a boolean setting, accepting the usual spellings
pub fn parse_bool(key: &str, value: &str) -> HeroResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(HeroError::ConfigValue {
            key: key.to_string(),
            reason: format!("'{}' is not a boolean", value),
        }),
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub bind: String,

    /// Port to listen on
    pub port: u16,

    /// Prefix for every route, e.g. "/api" behind the Functions host
    pub route_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 7071,
            route_prefix: String::new(),
        }
    }
}

/// Azure CLI settings shared by Key Vault and Table Storage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureConfig {
    /// Azure subscription ID
    pub subscription: Option<String>,
}

/// Key Vault settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyVaultConfig {
    /// Vault name (`<name>.vault.azure.net`)
    pub name: Option<String>,
}

/// Table Storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableStorageConfig {
    /// Storage account name
    pub account: Option<String>,

    /// DNS suffix of the storage endpoint
    pub endpoint_suffix: String,
}

impl Default for TableStorageConfig {
    fn default() -> Self {
        Self {
            account: None,
            endpoint_suffix: "core.windows.net".to_string(),
        }
    }
}

/// Health endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Query Table Storage for `table_name` (disabled in production)
    pub check_table_storage: bool,

    /// Resolve the storage host to IP addresses instead of echoing it
    pub resolve_dns: bool,

    /// Table whose existence marks Table Storage healthy
    pub table_name: String,

    /// Secrets that must exist for Key Vault to count as healthy
    pub required_secrets: Vec<String>,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            check_table_storage: false,
            resolve_dns: false,
            table_name: "data".to_string(),
            required_secrets: vec!["DataStorageConnectionString".to_string()],
        }
    }
}

/// Secret cache settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// "single-flight" (default) or "racy"
    pub mode: LoadMode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[server]"));
        assert!(toml.contains("[health]"));
        assert!(toml.contains("mode = \"single-flight\""));
    }

    #[test]
    fn config_deserializes_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 7071);
        assert!(!config.health.check_table_storage);
        assert_eq!(config.health.table_name, "data");
    }

    #[test]
    fn config_deserializes_partial() {
        let toml = r#"
            [key_vault]
            name = "hero-kv"

            [cache]
            mode = "racy"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.key_vault.name.as_deref(), Some("hero-kv"));
        assert_eq!(config.cache.mode, LoadMode::Racy);
        assert_eq!(config.table_storage.endpoint_suffix, "core.windows.net"); // default preserved
    }

    #[test]
    fn app_settings_override_file() {
        let mut config = Config::default();
        let env = vars(&[
            ("KeyVaultName", "prod-kv"),
            ("TableStorageAccountName", "herodata"),
            ("FUNCTIONS_CUSTOMHANDLER_PORT", "40123"),
            ("HERO_RESOLVE_DNS", "yes"),
        ]);

        config.apply_overrides(|k| env.get(k).cloned()).unwrap();

        assert_eq!(config.key_vault.name.as_deref(), Some("prod-kv"));
        assert_eq!(config.server.port, 40123);
        assert!(config.health.resolve_dns);
        assert!(!config.health.check_table_storage);
        assert_eq!(
            config.table_storage_host().as_deref(),
            Some("herodata.table.core.windows.net")
        );
    }

    #[test]
    fn empty_app_setting_is_ignored() {
        let mut config = Config::default();
        config.key_vault.name = Some("from-file".to_string());
        let env = vars(&[("KeyVaultName", "")]);

        config.apply_overrides(|k| env.get(k).cloned()).unwrap();

        assert_eq!(config.key_vault.name.as_deref(), Some("from-file"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut config = Config::default();
        let env = vars(&[("FUNCTIONS_CUSTOMHANDLER_PORT", "http")]);

        let err = config.apply_overrides(|k| env.get(k).cloned()).unwrap_err();

        assert!(err.to_string().contains("FUNCTIONS_CUSTOMHANDLER_PORT"));
    }

    #[test]
    fn parse_bool_spellings() {
        assert!(parse_bool("k", "ON").unwrap());
        assert!(!parse_bool("k", "0").unwrap());
        assert!(parse_bool("k", "maybe").is_err());
    }

    #[test]
    fn no_account_means_no_host() {
        assert!(Config::default().table_storage_host().is_none());
    }
}
