//! Error types for hero-api
//!
//! All modules use `HeroResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for hero-api operations
pub type HeroResult<T> = Result<T, HeroError>;

/// All errors that can occur in hero-api
#[derive(Error, Debug)]
pub enum HeroError {
    // Environment errors
    #[error("Required CLI not found: {name}. {hint}")]
    CliNotFound { name: String, hint: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Invalid value for {key}: {reason}")]
    ConfigValue { key: String, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Key Vault name not configured. Set KeyVaultName or [key_vault] name")]
    KeyVaultNotConfigured,

    #[error("Table Storage account not configured. Set TableStorageAccountName or [table_storage] account")]
    TableStorageNotConfigured,

    // Azure errors
    #[error("Azure not authenticated. Run: az login")]
    AzureNotAuthenticated,

    #[error("Secret not found in {vault}: {name}")]
    SecretNotFound { vault: String, name: String },

    #[error("Key Vault error: {0}")]
    KeyVault(String),

    #[error("Table Storage error: {0}")]
    TableStorage(String),

    // Network errors
    #[error("DNS resolution failed for {host}: {reason}")]
    DnsResolution { host: String, reason: String },

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

impl HeroError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error; a missing executable maps to `CliNotFound`
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        let command = command.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            let name = command
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string();
            return Self::CliNotFound {
                name,
                hint: "Install the Azure CLI: https://aka.ms/installazurecli".to_string(),
            };
        }
        Self::CommandFailed { command, source }
    }

    /// True when the remote store answered that the item does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SecretNotFound { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::AzureNotAuthenticated => Some("Run: az login"),
            Self::CliNotFound { .. } => Some("Install from https://aka.ms/installazurecli"),
            Self::KeyVaultNotConfigured => Some("Run: hero-api config set key_vault.name <vault>"),
            Self::TableStorageNotConfigured => {
                Some("Run: hero-api config set table_storage.account <account>")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = HeroError::SecretNotFound {
            vault: "hero-kv".to_string(),
            name: "DataStorageConnectionString".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Secret not found in hero-kv: DataStorageConnectionString"
        );
    }

    #[test]
    fn error_hint() {
        assert_eq!(HeroError::AzureNotAuthenticated.hint(), Some("Run: az login"));
        assert!(HeroError::User("boom".to_string()).hint().is_none());
    }

    #[test]
    fn missing_binary_becomes_cli_not_found() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = HeroError::command_failed("az keyvault secret show", source);
        match err {
            HeroError::CliNotFound { name, .. } => assert_eq!(name, "az"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn other_spawn_errors_keep_command() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = HeroError::command_failed("az account show", source);
        assert!(err.to_string().contains("az account show"));
    }

    #[test]
    fn not_found_classification() {
        let missing = HeroError::SecretNotFound {
            vault: "v".to_string(),
            name: "n".to_string(),
        };
        assert!(missing.is_not_found());
        assert!(!HeroError::KeyVault("throttled".to_string()).is_not_found());
    }
}
