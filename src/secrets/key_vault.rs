//! Key Vault secret store using az CLI

use crate::config::Config;
use crate::error::{HeroError, HeroResult};
use crate::secrets::SecretStore;
use async_trait::async_trait;
use serde::Deserialize;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Key Vault accessed through the signed-in az CLI session
#[derive(Debug, Clone)]
pub struct KeyVaultCli {
    vault: String,
    subscription: Option<String>,
}

impl KeyVaultCli {
    pub fn new(vault: impl Into<String>, subscription: Option<String>) -> Self {
        Self {
            vault: vault.into(),
            subscription,
        }
    }

    /// Build from configuration; the vault name is required
    pub fn from_config(config: &Config) -> HeroResult<Self> {
        let vault = config
            .key_vault
            .name
            .clone()
            .ok_or(HeroError::KeyVaultNotConfigured)?;
        Ok(Self::new(vault, config.azure.subscription.clone()))
    }

    /// Vault URI, `https://<name>.vault.azure.net`
    pub fn vault_uri(&self) -> String {
        format!("https://{}.vault.azure.net", self.vault)
    }

    fn show_args<'a>(&'a self, name: &'a str) -> Vec<&'a str> {
        let mut args = vec![
            "keyvault",
            "secret",
            "show",
            "--vault-name",
            self.vault.as_str(),
            "--name",
            name,
            "--output",
            "json",
        ];
        if let Some(subscription) = &self.subscription {
            args.extend(["--subscription", subscription.as_str()]);
        }
        args
    }

    fn classify_failure(&self, name: &str, stderr: &str) -> HeroError {
        if stderr.contains("az login") || stderr.contains("not logged in") {
            return HeroError::AzureNotAuthenticated;
        }
        if stderr.contains("SecretNotFound") || stderr.contains("was not found in this key vault")
        {
            return self.not_found(name);
        }
        HeroError::KeyVault(stderr.trim().to_string())
    }

    fn not_found(&self, name: &str) -> HeroError {
        HeroError::SecretNotFound {
            vault: self.vault.clone(),
            name: name.to_string(),
        }
    }

    fn parse_secret(&self, name: &str, stdout: &[u8]) -> HeroResult<String> {
        let response: SecretBundle = serde_json::from_slice(stdout).map_err(|e| {
            HeroError::KeyVault(format!("Failed to parse response: {}", e))
        })?;

        response.value.ok_or_else(|| self.not_found(name))
    }
}

#[async_trait]
impl SecretStore for KeyVaultCli {
    async fn get_secret(&self, name: &str) -> HeroResult<String> {
        debug!("Requesting secret {} from {}", name, self.vault_uri());

        let output = Command::new("az")
            .args(self.show_args(name))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| HeroError::command_failed("az keyvault secret show", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.classify_failure(name, &stderr));
        }

        self.parse_secret(name, &output.stdout)
    }

    fn store_name(&self) -> &str {
        &self.vault
    }
}

#[derive(Deserialize)]
struct SecretBundle {
    value: Option<String>,
}
