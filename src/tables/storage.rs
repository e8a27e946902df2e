//! Table Storage store using az CLI

use crate::config::Config;
use crate::error::{HeroError, HeroResult};
use crate::tables::TableStore;
use async_trait::async_trait;
use serde::Deserialize;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Table Storage account accessed with the az CLI login (`--auth-mode login`)
#[derive(Debug, Clone)]
pub struct TableStorageCli {
    account: String,
    host: String,
    subscription: Option<String>,
}

impl TableStorageCli {
    pub fn new(account: impl Into<String>, endpoint_suffix: &str, subscription: Option<String>) -> Self {
        let account = account.into();
        let host = format!("{}.table.{}", account, endpoint_suffix);
        Self {
            account,
            host,
            subscription,
        }
    }

    /// Build from configuration; the account name is required
    pub fn from_config(config: &Config) -> HeroResult<Self> {
        let account = config
            .table_storage
            .account
            .clone()
            .ok_or(HeroError::TableStorageNotConfigured)?;
        Ok(Self::new(
            account,
            &config.table_storage.endpoint_suffix,
            config.azure.subscription.clone(),
        ))
    }

    /// Endpoint host name, e.g. `account.table.core.windows.net`
    pub fn host(&self) -> &str {
        &self.host
    }

    fn exists_args<'a>(&'a self, table: &'a str) -> Vec<&'a str> {
        let mut args = vec![
            "storage",
            "table",
            "exists",
            "--name",
            table,
            "--account-name",
            self.account.as_str(),
            "--auth-mode",
            "login",
            "--output",
            "json",
        ];
        if let Some(subscription) = &self.subscription {
            args.extend(["--subscription", subscription.as_str()]);
        }
        args
    }
}

#[async_trait]
impl TableStore for TableStorageCli {
    async fn table_exists(&self, name: &str) -> HeroResult<bool> {
        debug!("Checking table {} on {}", name, self.host);

        let output = Command::new("az")
            .args(self.exists_args(name))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| HeroError::command_failed("az storage table exists", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("az login") || stderr.contains("not logged in") {
                return Err(HeroError::AzureNotAuthenticated);
            }
            return Err(HeroError::TableStorage(stderr.trim().to_string()));
        }

        parse_exists(&output.stdout)
    }
}

#[derive(Deserialize)]
struct ExistsResponse {
    exists: bool,
}

fn parse_exists(stdout: &[u8]) -> HeroResult<bool> {
    let response: ExistsResponse = serde_json::from_slice(stdout)
        .map_err(|e| HeroError::TableStorage(format!("Failed to parse response: {}", e)))?;
    Ok(response.exists)
}
