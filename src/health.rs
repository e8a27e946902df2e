//! Health report for the `/Healthy` endpoint
//!
//! Each dependency check turns its own failure into a `false` flag so the
//! report is always produced. Table Storage checking and DNS resolution are
//! off unless enabled in `[health]`.

use crate::config::schema::HealthConfig;
use crate::dns;
use crate::secrets::SecretProvider;
use crate::tables::TableStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Health of the service and its dependencies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// The HTTP host itself is serving requests
    pub asp_net_core_healthy: bool,
    pub table_storage_healthy: bool,
    pub key_vault_healthy: bool,
    /// Storage host name, or its resolved addresses when DNS resolution is on
    pub table_storage_ip: String,
}

impl Default for HealthReport {
    fn default() -> Self {
        Self {
            asp_net_core_healthy: true,
            table_storage_healthy: false,
            key_vault_healthy: false,
            table_storage_ip: String::new(),
        }
    }
}

impl HealthReport {
    pub fn is_totally_healthy(&self) -> bool {
        self.asp_net_core_healthy && self.table_storage_healthy && self.key_vault_healthy
    }
}

/// Runs the dependency checks behind `/Healthy`
pub struct HealthChecker {
    secrets: Arc<SecretProvider>,
    tables: Option<Arc<dyn TableStore>>,
    storage_host: String,
    settings: HealthConfig,
}

impl HealthChecker {
    /// `tables` is only consulted when `settings.check_table_storage` is set
    pub fn new(
        secrets: Arc<SecretProvider>,
        tables: Option<Arc<dyn TableStore>>,
        storage_host: impl Into<String>,
        settings: HealthConfig,
    ) -> Self {
        Self {
            secrets,
            tables,
            storage_host: storage_host.into(),
            settings,
        }
    }

    /// Produce a fresh report
    pub async fn check(&self) -> HealthReport {
        let mut report = HealthReport::default();

        if self.settings.check_table_storage {
            report.table_storage_healthy = self.check_table_storage().await;
        }
        report.key_vault_healthy = self.check_key_vault().await;
        report.table_storage_ip = self.storage_address().await;

        info!(
            key_vault = report.key_vault_healthy,
            table_storage = report.table_storage_healthy,
            "Health check complete"
        );
        report
    }

    async fn check_table_storage(&self) -> bool {
        let Some(tables) = &self.tables else {
            warn!("Table Storage check enabled but no account is configured");
            return false;
        };

        match tables.table_exists(&self.settings.table_name).await {
            Ok(exists) => exists,
            Err(e) => {
                error!("Table storage related error during health check: {}", e);
                false
            }
        }
    }

    async fn check_key_vault(&self) -> bool {
        match self
            .secrets
            .secrets_exist(&self.settings.required_secrets)
            .await
        {
            Ok(flags) => flags.iter().all(|exists| *exists),
            Err(e) => {
                error!("Key Vault related error during health check: {}", e);
                false
            }
        }
    }

    async fn storage_address(&self) -> String {
        if !self.settings.resolve_dns || self.storage_host.is_empty() {
            return self.storage_host.clone();
        }

        match dns::resolve(&self.storage_host).await {
            Ok(addrs) => addrs,
            Err(e) => {
                warn!("{}; reporting host name instead", e);
                self.storage_host.clone()
            }
        }
    }
}
