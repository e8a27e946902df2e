//! HTTP surface: `GET /Ping` and `GET /Healthy`

use crate::config::Config;
use crate::error::{HeroError, HeroResult};
use crate::health::{HealthChecker, HealthReport};
use crate::secrets::{KeyVaultCli, SecretProvider, SecretStore};
use crate::tables::{TableStorageCli, TableStore};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Long-lived handles shared by every request
#[derive(Clone)]
pub struct AppState {
    pub health: Arc<HealthChecker>,
}

impl AppState {
    /// Build the Key Vault, Table Storage and cache handles once
    pub fn from_config(config: &Config) -> HeroResult<Self> {
        let vault: Arc<dyn SecretStore> = Arc::new(KeyVaultCli::from_config(config)?);
        let secrets = Arc::new(SecretProvider::new(vault, config.cache.mode));

        let tables: Option<Arc<dyn TableStore>> = if config.health.check_table_storage {
            let store = TableStorageCli::from_config(config)?;
            debug!("Table Storage check enabled for {}", store.host());
            Some(Arc::new(store))
        } else {
            None
        };

        let health = HealthChecker::new(
            secrets,
            tables,
            config.table_storage_host().unwrap_or_default(),
            config.health.clone(),
        );

        Ok(Self {
            health: Arc::new(health),
        })
    }
}

/// Build the router, mounting routes under `prefix` when it is not empty
pub fn router(state: AppState, prefix: &str) -> Router {
    let routes = Router::new()
        .route("/Ping", get(ping))
        .route("/Healthy", get(healthy))
        .with_state(state);

    match normalize_prefix(prefix) {
        Some(prefix) => Router::new().nest(&prefix, routes),
        None => routes,
    }
}

fn normalize_prefix(prefix: &str) -> Option<String> {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{}", trimmed))
    }
}

/// Simplest possible check: no dependencies, always succeeds
async fn ping() -> &'static str {
    "Pong"
}

async fn healthy(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = state.health.check().await;
    let status = if report.is_totally_healthy() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(report))
}

/// Bind and serve until Ctrl-C
pub async fn serve(config: &Config) -> HeroResult<()> {
    let state = AppState::from_config(config)?;
    let app = router(state, &config.server.route_prefix);

    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| HeroError::Bind {
            addr: addr.clone(),
            source: e,
        })?;

    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| HeroError::io("serving HTTP", e))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
