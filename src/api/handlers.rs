//! API Handlers
//!
//! HTTP request handlers for each gateway endpoint. Cache operations go
//! through a client proxy bound to the path's namespace.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::client::CacheClient;
use crate::config::GatewayConfig;
use crate::coordinator::Coordinator;
use crate::error::{CacheError, Result};
use crate::host::HostProcess;
use crate::models::{
    validate_namespace, AckResponse, GetResponse, HealthResponse, KeyPath, SetRequest,
    StatsResponse,
};
use crate::protocol::OptionOverrides;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The worker process the gateway runs in
    pub host: Arc<HostProcess>,
    /// Coordinator handle, read for statistics
    pub coordinator: Arc<Coordinator>,
    pub config: GatewayConfig,
}

impl AppState {
    pub fn new(host: Arc<HostProcess>, coordinator: Arc<Coordinator>, config: GatewayConfig) -> Self {
        Self {
            host,
            coordinator,
            config,
        }
    }

    fn client(&self, namespace: &str) -> Result<CacheClient> {
        CacheClient::new(&self.host, self.config.client_config(namespace))
    }
}

fn check_key(path: &KeyPath) -> Result<()> {
    match path.validate() {
        Some(message) => Err(CacheError::InvalidRequest(message)),
        None => Ok(()),
    }
}

/// Handler for PUT /ns/:namespace/:key
pub async fn set_handler(
    State(state): State<AppState>,
    Path(path): Path<KeyPath>,
    Json(req): Json<SetRequest>,
) -> Result<Json<AckResponse>> {
    check_key(&path)?;

    let overrides = req.ttl.map(OptionOverrides::ttl).unwrap_or_default();
    state
        .client(&path.namespace)?
        .set_with(path.key.clone(), req.value, overrides)
        .await?;

    Ok(Json(AckResponse::set(path.namespace, path.key)))
}

/// Handler for GET /ns/:namespace/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(path): Path<KeyPath>,
) -> Result<Json<GetResponse>> {
    check_key(&path)?;

    match state.client(&path.namespace)?.get(path.key.clone()).await? {
        Some(value) => Ok(Json(GetResponse::new(path.namespace, path.key, value))),
        None => Err(CacheError::NotFound(path.key)),
    }
}

/// Handler for DELETE /ns/:namespace/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(path): Path<KeyPath>,
) -> Result<Json<AckResponse>> {
    check_key(&path)?;

    state
        .client(&path.namespace)?
        .delete(path.key.clone())
        .await?;

    Ok(Json(AckResponse::deleted(path.namespace, path.key)))
}

/// Handler for DELETE /ns/:namespace
pub async fn clear_handler(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> Result<Json<AckResponse>> {
    if let Some(message) = validate_namespace(&namespace) {
        return Err(CacheError::InvalidRequest(message));
    }

    state.client(&namespace)?.clear().await?;

    Ok(Json(AckResponse::cleared(namespace)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.coordinator.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
