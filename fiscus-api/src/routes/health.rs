/// Liveness and store connectivity probe
///
/// `GET /health` is public and always answers 200; the body says whether the
/// database responded to a ping, so a watchdog can tell a healthy instance
/// from one that lost its store without treating the probe itself as failed.
use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use fiscus_shared::db::pool;
use serde::{Deserialize, Serialize};

/// Body of the `/health` probe
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: String,

    /// Application version
    pub version: String,

    /// `connected` or `disconnected`
    pub database: String,
}

/// Answers the probe, pinging the database through the shared pool helper
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let db_ok = pool::health_check(&state.db).await.is_ok();

    let (status, database) = if db_ok {
        ("healthy", "connected")
    } else {
        ("degraded", "disconnected")
    };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    }))
}
