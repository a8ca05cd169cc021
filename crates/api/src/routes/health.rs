use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whole seconds since the server started.
    pub uptime_secs: u64,
    /// Whether the database is reachable.
    pub db_healthy: bool,
}

/// Database section of the detailed report.
#[derive(Serialize)]
pub struct DatabaseHealth {
    pub driver: &'static str,
    pub healthy: bool,
    /// Round-trip time of `SELECT 1`, when it succeeded.
    pub latency_ms: Option<f64>,
    /// Whether this check ran a reconnect. A check that finds one already
    /// running reports the current state without waiting for it.
    pub reconnect_attempted: bool,
    pub error: Option<String>,
}

/// Payload storage section of the detailed report.
#[derive(Serialize)]
pub struct StorageHealth {
    pub path: String,
    pub accessible: bool,
}

#[derive(Serialize)]
pub struct DetailedHealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    pub started_at: avatar_core::types::Timestamp,
    pub database: DatabaseHealth,
    pub storage: StorageHealth,
    /// Stored avatars, when the database could be queried.
    pub avatar_count: Option<i64>,
}

/// GET /health -- returns service and database health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = state.store.database().health_check().await;

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started_at.elapsed().as_secs(),
        db_healthy,
    })
}

/// GET /health/detailed -- per-dependency report.
///
/// An unreachable database triggers one reconnect before reporting, unless
/// another request is already reconnecting.
async fn detailed_health(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    let db = state.store.database();

    let mut reconnect_attempted = false;
    let mut ping = db.ping().await;
    if let Err(err) = &ping {
        tracing::warn!(error = %err, "Health check failed, attempting reconnect");
        match db.try_reconnect().await {
            Ok(ran) => {
                reconnect_attempted = ran;
                ping = db.ping().await;
            }
            Err(err) => {
                reconnect_attempted = true;
                tracing::error!(error = %err, "Reconnect from health check failed");
            }
        }
    }

    let (healthy, latency_ms, error) = match ping {
        Ok(latency) => (true, Some(latency.as_secs_f64() * 1000.0), None),
        Err(err) => (false, None, Some(err.to_string())),
    };

    let avatar_count = if healthy {
        state.store.count().await.ok()
    } else {
        None
    };

    let files = state.store.files();
    let accessible = files.is_accessible().await;

    let status = if healthy && accessible { "ok" } else { "degraded" };

    Json(DetailedHealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started_at.elapsed().as_secs(),
        started_at: state.started_at_utc,
        database: DatabaseHealth {
            driver: db.driver().name(),
            healthy,
            latency_ms,
            reconnect_attempted,
            error,
        },
        storage: StorageHealth {
            path: files.root().display().to_string(),
            accessible,
        },
        avatar_count,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/detailed", get(detailed_health))
}
