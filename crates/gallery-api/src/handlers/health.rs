//! Health check handlers and response types.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Key looked up to prove the storage backend answers; it is never written.
const STORAGE_PROBE_KEY: &str = "health-check-non-existent-key";

async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthCheckResponse {
    pub status: String,
    pub database: String,
    pub storage: String,
    /// Configured storage backend (`local` or `s3`)
    pub storage_backend: String,
}

/// Database and storage health.
///
/// Returns 503 when the database is unreachable; a failing storage backend only
/// marks the service as degraded.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service healthy or degraded", body = HealthCheckResponse),
        (status = 503, description = "Database unavailable", body = HealthCheckResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let pool = state.pool.clone();
    let database = run_check(
        CHECK_TIMEOUT,
        async move { sqlx::query("SELECT 1").execute(&pool).await.map(drop) },
        "unhealthy",
    )
    .await;
    if database != "healthy" {
        tracing::error!(database = %database, "Database health check failed");
    }

    let storage = state.storage.clone();
    let storage_status = run_check(
        CHECK_TIMEOUT,
        async move { storage.exists(STORAGE_PROBE_KEY).await.map(drop) },
        "degraded",
    )
    .await;
    if storage_status != "healthy" {
        tracing::warn!(storage = %storage_status, "Storage health check failed");
    }

    let database_healthy = database == "healthy";
    let status = if database_healthy && storage_status == "healthy" {
        "healthy"
    } else {
        "degraded"
    };
    let response = HealthCheckResponse {
        status: status.to_string(),
        database,
        storage: storage_status,
        storage_backend: state.storage.backend_type().to_string(),
    };

    let code = if database_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_check_reports_outcome() {
        let ok = run_check(CHECK_TIMEOUT, async { Ok::<(), String>(()) }, "unhealthy").await;
        assert_eq!(ok, "healthy");

        let failed = run_check(
            CHECK_TIMEOUT,
            async { Err::<(), String>("connection refused".to_string()) },
            "degraded",
        )
        .await;
        assert_eq!(failed, "degraded: connection refused");

        let slow = run_check(
            Duration::from_millis(10),
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<(), String>(())
            },
            "unhealthy",
        )
        .await;
        assert_eq!(slow, "timeout");
    }
}
