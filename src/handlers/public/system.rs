use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::config;
use crate::database::DatabaseManager;

/// GET / - service banner
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "data": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "environment": config::config().environment,
        }
    }))
}

/// GET /health - 200 when the database answers, 503 otherwise
pub async fn health() -> impl IntoResponse {
    match DatabaseManager::health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": { "status": "ok", "database": "connected" } })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "Database unavailable",
                    "code": "SERVICE_UNAVAILABLE"
                })),
            )
        }
    }
}
