use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::Extension, http::Uri, response::Json};
use problem_details::{ErrDef, ProblemResponse};
use serde_json::{json, Value};

/// Readiness probe for a backing dependency, typically the database.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check(&self) -> anyhow::Result<()>;
}

const DB_UNAVAILABLE: ErrDef = ErrDef {
    status: 500,
    title: "Internal error",
    code: "HEALTH_DB_UNAVAILABLE",
};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Round-trips the backing store; 500 when it is unreachable.
pub async fn healthchecker(
    Extension(probe): Extension<Arc<dyn HealthCheck>>,
    uri: Uri,
) -> Result<Json<Value>, ProblemResponse> {
    match probe.check().await {
        Ok(()) => Ok(Json(json!({ "message": "Welcome to the address book API!" }))),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            Err(DB_UNAVAILABLE.to_response("Error connecting to the database", uri.path()))
        }
    }
}
