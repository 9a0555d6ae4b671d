use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Liveness payload for `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthStatus {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Liveness only: the upstream search service is never probed
pub async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus::ok())
}
