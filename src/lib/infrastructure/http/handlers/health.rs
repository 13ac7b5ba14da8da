//! Health check handler

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::communication::emails::EmailService, infrastructure::http::state::AppState,
};

/// The health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `ok` while the server is answering
    #[schema(example = "ok")]
    pub status: String,

    /// The uptime of the application in seconds
    #[schema(example = 123)]
    pub uptime: i64,
}

/// Report that the service is up
#[utoipa::path(
    get,
    operation_id = "healthz",
    tag = "System",
    path = "/api/ccg/healthz",
    responses(
        (status = StatusCode::OK, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn handler<E: EmailService>(State(state): State<AppState<E>>) -> Json<HealthResponse> {
    let uptime = Utc::now().timestamp() - state.start_time.timestamp();

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime,
    })
}
