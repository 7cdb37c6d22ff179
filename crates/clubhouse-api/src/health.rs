use axum::Json;
use clubhouse_types::api::HealthResponse;

/// GET /health/
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
