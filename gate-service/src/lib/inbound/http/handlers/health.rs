use axum::http::StatusCode;

/// Liveness probe. No session or store access.
pub async fn health() -> StatusCode {
    StatusCode::OK
}
