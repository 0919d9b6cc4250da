use axum::http::StatusCode;

pub mod posts;
pub mod sessions;

// health check handler
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
