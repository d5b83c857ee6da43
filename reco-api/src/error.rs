use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    /// Payload could not be read or decoded
    BadRequest(String),
    /// Rate snapshot missing or unreadable; no run is attempted without it
    RatesUnavailable(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => {
                tracing::info!("Rejected payload: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::RatesUnavailable(msg) => {
                tracing::error!("Rate snapshot unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "Rate snapshot unavailable".to_string())
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Anyhow(err.into())
    }
}
