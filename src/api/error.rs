use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failure taxonomy for the HTTP surface. Validation errors are detected
/// before any model call; inference errors carry whatever the encoder
/// reported.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    ModelUnavailable,
    Inference(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::ModelUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "Model not loaded".into())
            }
            ApiError::Inference(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
