use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{error, warn};

use crate::error::AnalysisError;

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Journal(anyhow::Error),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Journal(e) => {
                warn!("Journal unavailable: {:#}", e);
                (StatusCode::BAD_GATEWAY, format!("trade journal unavailable: {}", e))
            }
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Validation { .. } => ApiError::Validation(err.to_string()),
            // The engine absorbs these; reaching here means a bug upstream.
            AnalysisError::InsufficientData(_) | AnalysisError::Computation(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}
