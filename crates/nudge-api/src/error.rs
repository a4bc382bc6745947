use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use nudge_engine::EngineError;

/// Wrapper mapping engine errors onto HTTP responses with an
/// `{"error": …}` JSON body.
pub struct ApiError(EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn from_join(err: tokio::task::JoinError) -> Self {
        Self(EngineError::Store(anyhow::anyhow!(
            "blocking task failed: {err}"
        )))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            EngineError::InvalidInput(_) | EngineError::ContentTooLong => {
                (StatusCode::BAD_REQUEST, self.0.to_string())
            }
            EngineError::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            EngineError::WrongTurn => (StatusCode::FORBIDDEN, self.0.to_string()),
            EngineError::Conflict => (StatusCode::CONFLICT, self.0.to_string()),
            EngineError::Store(e) => {
                error!("storage error: {e:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
