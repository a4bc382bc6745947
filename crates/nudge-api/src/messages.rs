use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use nudge_types::api::{MessageListResponse, SubmitMessageRequest};

use crate::AppState;
use crate::error::ApiError;

/// Turn-checked message admission. `WrongTurn` comes back as 403: a
/// business rule violation, not an internal error.
pub async fn submit_message(
    State(state): State<AppState>,
    Path(conversation_id): Path<Uuid>,
    Json(req): Json<SubmitMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let engine = state.engine.clone();
    let message = tokio::task::spawn_blocking(move || {
        engine.submit_message(conversation_id, &req.sender_id, &req.content)
    })
    .await
    .map_err(ApiError::from_join)??;

    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn list_messages(
    State(state): State<AppState>,
    Path(conversation_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let engine = state.engine.clone();
    let messages = tokio::task::spawn_blocking(move || engine.list_messages(conversation_id))
        .await
        .map_err(ApiError::from_join)??;
    Ok(Json(MessageListResponse { messages }))
}
