use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use uuid::Uuid;

use nudge_types::api::{ConversationListResponse, UserQuery};

use crate::AppState;
use crate::error::ApiError;

pub async fn list_conversations(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let engine = state.engine.clone();
    let conversations =
        tokio::task::spawn_blocking(move || engine.list_conversations(&query.user_id))
            .await
            .map_err(ApiError::from_join)??;
    Ok(Json(ConversationListResponse { conversations }))
}

pub async fn get_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let engine = state.engine.clone();
    let conversation = tokio::task::spawn_blocking(move || engine.get_conversation(conversation_id))
        .await
        .map_err(ApiError::from_join)??;
    Ok(Json(conversation))
}
