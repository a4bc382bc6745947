use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use nudge_types::api::{PokeListResponse, SubmitPokeRequest, SubmitPokeResponse, UserQuery};

use crate::AppState;
use crate::error::ApiError;

/// Submit a poke and run match resolution. On a mutual match the response
/// carries the conversation so the client can jump straight into chat.
pub async fn submit_poke(
    State(state): State<AppState>,
    Json(req): Json<SubmitPokeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Run blocking store work off the async runtime
    let engine = state.engine.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        engine.submit_poke(&req.from_user_id, &req.to_user_id)
    })
    .await
    .map_err(ApiError::from_join)??;

    Ok((
        StatusCode::CREATED,
        Json(SubmitPokeResponse {
            poke: outcome.poke,
            conversation: outcome.conversation,
        }),
    ))
}

pub async fn list_incoming(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let engine = state.engine.clone();
    let pokes = tokio::task::spawn_blocking(move || engine.list_incoming_pokes(&query.user_id))
        .await
        .map_err(ApiError::from_join)??;
    Ok(Json(PokeListResponse { pokes }))
}

pub async fn list_outgoing(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let engine = state.engine.clone();
    let pokes = tokio::task::spawn_blocking(move || engine.list_outgoing_pokes(&query.user_id))
        .await
        .map_err(ApiError::from_join)??;
    Ok(Json(PokeListResponse { pokes }))
}
