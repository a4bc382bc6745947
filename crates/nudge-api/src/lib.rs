pub mod conversations;
pub mod error;
pub mod messages;
pub mod pokes;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use nudge_engine::Engine;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub engine: Arc<Engine>,
}

/// The full core-facing HTTP surface.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/pokes", post(pokes::submit_poke))
        .route("/pokes/incoming", get(pokes::list_incoming))
        .route("/pokes/outgoing", get(pokes::list_outgoing))
        .route("/conversations", get(conversations::list_conversations))
        .route(
            "/conversations/{conversation_id}",
            get(conversations::get_conversation),
        )
        .route(
            "/conversations/{conversation_id}/messages",
            get(messages::list_messages),
        )
        .route(
            "/conversations/{conversation_id}/messages",
            post(messages::submit_message),
        )
        .with_state(state)
}
