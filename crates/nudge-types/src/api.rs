use serde::{Deserialize, Serialize};

use crate::models::{Conversation, Message, Poke};

// -- Pokes --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitPokeRequest {
    pub from_user_id: String,
    pub to_user_id: String,
}

/// Combined result of a poke submission: the (created or pre-existing)
/// poke, plus the conversation if this poke completed a match.
#[derive(Debug, Serialize)]
pub struct SubmitPokeResponse {
    pub poke: Poke,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation: Option<Conversation>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserQuery {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct PokeListResponse {
    pub pokes: Vec<Poke>,
}

// -- Conversations --

#[derive(Debug, Serialize)]
pub struct ConversationListResponse {
    pub conversations: Vec<Conversation>,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitMessageRequest {
    pub sender_id: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct MessageListResponse {
    pub messages: Vec<Message>,
}
