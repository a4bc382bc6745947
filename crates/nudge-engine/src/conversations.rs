//! Conversation registry. Creation happens only through match resolution
//! (see `pokes.rs`); these are the read-side operations.

use uuid::Uuid;

use nudge_types::models::Conversation;

use crate::Engine;
use crate::convert::conversation_from_row;
use crate::error::{EngineError, Result};
use crate::pair_key;

impl Engine {
    pub fn get_conversation(&self, id: Uuid) -> Result<Conversation> {
        let row = self
            .db()
            .get_conversation(&id.to_string())?
            .ok_or(EngineError::NotFound("conversation"))?;
        conversation_from_row(row)
    }

    pub fn get_conversation_for_pair(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<Option<Conversation>> {
        let key = pair_key(user_a, user_b);
        self.db()
            .get_conversation_by_pair(&key)?
            .map(conversation_from_row)
            .transpose()
    }

    /// All conversations this user participates in, newest first.
    pub fn list_conversations(&self, user_id: &str) -> Result<Vec<Conversation>> {
        self.db()
            .list_conversations_for_user(user_id)?
            .into_iter()
            .map(conversation_from_row)
            .collect()
    }
}
