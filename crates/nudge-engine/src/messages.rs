//! Turn engine and message log. Admission is check-then-act inside a
//! single store transaction: validate, append with the next sequence
//! number, flip the turn.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use nudge_db::models::AppendOutcome;
use nudge_types::models::Message;

use crate::convert::message_from_row;
use crate::error::{EngineError, Result};
use crate::{Engine, MAX_MESSAGE_CHARS, format_timestamp};

impl Engine {
    /// Content is trimmed before validation and stored trimmed. All
    /// validation happens before any write.
    pub fn submit_message(
        &self,
        conversation_id: Uuid,
        sender_id: &str,
        content: &str,
    ) -> Result<Message> {
        if sender_id.is_empty() {
            return Err(EngineError::InvalidInput("sender_id is required".into()));
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(EngineError::InvalidInput(
                "message content is empty".into(),
            ));
        }
        if content.chars().count() > MAX_MESSAGE_CHARS {
            return Err(EngineError::ContentTooLong);
        }

        let message_id = Uuid::new_v4();
        let created_at = format_timestamp(Utc::now());

        let outcome = self.db().append_message_turn_checked(
            &conversation_id.to_string(),
            &message_id.to_string(),
            sender_id,
            content,
            &created_at,
        )?;

        match outcome {
            AppendOutcome::Appended(row) => message_from_row(row),
            AppendOutcome::ConversationMissing => Err(EngineError::NotFound("conversation")),
            AppendOutcome::WrongTurn => {
                debug!(%conversation_id, sender_id, "message rejected: not sender's turn");
                Err(EngineError::WrongTurn)
            }
        }
    }

    /// Messages in send order (ascending sequence number).
    pub fn list_messages(&self, conversation_id: Uuid) -> Result<Vec<Message>> {
        let id = conversation_id.to_string();
        if self.db().get_conversation(&id)?.is_none() {
            return Err(EngineError::NotFound("conversation"));
        }
        self.db()
            .list_messages(&id)?
            .into_iter()
            .map(message_from_row)
            .collect()
    }
}
