//! Row-to-model conversions. Rows carry plain strings; anything that does
//! not parse is a corrupt store and surfaces as a Store error.

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use nudge_db::models::{ConversationRow, MessageRow, PokeRow};
use nudge_types::models::{Conversation, Message, Poke, PokeStatus};

use crate::error::{EngineError, Result};

pub(crate) fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| EngineError::Store(anyhow!("corrupt timestamp '{s}': {e}")))
}

fn parse_id(s: &str) -> Result<Uuid> {
    s.parse()
        .map_err(|e| EngineError::Store(anyhow!("corrupt id '{s}': {e}")))
}

pub(crate) fn poke_from_row(row: PokeRow) -> Result<Poke> {
    let status = match row.status.as_str() {
        "pending" => PokeStatus::Pending,
        "accepted" => PokeStatus::Accepted,
        other => {
            return Err(EngineError::Store(anyhow!("unknown poke status '{other}'")));
        }
    };
    Ok(Poke {
        id: parse_id(&row.id)?,
        from_user_id: row.from_user_id,
        to_user_id: row.to_user_id,
        status,
        created_at: parse_timestamp(&row.created_at)?,
    })
}

pub(crate) fn conversation_from_row(row: ConversationRow) -> Result<Conversation> {
    Ok(Conversation {
        id: parse_id(&row.id)?,
        user_a: row.user_a,
        user_b: row.user_b,
        turn: row.turn,
        created_at: parse_timestamp(&row.created_at)?,
    })
}

pub(crate) fn message_from_row(row: MessageRow) -> Result<Message> {
    Ok(Message {
        id: parse_id(&row.id)?,
        conversation_id: parse_id(&row.conversation_id)?,
        sender_id: row.sender_id,
        content: row.content,
        seq: row.seq,
        created_at: parse_timestamp(&row.created_at)?,
    })
}
