use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Users live in an external directory; the engine only ever sees their
/// opaque identifiers.
pub type UserId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PokeStatus {
    Pending,
    Accepted,
}

/// A unilateral expression of interest. Pokes are append-only: the only
/// mutation ever applied is the `pending -> accepted` transition at match
/// time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poke {
    pub id: Uuid,
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub status: PokeStatus,
    pub created_at: DateTime<Utc>,
}

/// The persistent record of a matched pair. `user_a` and `user_b` are
/// stored sorted so the pair is canonical; `turn` is always one of the two
/// and is the only field that ever changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub user_a: UserId,
    pub user_b: UserId,
    pub turn: UserId,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn other_participant(&self, user: &str) -> Option<&str> {
        if user == self.user_a {
            Some(&self.user_b)
        } else if user == self.user_b {
            Some(&self.user_a)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: UserId,
    pub content: String,
    /// Per-conversation monotonic sequence number; the authoritative
    /// ordering key for `list_messages`.
    pub seq: i64,
    pub created_at: DateTime<Utc>,
}
