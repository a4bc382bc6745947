/// Database row types — these map directly to SQLite rows.
/// Distinct from nudge-types API models to keep the DB layer independent.

pub struct PokeRow {
    pub id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub status: String,
    pub created_at: String,
}

pub struct ConversationRow {
    pub id: String,
    pub pair_key: String,
    pub user_a: String,
    pub user_b: String,
    pub turn: String,
    pub created_at: String,
}

pub struct MessageRow {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub content: String,
    pub seq: i64,
    pub created_at: String,
}

/// Fields for a conversation that may or may not get inserted, depending
/// on whether the pair already has one.
pub struct NewConversation {
    pub id: String,
    pub pair_key: String,
    pub user_a: String,
    pub user_b: String,
    pub turn: String,
    pub created_at: String,
}

/// Result of the turn-checked message append.
pub enum AppendOutcome {
    Appended(MessageRow),
    /// No conversation with the given id.
    ConversationMissing,
    /// The stored turn did not equal the sender at write time: either the
    /// sender is out of turn or a concurrent sender won the race.
    WrongTurn,
}
