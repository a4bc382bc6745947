use crate::Database;
use crate::models::{AppendOutcome, ConversationRow, MessageRow, NewConversation, PokeRow};
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Pokes --

    /// Conditional insert: the partial unique index on pending ordered
    /// pairs makes a re-poke a no-op. Returns true if a row was inserted.
    pub fn insert_poke_pending(
        &self,
        id: &str,
        from_user_id: &str,
        to_user_id: &str,
        created_at: &str,
    ) -> Result<bool> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO pokes (id, from_user_id, to_user_id, status, created_at)
                 VALUES (?1, ?2, ?3, 'pending', ?4)",
                rusqlite::params![id, from_user_id, to_user_id, created_at],
            )?;
            Ok(inserted == 1)
        })
    }

    pub fn get_pending_poke(&self, from_user_id: &str, to_user_id: &str) -> Result<Option<PokeRow>> {
        self.with_conn(|conn| query_pending_poke(conn, from_user_id, to_user_id))
    }

    /// Transition `pending -> accepted` only if still pending. Zero rows
    /// affected means a concurrent call already resolved this poke.
    pub fn accept_poke_if_pending(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE pokes SET status = 'accepted' WHERE id = ?1 AND status = 'pending'",
                [id],
            )?;
            Ok(changed == 1)
        })
    }

    pub fn list_pending_pokes_to(&self, user_id: &str) -> Result<Vec<PokeRow>> {
        self.with_conn(|conn| {
            query_poke_list(
                conn,
                "SELECT id, from_user_id, to_user_id, status, created_at
                 FROM pokes
                 WHERE to_user_id = ?1 AND status = 'pending'
                 ORDER BY created_at DESC",
                user_id,
            )
        })
    }

    pub fn list_pending_pokes_from(&self, user_id: &str) -> Result<Vec<PokeRow>> {
        self.with_conn(|conn| {
            query_poke_list(
                conn,
                "SELECT id, from_user_id, to_user_id, status, created_at
                 FROM pokes
                 WHERE from_user_id = ?1 AND status = 'pending'
                 ORDER BY created_at DESC",
                user_id,
            )
        })
    }

    // -- Match resolution --

    /// Atomically accept both pokes of a match and ensure the pair's
    /// conversation exists. The accepts are conditional (already-accepted
    /// pokes are left alone) and the conversation insert is keyed by the
    /// canonical pair key, so losing a race to a concurrent resolution is
    /// harmless: the existing conversation is returned either way.
    pub fn resolve_match(
        &self,
        poke_id: &str,
        reciprocal_id: &str,
        candidate: &NewConversation,
    ) -> Result<ConversationRow> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "UPDATE pokes SET status = 'accepted' WHERE id = ?1 AND status = 'pending'",
                [poke_id],
            )?;
            tx.execute(
                "UPDATE pokes SET status = 'accepted' WHERE id = ?1 AND status = 'pending'",
                [reciprocal_id],
            )?;

            tx.execute(
                "INSERT OR IGNORE INTO conversations (id, pair_key, user_a, user_b, turn, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    candidate.id,
                    candidate.pair_key,
                    candidate.user_a,
                    candidate.user_b,
                    candidate.turn,
                    candidate.created_at,
                ],
            )?;

            let conversation = query_conversation_by_pair(&tx, &candidate.pair_key)?
                .ok_or_else(|| anyhow::anyhow!("conversation missing after conditional insert"))?;

            tx.commit()?;
            Ok(conversation)
        })
    }

    // -- Conversations --

    pub fn get_conversation(&self, id: &str) -> Result<Option<ConversationRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, pair_key, user_a, user_b, turn, created_at
                 FROM conversations WHERE id = ?1",
            )?;
            stmt.query_row([id], conversation_from_row).optional()
        })
    }

    pub fn get_conversation_by_pair(&self, pair_key: &str) -> Result<Option<ConversationRow>> {
        self.with_conn(|conn| query_conversation_by_pair(conn, pair_key))
    }

    pub fn list_conversations_for_user(&self, user_id: &str) -> Result<Vec<ConversationRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, pair_key, user_a, user_b, turn, created_at
                 FROM conversations
                 WHERE user_a = ?1 OR user_b = ?1
                 ORDER BY created_at DESC",
            )?;
            let rows = stmt
                .query_map([user_id], conversation_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Messages --

    /// The turn-flip critical section: re-check the stored turn, append the
    /// message with the next per-conversation sequence number, and flip the
    /// turn, all in one transaction. The turn update is conditional on the
    /// sender still holding the turn at write time.
    pub fn append_message_turn_checked(
        &self,
        conversation_id: &str,
        message_id: &str,
        sender_id: &str,
        content: &str,
        created_at: &str,
    ) -> Result<AppendOutcome> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let conversation = match query_conversation_by_id(&tx, conversation_id)? {
                Some(c) => c,
                None => return Ok(AppendOutcome::ConversationMissing),
            };

            let next_turn = if sender_id == conversation.user_a {
                &conversation.user_b
            } else if sender_id == conversation.user_b {
                &conversation.user_a
            } else {
                return Ok(AppendOutcome::WrongTurn);
            };

            let flipped = tx.execute(
                "UPDATE conversations SET turn = ?1 WHERE id = ?2 AND turn = ?3",
                rusqlite::params![next_turn, conversation_id, sender_id],
            )?;
            if flipped == 0 {
                return Ok(AppendOutcome::WrongTurn);
            }

            let seq: i64 = tx.query_row(
                "SELECT COALESCE(MAX(seq), 0) + 1 FROM messages WHERE conversation_id = ?1",
                [conversation_id],
                |row| row.get(0),
            )?;

            tx.execute(
                "INSERT INTO messages (id, conversation_id, sender_id, content, seq, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![message_id, conversation_id, sender_id, content, seq, created_at],
            )?;

            tx.commit()?;
            Ok(AppendOutcome::Appended(MessageRow {
                id: message_id.to_string(),
                conversation_id: conversation_id.to_string(),
                sender_id: sender_id.to_string(),
                content: content.to_string(),
                seq,
                created_at: created_at.to_string(),
            }))
        })
    }

    pub fn list_messages(&self, conversation_id: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, conversation_id, sender_id, content, seq, created_at
                 FROM messages
                 WHERE conversation_id = ?1
                 ORDER BY seq ASC",
            )?;
            let rows = stmt
                .query_map([conversation_id], |row| {
                    Ok(MessageRow {
                        id: row.get(0)?,
                        conversation_id: row.get(1)?,
                        sender_id: row.get(2)?,
                        content: row.get(3)?,
                        seq: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn query_pending_poke(
    conn: &Connection,
    from_user_id: &str,
    to_user_id: &str,
) -> Result<Option<PokeRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, from_user_id, to_user_id, status, created_at
         FROM pokes
         WHERE from_user_id = ?1 AND to_user_id = ?2 AND status = 'pending'",
    )?;
    stmt.query_row([from_user_id, to_user_id], poke_from_row)
        .optional()
}

fn query_poke_list(conn: &Connection, sql: &str, user_id: &str) -> Result<Vec<PokeRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([user_id], poke_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn query_conversation_by_pair(conn: &Connection, pair_key: &str) -> Result<Option<ConversationRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, pair_key, user_a, user_b, turn, created_at
         FROM conversations WHERE pair_key = ?1",
    )?;
    stmt.query_row([pair_key], conversation_from_row).optional()
}

fn query_conversation_by_id(conn: &Connection, id: &str) -> Result<Option<ConversationRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, pair_key, user_a, user_b, turn, created_at
         FROM conversations WHERE id = ?1",
    )?;
    stmt.query_row([id], conversation_from_row).optional()
}

fn poke_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PokeRow> {
    Ok(PokeRow {
        id: row.get(0)?,
        from_user_id: row.get(1)?,
        to_user_id: row.get(2)?,
        status: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn conversation_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ConversationRow> {
    Ok(ConversationRow {
        id: row.get(0)?,
        pair_key: row.get(1)?,
        user_a: row.get(2)?,
        user_b: row.get(3)?,
        turn: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
