//! Poke ledger and match detection.
//!
//! A poke submission appends to the ledger, then immediately runs match
//! resolution: if the reciprocal pending poke exists, both flip to
//! accepted and the pair's conversation is created exactly once, even
//! when both users' submissions race each other. The second poker gets
//! the first turn.

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use nudge_db::models::NewConversation;
use nudge_types::models::{Conversation, Poke, PokeStatus};

use crate::convert::{conversation_from_row, poke_from_row};
use crate::error::{EngineError, Result};
use crate::{Engine, format_timestamp, pair_key};

/// Combined result of a poke submission.
pub struct PokeOutcome {
    pub poke: Poke,
    /// Present when this submission completed a match (or re-poked an
    /// already-matched pair).
    pub conversation: Option<Conversation>,
}

impl Engine {
    pub fn submit_poke(&self, from_user_id: &str, to_user_id: &str) -> Result<PokeOutcome> {
        self.submit_poke_at(from_user_id, to_user_id, Utc::now())
    }

    pub(crate) fn submit_poke_at(
        &self,
        from_user_id: &str,
        to_user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<PokeOutcome> {
        if from_user_id.is_empty() || to_user_id.is_empty() {
            return Err(EngineError::InvalidInput(
                "from_user_id and to_user_id are required".into(),
            ));
        }
        if from_user_id == to_user_id {
            return Err(EngineError::InvalidInput("cannot poke yourself".into()));
        }

        let id = Uuid::new_v4();
        let created_at = format_timestamp(now);
        let inserted =
            self.db()
                .insert_poke_pending(&id.to_string(), from_user_id, to_user_id, &created_at)?;

        let mut poke = if inserted {
            Poke {
                id,
                from_user_id: from_user_id.to_string(),
                to_user_id: to_user_id.to_string(),
                status: PokeStatus::Pending,
                created_at: now,
            }
        } else {
            // Re-poke while pending: idempotent no-op, original timestamp
            // kept. If the existing poke got accepted between the insert
            // attempt and this read, the caller lost a race and retries.
            debug!(from_user_id, to_user_id, "re-poke resolved to existing pending poke");
            let row = self
                .db()
                .get_pending_poke(from_user_id, to_user_id)?
                .ok_or(EngineError::Conflict)?;
            poke_from_row(row)?
        };

        let conversation = self.resolve_match(&poke)?;
        if conversation.is_some() {
            poke.status = PokeStatus::Accepted;
        }
        Ok(PokeOutcome { poke, conversation })
    }

    /// Inspect the ledger for the reciprocal pending poke and resolve the
    /// match if it exists.
    fn resolve_match(&self, poke: &Poke) -> Result<Option<Conversation>> {
        let reciprocal = self
            .db()
            .get_pending_poke(&poke.to_user_id, &poke.from_user_id)?;

        let key = pair_key(&poke.from_user_id, &poke.to_user_id);

        let Some(reciprocal) = reciprocal else {
            // No reciprocal. If the pair already matched, this is a stale
            // re-poke: accept it and hand back the existing conversation
            // instead of leaving it pending forever.
            let Some(existing) = self.db().get_conversation_by_pair(&key)? else {
                return Ok(None);
            };
            self.db().accept_poke_if_pending(&poke.id.to_string())?;
            return Ok(Some(conversation_from_row(existing)?));
        };
        let reciprocal = poke_from_row(reciprocal)?;

        let (user_a, user_b) = if poke.from_user_id <= poke.to_user_id {
            (poke.from_user_id.clone(), poke.to_user_id.clone())
        } else {
            (poke.to_user_id.clone(), poke.from_user_id.clone())
        };

        let candidate = NewConversation {
            id: Uuid::new_v4().to_string(),
            pair_key: key,
            user_a,
            user_b,
            turn: first_turn_holder(poke, &reciprocal),
            created_at: format_timestamp(poke.created_at.max(reciprocal.created_at)),
        };

        let row = self.db().resolve_match(
            &poke.id.to_string(),
            &reciprocal.id.to_string(),
            &candidate,
        )?;
        let conversation = conversation_from_row(row)?;
        info!(
            conversation_id = %conversation.id,
            user_a = %conversation.user_a,
            user_b = %conversation.user_b,
            turn = %conversation.turn,
            "mutual poke matched"
        );
        Ok(Some(conversation))
    }

    /// Pending pokes aimed at this user, newest first.
    pub fn list_incoming_pokes(&self, user_id: &str) -> Result<Vec<Poke>> {
        self.db()
            .list_pending_pokes_to(user_id)?
            .into_iter()
            .map(poke_from_row)
            .collect()
    }

    /// Pending pokes this user has sent, newest first.
    pub fn list_outgoing_pokes(&self, user_id: &str) -> Result<Vec<Poke>> {
        self.db()
            .list_pending_pokes_from(user_id)?
            .into_iter()
            .map(poke_from_row)
            .collect()
    }
}

/// The user whose poke came second speaks first: you got poked back, now
/// it's your move. Equal timestamps break deterministically toward the
/// lexically larger sender id, never toward arrival order.
fn first_turn_holder(a: &Poke, b: &Poke) -> String {
    use std::cmp::Ordering;
    match a.created_at.cmp(&b.created_at) {
        Ordering::Less => b.from_user_id.clone(),
        Ordering::Greater => a.from_user_id.clone(),
        Ordering::Equal => std::cmp::max(&a.from_user_id, &b.from_user_id).clone(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use nudge_db::Database;
    use nudge_types::models::PokeStatus;

    use super::*;

    fn engine() -> Engine {
        Engine::new(Arc::new(Database::open_in_memory().unwrap()))
    }

    fn at(secs: i64) -> chrono::DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn second_poker_gets_the_first_turn() {
        let engine = engine();

        // alice pokes at t=100, bob pokes back at t=105
        let first = engine.submit_poke_at("alice", "bob", at(100)).unwrap();
        assert_eq!(first.poke.status, PokeStatus::Pending);
        assert!(first.conversation.is_none());

        let second = engine.submit_poke_at("bob", "alice", at(105)).unwrap();
        let conversation = second.conversation.expect("mutual pokes should match");
        assert_eq!(conversation.turn, "bob");
        assert_eq!(second.poke.status, PokeStatus::Accepted);
    }

    #[test]
    fn equal_timestamps_break_toward_larger_id() {
        let engine = engine();
        engine.submit_poke_at("alice", "bob", at(100)).unwrap();
        let outcome = engine.submit_poke_at("bob", "alice", at(100)).unwrap();
        // "bob" > "alice", so bob is deemed the second poker.
        assert_eq!(outcome.conversation.unwrap().turn, "bob");
    }

    #[test]
    fn match_works_regardless_of_submission_order() {
        let engine = engine();
        engine.submit_poke_at("bob", "alice", at(105)).unwrap();
        let outcome = engine.submit_poke_at("alice", "bob", at(100)).unwrap();
        // bob's poke has the later timestamp, so bob still speaks first.
        assert_eq!(outcome.conversation.unwrap().turn, "bob");
    }

    #[test]
    fn repoke_returns_existing_pending_poke() {
        let engine = engine();
        let first = engine.submit_poke_at("alice", "bob", at(100)).unwrap();
        let second = engine.submit_poke_at("alice", "bob", at(200)).unwrap();

        assert_eq!(first.poke.id, second.poke.id);
        assert_eq!(first.poke.created_at, second.poke.created_at);
        assert!(second.conversation.is_none());
        assert_eq!(engine.list_outgoing_pokes("alice").unwrap().len(), 1);
    }

    #[test]
    fn repoke_after_match_returns_existing_conversation() {
        let engine = engine();
        engine.submit_poke_at("alice", "bob", at(100)).unwrap();
        let matched = engine.submit_poke_at("bob", "alice", at(105)).unwrap();
        let conversation = matched.conversation.unwrap();

        let again = engine.submit_poke_at("alice", "bob", at(300)).unwrap();
        let existing = again.conversation.expect("existing conversation returned");
        assert_eq!(existing.id, conversation.id);
        assert_eq!(again.poke.status, PokeStatus::Accepted);

        // No dangling pending poke, no second conversation.
        assert!(engine.list_outgoing_pokes("alice").unwrap().is_empty());
        assert_eq!(engine.list_conversations("alice").unwrap().len(), 1);
    }

    #[test]
    fn self_poke_is_rejected() {
        let engine = engine();
        match engine.submit_poke("alice", "alice") {
            Err(EngineError::InvalidInput(_)) => {}
            other => panic!("expected InvalidInput, got {:?}", other.map(|o| o.poke)),
        }
    }

    #[test]
    fn incoming_and_outgoing_lists_are_scoped_to_pending() {
        let engine = engine();
        engine.submit_poke_at("alice", "bob", at(100)).unwrap();
        engine.submit_poke_at("carol", "bob", at(101)).unwrap();

        let incoming = engine.list_incoming_pokes("bob").unwrap();
        assert_eq!(incoming.len(), 2);
        // Newest first
        assert_eq!(incoming[0].from_user_id, "carol");

        engine.submit_poke_at("bob", "alice", at(102)).unwrap();
        let incoming = engine.list_incoming_pokes("bob").unwrap();
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].from_user_id, "carol");
        assert!(engine.list_outgoing_pokes("alice").unwrap().is_empty());
    }
}
