pub mod error;

mod convert;
mod conversations;
mod messages;
mod pokes;

pub use error::{EngineError, MAX_MESSAGE_CHARS};
pub use pokes::PokeOutcome;

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use nudge_db::Database;

/// The coordination engine: poke ledger, match detection, conversation
/// registry, and turn-checked message admission. All state lives in the
/// store; the engine is pure policy and every critical section it relies
/// on is a conditional write scoped to a single key.
pub struct Engine {
    db: Arc<Database>,
}

impl Engine {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub(crate) fn db(&self) -> &Database {
        &self.db
    }
}

/// Canonical key for an unordered user pair: the two ids sorted and
/// joined. Keys the at-most-one-conversation-per-pair invariant.
pub(crate) fn pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}:{b}")
    } else {
        format!("{b}:{a}")
    }
}

/// Fixed-width RFC 3339 with microseconds, so stored timestamps compare
/// lexically in chronological order.
pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::pair_key;

    #[test]
    fn pair_key_is_order_independent() {
        assert_eq!(pair_key("alice", "bob"), pair_key("bob", "alice"));
        assert_eq!(pair_key("alice", "bob"), "alice:bob");
    }
}
