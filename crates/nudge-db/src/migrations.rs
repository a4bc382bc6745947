use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS pokes (
            id              TEXT PRIMARY KEY,
            from_user_id    TEXT NOT NULL,
            to_user_id      TEXT NOT NULL,
            status          TEXT NOT NULL DEFAULT 'pending'
                            CHECK (status IN ('pending', 'accepted')),
            created_at      TEXT NOT NULL
        );

        -- At most one pending poke per ordered pair; re-pokes hit this
        -- index and are resolved as no-ops.
        CREATE UNIQUE INDEX IF NOT EXISTS idx_pokes_pending_pair
            ON pokes(from_user_id, to_user_id) WHERE status = 'pending';

        CREATE INDEX IF NOT EXISTS idx_pokes_incoming
            ON pokes(to_user_id, status, created_at);

        CREATE INDEX IF NOT EXISTS idx_pokes_outgoing
            ON pokes(from_user_id, status, created_at);

        CREATE TABLE IF NOT EXISTS conversations (
            id          TEXT PRIMARY KEY,
            pair_key    TEXT NOT NULL UNIQUE,
            user_a      TEXT NOT NULL,
            user_b      TEXT NOT NULL,
            turn        TEXT NOT NULL CHECK (turn IN (user_a, user_b)),
            created_at  TEXT NOT NULL,
            CHECK (user_a < user_b)
        );

        CREATE INDEX IF NOT EXISTS idx_conversations_user_a
            ON conversations(user_a);

        CREATE INDEX IF NOT EXISTS idx_conversations_user_b
            ON conversations(user_b);

        CREATE TABLE IF NOT EXISTS messages (
            id              TEXT PRIMARY KEY,
            conversation_id TEXT NOT NULL REFERENCES conversations(id),
            sender_id       TEXT NOT NULL,
            content         TEXT NOT NULL,
            seq             INTEGER NOT NULL,
            created_at      TEXT NOT NULL,
            UNIQUE(conversation_id, seq)
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
