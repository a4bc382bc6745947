use thiserror::Error;

/// Hard cap on message length, counted in Unicode scalar values.
pub const MAX_MESSAGE_CHARS: usize = 100;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("message content exceeds 100 characters")]
    ContentTooLong,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("not this user's turn to send")]
    WrongTurn,

    /// Lost a concurrent race on a conditional write; the operation left
    /// no side effects and is safe to retry.
    #[error("conflicting concurrent update, retry")]
    Conflict,

    #[error("storage unavailable")]
    Store(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
