use thiserror::Error;

/// Errors produced by the round engine.
///
/// Both kinds mean the engine was handed, or computed, something it cannot play. Neither is retried:
/// the round in progress is abandoned and the error is propagated to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlackjackGameError {
    #[error("invalid card: rank {rank} (expected 1-13), suit {suit} (expected 0-3)")]
    InvalidCard { rank: u8, suit: u8 },
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

impl BlackjackGameError {
    pub(crate) fn invalid_operation(message: impl Into<String>) -> Self {
        BlackjackGameError::InvalidOperation(message.into())
    }
}
