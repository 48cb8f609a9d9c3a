use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every failure the puzzle service reports to a caller. All of these are
/// recovered at the request boundary and surfaced as a typed response body.
/// `CorruptState` marks an invariant breach from an earlier bug and is logged
/// separately from ordinary user mistakes.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("a user named '{name}' already exists")]
    DuplicateUser { name: String },
    #[error("no user named '{name}'")]
    UserNotFound { name: String },
    #[error("game {game_id} not found")]
    GameNotFound { game_id: String },
    #[error("game is already over")]
    GameAlreadyEnded,
    #[error("invalid move: unknown direction code {code}")]
    InvalidDirection { code: i64 },
    #[error("invalid move: out of bound")]
    IllegalMove,
    #[error("corrupt board state: {detail}")]
    CorruptState { detail: String },
    #[error("malformed entity key '{key}'")]
    InvalidKey { key: String },
}
