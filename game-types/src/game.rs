use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a game. `Won` and `Lost` are terminal: no further
/// moves and no further end-transitions are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_ended(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// Read-only projection of a game for display. Produced after every
/// successful operation and by the state query endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub id: Uuid,
    pub user_name: String,
    pub board: [[u8; 4]; 4],
    pub status: GameStatus,
    pub num_moves: u32,
    /// Applied move codes in order; always `num_moves` long.
    pub history: Vec<u8>,
}
