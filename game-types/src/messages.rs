use serde::{Deserialize, Serialize};

/// Request bodies accepted by the HTTP surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub user_name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGameRequest {
    pub user_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MakeMoveRequest {
    /// Wire direction code: 0 up, 1 down, 2 left, 3 right.
    pub direction: i64,
}

/// Move history response for one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameHistory {
    pub moves: Vec<u8>,
}
