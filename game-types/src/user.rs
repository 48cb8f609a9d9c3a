use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Best-move-count value for a user who has never won. Sorts after every
/// real move count in the rankings.
pub const BEST_MOVE_SENTINEL: i32 = i32::MAX;

/// User profile plus the aggregate counters the leaderboards rank over.
/// The counters change only through end-of-game accounting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub wins: i32,
    pub total_played: i32,
    pub best_move_count: i32,
    pub created_at: String, // ISO 8601 string
}

impl User {
    pub fn new(name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email,
            wins: 0,
            total_played: 0,
            best_move_count: BEST_MOVE_SENTINEL,
            created_at: String::new(),
        }
    }
}

/// Immutable outcome record, appended exactly once per ended game. Scores
/// are correlated to games only by owner and creation order, never by a
/// direct link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub user_name: String,
    pub date: String, // ISO 8601 date
    pub won: bool,
}
