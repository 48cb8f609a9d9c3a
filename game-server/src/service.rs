use anyhow::Result;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use game_core::{stats, Game};
use game_persistence::repositories::{GameRepository, ScoreRepository, UserRepository};
use game_types::{Direction, GameError, GameSnapshot, ScoreEntry, User};

/// Orchestrates request handling: resolves entities by key or name,
/// delegates to the core state machine through the repositories, and shapes
/// display snapshots. Stateless between invocations; every call loads what
/// it needs and persists what it changed.
pub struct GameService {
    users: UserRepository,
    games: GameRepository,
    scores: ScoreRepository,
    leaderboard_limit: usize,
}

impl GameService {
    pub fn new(db: DatabaseConnection, leaderboard_limit: usize) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            games: GameRepository::new(db.clone()),
            scores: ScoreRepository::new(db),
            leaderboard_limit,
        }
    }

    fn parse_key(key: &str) -> Result<Uuid, GameError> {
        Uuid::parse_str(key).map_err(|_| GameError::InvalidKey {
            key: key.to_string(),
        })
    }

    async fn user_by_name(&self, name: &str) -> Result<User> {
        self.users
            .find_by_name(name)
            .await?
            .ok_or_else(|| GameError::UserNotFound {
                name: name.to_string(),
            })
            .map_err(Into::into)
    }

    async fn snapshot(&self, game: &Game) -> Result<GameSnapshot> {
        let owner = self
            .users
            .find_by_id(game.user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("game {} owner {} missing", game.id, game.user_id))?;
        Ok(game.to_snapshot(&owner.name))
    }

    pub async fn create_user(&self, name: &str, email: Option<String>) -> Result<User> {
        self.users.create_user(name, email).await
    }

    pub async fn new_game(&self, user_name: &str) -> Result<GameSnapshot> {
        let user = self.user_by_name(user_name).await?;
        let game = Game::new(user.id);
        self.games.insert(&game).await?;
        Ok(game.to_snapshot(&user.name))
    }

    pub async fn get_game(&self, key: &str) -> Result<GameSnapshot> {
        let id = Self::parse_key(key)?;
        let game = self
            .games
            .find_by_id(id)
            .await?
            .ok_or_else(|| GameError::GameNotFound {
                game_id: key.to_string(),
            })?;
        self.snapshot(&game).await
    }

    pub async fn make_move(&self, key: &str, direction_code: i64) -> Result<GameSnapshot> {
        let id = Self::parse_key(key)?;
        let direction = Direction::from_code(direction_code)?;
        let game = self.games.apply_move(id, direction).await?;
        self.snapshot(&game).await
    }

    pub async fn cancel_game(&self, key: &str) -> Result<GameSnapshot> {
        let id = Self::parse_key(key)?;
        let game = self.games.cancel(id).await?;
        self.snapshot(&game).await
    }

    pub async fn game_history(&self, key: &str) -> Result<Vec<u8>> {
        let id = Self::parse_key(key)?;
        let game = self
            .games
            .find_by_id(id)
            .await?
            .ok_or_else(|| GameError::GameNotFound {
                game_id: key.to_string(),
            })?;
        Ok(game.history_codes())
    }

    /// All of a user's in-progress games.
    pub async fn user_games(&self, user_name: &str) -> Result<Vec<GameSnapshot>> {
        let user = self.user_by_name(user_name).await?;
        let games = self.games.active_games_for_user(user.id).await?;
        Ok(games.iter().map(|g| g.to_snapshot(&user.name)).collect())
    }

    pub async fn scores(&self) -> Result<Vec<ScoreEntry>> {
        self.scores.list_all().await
    }

    pub async fn user_scores(&self, user_name: &str) -> Result<Vec<ScoreEntry>> {
        let user = self.user_by_name(user_name).await?;
        self.scores.list_for_user(user.id).await
    }

    /// Users ranked by wins, best first.
    pub async fn high_scores(&self, limit: Option<usize>) -> Result<Vec<User>> {
        let users = self.users.all_users().await?;
        Ok(stats::top_by_wins(
            users,
            limit.unwrap_or(self.leaderboard_limit),
        ))
    }

    /// Users ranked by best move count, fewest first.
    pub async fn user_rankings(&self, limit: Option<usize>) -> Result<Vec<User>> {
        let users = self.users.all_users().await?;
        Ok(stats::top_by_best_move_count(
            users,
            limit.unwrap_or(self.leaderboard_limit),
        ))
    }

    /// Users the reminder sweep can contact.
    pub async fn users_with_email(&self) -> Result<Vec<User>> {
        self.users.users_with_email().await
    }
}
