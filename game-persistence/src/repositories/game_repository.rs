use anyhow::Result;
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter,
    TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{games, prelude::*, scores, users};
use crate::repositories::UserRepository;
use game_core::{stats, Board, Game, MoveOutcome, CELLS};
use game_types::{Direction, GameError, GameStatus};

pub struct GameRepository {
    db: DatabaseConnection,
}

fn encode_board(board: &Board) -> Result<String> {
    Ok(serde_json::to_string(board.cells().as_slice())?)
}

fn decode_board(text: &str) -> Result<Board, GameError> {
    let values: Vec<u8> = serde_json::from_str(text).map_err(|e| {
        tracing::error!("undecodable board column: {e}");
        GameError::CorruptState {
            detail: format!("undecodable board column: {e}"),
        }
    })?;
    let cells: [u8; CELLS] = values.try_into().map_err(|values: Vec<u8>| {
        tracing::error!("board column holds {} cells", values.len());
        GameError::CorruptState {
            detail: format!("board column holds {} cells, expected {CELLS}", values.len()),
        }
    })?;
    Board::try_from_cells(cells)
}

fn encode_history(history: &[Direction]) -> Result<String> {
    let codes: Vec<u8> = history.iter().map(|d| d.code()).collect();
    Ok(serde_json::to_string(&codes)?)
}

fn decode_history(text: &str) -> Result<Vec<Direction>, GameError> {
    let codes: Vec<i64> = serde_json::from_str(text).map_err(|e| GameError::CorruptState {
        detail: format!("undecodable history column: {e}"),
    })?;
    codes
        .into_iter()
        .map(|code| {
            Direction::from_code(code).map_err(|_| GameError::CorruptState {
                detail: format!("history column holds unknown direction code {code}"),
            })
        })
        .collect()
}

fn model_to_game(model: games::Model) -> Result<Game, GameError> {
    let status = match (model.game_over, model.won) {
        (false, _) => GameStatus::InProgress,
        (true, true) => GameStatus::Won,
        (true, false) => GameStatus::Lost,
    };
    let history = decode_history(&model.history)?;
    if history.len() != model.num_moves as usize {
        tracing::error!(
            game_id = %model.id,
            "history length {} disagrees with move counter {}",
            history.len(),
            model.num_moves
        );
        return Err(GameError::CorruptState {
            detail: "history length disagrees with move counter".to_string(),
        });
    }
    Ok(Game {
        id: model.id,
        user_id: model.user_id,
        board: decode_board(&model.board)?,
        status,
        num_moves: model.num_moves as u32,
        history,
    })
}

fn game_to_update(game: &Game) -> Result<games::ActiveModel> {
    Ok(games::ActiveModel {
        id: ActiveValue::Unchanged(game.id),
        user_id: ActiveValue::Unchanged(game.user_id),
        board: ActiveValue::Set(encode_board(&game.board)?),
        game_over: ActiveValue::Set(game.is_ended()),
        won: ActiveValue::Set(game.status == GameStatus::Won),
        num_moves: ActiveValue::Set(game.num_moves as i32),
        history: ActiveValue::Set(encode_history(&game.history)?),
        created_at: ActiveValue::NotSet,
        updated_at: ActiveValue::Set(chrono::Utc::now().into()),
    })
}

/// End-of-game accounting: user counters and the score record change in the
/// same transaction that marks the game over, so a reader never sees one
/// without the others.
async fn finalize_accounting(txn: &DatabaseTransaction, game: &Game, won: bool) -> Result<()> {
    let owner = Users::find_by_id(game.user_id)
        .one(txn)
        .await?
        .ok_or_else(|| anyhow::anyhow!("game {} owner {} missing", game.id, game.user_id))?;
    let mut user = UserRepository::model_to_user(owner);
    if won {
        stats::record_win(&mut user, game.num_moves);
    } else {
        stats::record_loss(&mut user);
    }

    let now = chrono::Utc::now();
    let user_update = users::ActiveModel {
        id: ActiveValue::Unchanged(user.id),
        name: ActiveValue::NotSet,
        email: ActiveValue::NotSet,
        wins: ActiveValue::Set(user.wins),
        total_played: ActiveValue::Set(user.total_played),
        best_move_count: ActiveValue::Set(user.best_move_count),
        created_at: ActiveValue::NotSet,
        updated_at: ActiveValue::Set(now.into()),
    };
    Users::update(user_update).exec(txn).await?;

    let score = scores::ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4()),
        user_id: ActiveValue::Set(game.user_id),
        date: ActiveValue::Set(now.date_naive()),
        won: ActiveValue::Set(won),
        created_at: ActiveValue::Set(now.into()),
    };
    Scores::insert(score).exec(txn).await?;

    Ok(())
}

impl GameRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn insert(&self, game: &Game) -> Result<()> {
        let now = chrono::Utc::now();
        let model = games::ActiveModel {
            id: ActiveValue::Set(game.id),
            user_id: ActiveValue::Set(game.user_id),
            board: ActiveValue::Set(encode_board(&game.board)?),
            game_over: ActiveValue::Set(game.is_ended()),
            won: ActiveValue::Set(game.status == GameStatus::Won),
            num_moves: ActiveValue::Set(game.num_moves as i32),
            history: ActiveValue::Set(encode_history(&game.history)?),
            created_at: ActiveValue::Set(now.into()),
            updated_at: ActiveValue::Set(now.into()),
        };
        Games::insert(model).exec(&self.db).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, game_id: Uuid) -> Result<Option<Game>> {
        let model = Games::find_by_id(game_id).one(&self.db).await?;
        Ok(model.map(model_to_game).transpose()?)
    }

    pub async fn active_games_for_user(&self, user_id: Uuid) -> Result<Vec<Game>> {
        let models = Games::find()
            .filter(games::Column::UserId.eq(user_id))
            .filter(games::Column::GameOver.eq(false))
            .all(&self.db)
            .await?;
        let games: Result<Vec<Game>, GameError> =
            models.into_iter().map(model_to_game).collect();
        Ok(games?)
    }

    /// Validate and apply one move inside a transaction, so concurrent moves
    /// on the same game serialize into a single linear history. A winning
    /// move also runs the end-of-game accounting before the commit.
    pub async fn apply_move(&self, game_id: Uuid, direction: Direction) -> Result<Game> {
        let txn = self.db.begin().await?;

        let model = Games::find_by_id(game_id)
            .one(&txn)
            .await?
            .ok_or_else(|| GameError::GameNotFound {
                game_id: game_id.to_string(),
            })?;
        let mut game = model_to_game(model)?;
        let outcome = game.apply_move(direction)?;

        Games::update(game_to_update(&game)?).exec(&txn).await?;
        if outcome == MoveOutcome::Won {
            finalize_accounting(&txn, &game, true).await?;
        }
        txn.commit().await?;

        Ok(game)
    }

    /// Resign an in-progress game; accounting records the loss in the same
    /// transaction.
    pub async fn cancel(&self, game_id: Uuid) -> Result<Game> {
        let txn = self.db.begin().await?;

        let model = Games::find_by_id(game_id)
            .one(&txn)
            .await?
            .ok_or_else(|| GameError::GameNotFound {
                game_id: game_id.to_string(),
            })?;
        let mut game = model_to_game(model)?;
        game.cancel()?;

        Games::update(game_to_update(&game)?).exec(&txn).await?;
        finalize_accounting(&txn, &game, false).await?;
        txn.commit().await?;

        Ok(game)
    }
}
