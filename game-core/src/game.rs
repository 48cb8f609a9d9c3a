use game_types::{Direction, GameError, GameSnapshot, GameStatus};
use uuid::Uuid;

use crate::Board;

/// Whether a successful move finished the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Continuing,
    Won,
}

/// One play session: a board plus lifecycle state, move counter, and move
/// history, owned by one user. Invariants: `history.len() == num_moves`,
/// and nothing mutates once the status leaves `InProgress`.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: Uuid,
    pub user_id: Uuid,
    pub board: Board,
    pub status: GameStatus,
    pub num_moves: u32,
    pub history: Vec<Direction>,
}

impl Game {
    pub fn new(user_id: Uuid) -> Self {
        Self::with_board(user_id, Board::shuffled())
    }

    /// Start from a known board, used by tests and by the persistence layer
    /// when rehydrating rows.
    pub fn with_board(user_id: Uuid, board: Board) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            board,
            status: GameStatus::InProgress,
            num_moves: 0,
            history: Vec::new(),
        }
    }

    pub fn is_ended(&self) -> bool {
        self.status.is_ended()
    }

    /// Validate and apply one move. On success the counter and history grow
    /// together; a solving move transitions the game to `Won` before
    /// returning.
    pub fn apply_move(&mut self, direction: Direction) -> Result<MoveOutcome, GameError> {
        if self.is_ended() {
            return Err(GameError::GameAlreadyEnded);
        }
        if !self.board.is_move_legal(direction) {
            return Err(GameError::IllegalMove);
        }
        self.board.apply_move(direction)?;
        self.num_moves += 1;
        self.history.push(direction);

        if self.board.is_solved() {
            self.status = GameStatus::Won;
            Ok(MoveOutcome::Won)
        } else {
            Ok(MoveOutcome::Continuing)
        }
    }

    /// Resign an in-progress game.
    pub fn cancel(&mut self) -> Result<(), GameError> {
        if self.is_ended() {
            return Err(GameError::GameAlreadyEnded);
        }
        self.status = GameStatus::Lost;
        Ok(())
    }

    pub fn history_codes(&self) -> Vec<u8> {
        self.history.iter().map(|d| d.code()).collect()
    }

    pub fn to_snapshot(&self, user_name: &str) -> GameSnapshot {
        GameSnapshot {
            id: self.id,
            user_name: user_name.to_string(),
            board: self.board.rows(),
            status: self.status,
            num_moves: self.num_moves,
            history: self.history_codes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_move_from_won() -> Game {
        // Solved ordering with tile 12 slid down; moving it up wins.
        let board = Board::try_from_cells([
            1, 2, 3, 4, //
            5, 6, 7, 8, //
            9, 10, 11, 0, //
            13, 14, 15, 12,
        ])
        .unwrap();
        Game::with_board(Uuid::new_v4(), board)
    }

    #[test]
    fn test_new_game_starts_fresh() {
        let game = Game::new(Uuid::new_v4());
        assert_eq!(game.status, GameStatus::InProgress);
        assert_eq!(game.num_moves, 0);
        assert!(game.history.is_empty());
    }

    #[test]
    fn test_moves_grow_counter_and_history_together() {
        let mut game = Game::with_board(Uuid::new_v4(), Board::solved());
        game.apply_move(Direction::Down).unwrap();
        game.apply_move(Direction::Right).unwrap();
        assert_eq!(game.num_moves, 2);
        assert_eq!(game.history, vec![Direction::Down, Direction::Right]);
        assert_eq!(game.history_codes(), vec![1, 3]);
    }

    #[test]
    fn test_illegal_move_changes_nothing() {
        let mut game = Game::with_board(Uuid::new_v4(), Board::solved());
        // Empty slot is in the last row, so Up has no tile to pull.
        assert_eq!(
            game.apply_move(Direction::Up),
            Err(GameError::IllegalMove)
        );
        assert_eq!(game.num_moves, 0);
        assert!(game.history.is_empty());
        assert_eq!(game.status, GameStatus::InProgress);
    }

    #[test]
    fn test_solving_move_wins() {
        let mut game = one_move_from_won();
        let outcome = game.apply_move(Direction::Up).unwrap();
        assert_eq!(outcome, MoveOutcome::Won);
        assert_eq!(game.status, GameStatus::Won);
        assert_eq!(game.num_moves, 1);
    }

    #[test]
    fn test_no_moves_after_game_ends() {
        let mut game = one_move_from_won();
        game.apply_move(Direction::Up).unwrap();
        assert_eq!(
            game.apply_move(Direction::Down),
            Err(GameError::GameAlreadyEnded)
        );
        assert_eq!(game.num_moves, 1);
    }

    #[test]
    fn test_cancel_is_terminal() {
        let mut game = Game::new(Uuid::new_v4());
        game.cancel().unwrap();
        assert_eq!(game.status, GameStatus::Lost);
        assert_eq!(game.cancel(), Err(GameError::GameAlreadyEnded));
        assert_eq!(
            game.apply_move(Direction::Down),
            Err(GameError::GameAlreadyEnded)
        );
    }

    #[test]
    fn test_snapshot_is_a_pure_projection() {
        let mut game = Game::with_board(Uuid::new_v4(), Board::solved());
        game.apply_move(Direction::Down).unwrap();
        let first = game.to_snapshot("alice");
        let second = game.to_snapshot("alice");
        assert_eq!(first, second);
        assert_eq!(first.user_name, "alice");
        assert_eq!(first.num_moves, 1);
        assert_eq!(first.history, vec![1]);
    }
}
