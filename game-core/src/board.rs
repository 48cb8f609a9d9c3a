use game_types::{Direction, GameError};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

pub const SIDE: usize = 4;
pub const CELLS: usize = SIDE * SIDE;

/// 4x4 sliding-tile board. The cells hold a permutation of 0..=15 in
/// row-major order, with 0 marking the empty slot. Every constructor and
/// every move preserves the permutation, so exactly one cell is ever 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [u8; CELLS],
}

impl Board {
    /// The canonical solved ordering: 1..15 row-major, empty slot last.
    pub fn solved() -> Self {
        let mut cells = [0u8; CELLS];
        for (i, cell) in cells.iter_mut().enumerate().take(CELLS - 1) {
            *cell = (i + 1) as u8;
        }
        Self { cells }
    }

    /// Uniform random permutation of 0..=15. Solvability is deliberately not
    /// checked; half of all permutations cannot reach the solved ordering,
    /// and such games can still be ended by cancelling.
    pub fn shuffled() -> Self {
        Self::shuffled_with(&mut rand::thread_rng())
    }

    pub fn shuffled_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cells = [0u8; CELLS];
        for (i, cell) in cells.iter_mut().enumerate() {
            *cell = i as u8;
        }
        cells.shuffle(rng);
        Self { cells }
    }

    /// Rebuild a board from raw cells, e.g. a persisted row. Rejects
    /// anything that is not a permutation of 0..=15.
    pub fn try_from_cells(cells: [u8; CELLS]) -> Result<Self, GameError> {
        let mut seen = [false; CELLS];
        for &value in &cells {
            if (value as usize) >= CELLS || seen[value as usize] {
                return Err(GameError::CorruptState {
                    detail: format!("cells are not a permutation of 0..=15: {cells:?}"),
                });
            }
            seen[value as usize] = true;
        }
        Ok(Self { cells })
    }

    pub fn cells(&self) -> &[u8; CELLS] {
        &self.cells
    }

    /// Cells as rows, for display projections.
    pub fn rows(&self) -> [[u8; SIDE]; SIDE] {
        let mut rows = [[0u8; SIDE]; SIDE];
        for row in 0..SIDE {
            for col in 0..SIDE {
                rows[row][col] = self.get(row, col);
            }
        }
        rows
    }

    fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * SIDE + col]
    }

    /// Position of the empty slot. The permutation invariant guarantees it
    /// exists; a miss means a prior bug corrupted the board.
    pub fn locate_zero(&self) -> Result<(usize, usize), GameError> {
        for row in 0..SIDE {
            for col in 0..SIDE {
                if self.get(row, col) == 0 {
                    return Ok((row, col));
                }
            }
        }
        tracing::error!(board = ?self.cells, "board has no empty slot");
        Err(GameError::CorruptState {
            detail: "no empty slot on board".to_string(),
        })
    }

    /// A tile can move in `direction` iff the empty slot has a neighbor on
    /// the opposite side: moving a tile up pulls it from below the slot, and
    /// so on.
    pub fn is_move_legal(&self, direction: Direction) -> bool {
        let Ok((zero_row, zero_col)) = self.locate_zero() else {
            return false;
        };
        match direction {
            Direction::Up => zero_row < SIDE - 1,
            Direction::Down => zero_row > 0,
            Direction::Left => zero_col < SIDE - 1,
            Direction::Right => zero_col > 0,
        }
    }

    /// Swap the empty slot with the adjacent tile implied by `direction`.
    pub fn apply_move(&mut self, direction: Direction) -> Result<(), GameError> {
        let (zero_row, zero_col) = self.locate_zero()?;
        let (tile_row, tile_col) = match direction {
            Direction::Up if zero_row < SIDE - 1 => (zero_row + 1, zero_col),
            Direction::Down if zero_row > 0 => (zero_row - 1, zero_col),
            Direction::Left if zero_col < SIDE - 1 => (zero_row, zero_col + 1),
            Direction::Right if zero_col > 0 => (zero_row, zero_col - 1),
            _ => return Err(GameError::IllegalMove),
        };
        self.cells
            .swap(zero_row * SIDE + zero_col, tile_row * SIDE + tile_col);
        Ok(())
    }

    /// True iff the first three rows hold 1..12 row-major and the bottom row
    /// starts 13, 14, 15. The bottom-right cell is not checked: with the
    /// other fifteen tiles placed, the permutation invariant forces it to 0.
    pub fn is_solved(&self) -> bool {
        for row in 0..SIDE - 1 {
            for col in 0..SIDE {
                if self.get(row, col) != (row * SIDE + col + 1) as u8 {
                    return false;
                }
            }
        }
        for col in 0..SIDE - 1 {
            if self.get(SIDE - 1, col) != (SIDE * (SIDE - 1) + col + 1) as u8 {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn assert_permutation(board: &Board) {
        let mut seen = [false; CELLS];
        for &value in board.cells() {
            assert!(!seen[value as usize], "duplicate cell value {value}");
            seen[value as usize] = true;
        }
    }

    #[test]
    fn test_solved_board_layout() {
        let board = Board::solved();
        assert_eq!(
            board.rows(),
            [[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12], [13, 14, 15, 0]]
        );
        assert!(board.is_solved());
        assert_eq!(board.locate_zero().unwrap(), (3, 3));
    }

    #[test]
    fn test_shuffled_is_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let board = Board::shuffled_with(&mut rng);
            assert_permutation(&board);
            board.locate_zero().unwrap();
        }
    }

    #[test]
    fn test_try_from_cells_rejects_non_permutations() {
        let mut cells = *Board::solved().cells();
        cells[0] = 2; // duplicate 2, missing 1
        assert!(matches!(
            Board::try_from_cells(cells),
            Err(GameError::CorruptState { .. })
        ));

        let mut cells = *Board::solved().cells();
        cells[15] = 16; // out of range
        assert!(matches!(
            Board::try_from_cells(cells),
            Err(GameError::CorruptState { .. })
        ));

        assert!(Board::try_from_cells(*Board::solved().cells()).is_ok());
    }

    #[test]
    fn test_legality_at_bottom_right_corner() {
        // Solved board: empty slot in the last row, last column.
        let board = Board::solved();
        assert!(!board.is_move_legal(Direction::Up));
        assert!(!board.is_move_legal(Direction::Left));
        assert!(board.is_move_legal(Direction::Down));
        assert!(board.is_move_legal(Direction::Right));
    }

    #[test]
    fn test_legality_at_top_left_corner() {
        // Rotate the solved layout so the empty slot is at (0, 0).
        let board = Board::try_from_cells([
            0, 1, 2, 3, //
            4, 5, 6, 7, //
            8, 9, 10, 11, //
            12, 13, 14, 15,
        ])
        .unwrap();
        assert!(board.is_move_legal(Direction::Up));
        assert!(board.is_move_legal(Direction::Left));
        assert!(!board.is_move_legal(Direction::Down));
        assert!(!board.is_move_legal(Direction::Right));
    }

    #[test]
    fn test_apply_move_swaps_with_adjacent_tile() {
        let mut board = Board::solved();
        // Tile 12 sits above the empty slot; moving it down fills the slot.
        board.apply_move(Direction::Down).unwrap();
        assert_eq!(
            board.rows(),
            [[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 0], [13, 14, 15, 12]]
        );
        assert_permutation(&board);
        assert_eq!(board.locate_zero().unwrap(), (2, 3));
    }

    #[test]
    fn test_apply_illegal_move_fails_and_leaves_board_unchanged() {
        let mut board = Board::solved();
        let before = board;
        assert_eq!(board.apply_move(Direction::Up), Err(GameError::IllegalMove));
        assert_eq!(board, before);
    }

    #[test]
    fn test_up_then_down_round_trips() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut tested = 0;
        while tested < 20 {
            let start = Board::shuffled_with(&mut rng);
            if !(start.is_move_legal(Direction::Up) && start.is_move_legal(Direction::Down)) {
                continue;
            }
            let mut board = start;
            board.apply_move(Direction::Up).unwrap();
            board.apply_move(Direction::Down).unwrap();
            assert_eq!(board, start);
            tested += 1;
        }
    }

    #[test]
    fn test_moves_preserve_permutation() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut board = Board::shuffled_with(&mut rng);
        let directions = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ];
        for _ in 0..200 {
            let direction = directions[rng.gen_range(0..directions.len())];
            if board.is_move_legal(direction) {
                board.apply_move(direction).unwrap();
                assert_permutation(&board);
            } else {
                assert_eq!(board.apply_move(direction), Err(GameError::IllegalMove));
            }
        }
    }

    #[test]
    fn test_is_solved_false_for_any_single_swap() {
        let solved = Board::solved();
        for i in 0..CELLS {
            for j in (i + 1)..CELLS {
                let mut cells = *solved.cells();
                cells.swap(i, j);
                let board = Board::try_from_cells(cells).unwrap();
                assert!(
                    !board.is_solved(),
                    "swap of cells {i} and {j} should not be solved"
                );
            }
        }
    }
}
