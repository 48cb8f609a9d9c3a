use serde::{Deserialize, Serialize};

use crate::errors::GameError;

/// Direction a numbered tile travels into the empty slot. The empty slot
/// moves the opposite way. The wire codes are 0 up, 1 down, 2 left, 3 right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Decode a wire integer into a direction.
    pub fn from_code(code: i64) -> Result<Self, GameError> {
        match code {
            0 => Ok(Direction::Up),
            1 => Ok(Direction::Down),
            2 => Ok(Direction::Left),
            3 => Ok(Direction::Right),
            _ => Err(GameError::InvalidDirection { code }),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}
