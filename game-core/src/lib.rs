pub mod board;
pub mod game;
pub mod stats;

// Re-export main components
pub use board::*;
pub use game::*;
pub use stats::*;
