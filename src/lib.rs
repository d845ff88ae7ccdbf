//! Best-move search for a simplified game of checkers.
//!
//! A [`Board`] is a plain 8x8 value; [`find_best_move`] runs a fixed-depth
//! alpha-beta search over single steps and single jumps and returns the
//! move it prefers for the given side.

pub mod board;
pub mod engine;
pub mod error;

pub use board::{initial_board, Board, Cell, Move, Side, Square};
pub use engine::{evaluate, find_best_move, minimax, search, Engine, Score, SearchResult};
pub use error::{EngineError, Result};
