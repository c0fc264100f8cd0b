//! Engine module: N×N 2048 board, move/merge and spawn operations.
//!
//! - `Board` is the grid state with useful methods.
//! - Free functions mirror the methods when convenient (e.g., `shift`).
//! - The line-level merge logic lives in `ops` to keep things tidy.

mod ops;
pub mod state;

pub use state::{Board, EmptyCells, Move, MoveOutcome, Position};

pub use ops::{count_empty, has_won, is_game_over, shift, tile_value};
