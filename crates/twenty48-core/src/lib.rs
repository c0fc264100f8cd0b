//! Core of the 2048 game: an N×N board engine plus the session controller
//! that drives it.
//!
//! - [`engine`] holds the board, the move/merge engine and tile spawning.
//! - [`session`] owns one game's board, score and status.
//! - [`store`] defines the best-score persistence collaborator.
//! - [`rules`] carries the tunable game rules.

pub mod engine;
pub mod error;
pub mod rules;
pub mod session;
pub mod store;

pub use engine::{Board, Move, MoveOutcome, Position};
pub use error::BoardError;
pub use rules::Rules;
pub use session::{GameSession, GameStatus, TurnReport};
pub use store::{BestScoreStore, MemoryStore, NullStore};
