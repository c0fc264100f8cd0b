//! One game session: board, score, best score and status, driven one input
//! at a time.

use log::{debug, info, warn};
use rand::Rng;

use crate::engine::{Board, Move, Position};
use crate::error::BoardError;
use crate::rules::Rules;
use crate::store::BestScoreStore;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// No game started yet.
    Idle,
    Playing,
    /// Target tile reached; moves are ignored until `continue_playing` or `new_game`.
    Won,
    /// No legal move remains; terminal until `new_game`.
    Lost,
}

/// What a single accepted move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    pub direction: Move,
    pub score_delta: u64,
    pub changed: bool,
    /// Cell that received the post-move tile, if one was spawned.
    pub spawned: Option<Position>,
    pub status: GameStatus,
}

/// Owns the state of one game and the collaborators it needs: a random
/// source for spawns and a store for the best score.
pub struct GameSession<R, S> {
    rules: Rules,
    rng: R,
    store: S,
    board: Board,
    score: u64,
    best_score: u64,
    status: GameStatus,
    keep_playing: bool,
}

impl<R: Rng, S: BestScoreStore> GameSession<R, S> {
    /// Create an idle session, loading the best score from `store`.
    /// A store that fails to load counts as a best score of 0.
    pub fn new(rules: Rules, rng: R, mut store: S) -> Self {
        let best_score = match store.load_best_score() {
            Ok(best) => best,
            Err(err) => {
                warn!("best score unavailable, starting from 0: {err:#}");
                0
            }
        };
        Self {
            rules,
            rng,
            store,
            board: Board::default(),
            score: 0,
            best_score,
            status: GameStatus::Idle,
            keep_playing: false,
        }
    }

    /// Start a fresh `size` x `size` game with two spawned tiles.
    ///
    /// Sizes the rules don't accept are rejected and the current game is left
    /// untouched.
    pub fn new_game(&mut self, size: usize) -> Result<(), BoardError> {
        if !self.rules.accepts_size(size) {
            return Err(BoardError::InvalidSize {
                size,
                min: self.rules.min_size.max(Board::MIN_SIZE),
                max: self.rules.max_size.min(Board::MAX_SIZE),
            });
        }
        let mut board = Board::new(size)?;
        let p = self.rules.four_probability_or_default();
        board.spawn_random_tile(&mut self.rng, p);
        board.spawn_random_tile(&mut self.rng, p);

        self.board = board;
        self.score = 0;
        self.status = GameStatus::Playing;
        self.keep_playing = false;
        info!("new {size}x{size} game, best score {}", self.best_score);
        Ok(())
    }

    /// Apply one move. Returns `None` when no game is in progress.
    ///
    /// A move that changes nothing spawns nothing and leaves the score alone.
    pub fn play(&mut self, direction: Move) -> Option<TurnReport> {
        if self.status != GameStatus::Playing {
            debug!("ignoring {direction:?} while {:?}", self.status);
            return None;
        }
        let outcome = self.board.shift(direction);
        if !outcome.changed {
            debug!("{direction:?} changed nothing");
            return Some(TurnReport {
                direction,
                score_delta: 0,
                changed: false,
                spawned: None,
                status: self.status,
            });
        }

        self.board = outcome.board;
        self.score = self.score.saturating_add(outcome.score_delta);
        let spawned = self
            .board
            .spawn_random_tile(&mut self.rng, self.rules.four_probability_or_default());
        debug!(
            "{direction:?}: +{} (score {}), spawned at {spawned:?}",
            outcome.score_delta, self.score
        );
        self.record_best_score();

        let target = self.rules.win_target_or_default();
        if !self.keep_playing && self.board.has_won(target) {
            info!("reached {target} with score {}", self.score);
            self.status = GameStatus::Won;
        } else if self.board.is_game_over() {
            info!("game over with score {}", self.score);
            self.status = GameStatus::Lost;
        }

        Some(TurnReport {
            direction,
            score_delta: outcome.score_delta,
            changed: true,
            spawned,
            status: self.status,
        })
    }

    /// Apply a move given as a direction token. Unknown tokens are ignored.
    pub fn play_key(&mut self, token: &str) -> Option<TurnReport> {
        match Move::from_token(token) {
            Some(direction) => self.play(direction),
            None => {
                debug!("ignoring unknown direction {token:?}");
                None
            }
        }
    }

    /// Keep playing after a win. Returns false if the session was not won or
    /// the rules forbid continuing.
    pub fn continue_playing(&mut self) -> bool {
        if self.status != GameStatus::Won || !self.rules.allow_continue {
            return false;
        }
        self.keep_playing = true;
        self.status = if self.board.is_game_over() {
            GameStatus::Lost
        } else {
            GameStatus::Playing
        };
        true
    }

    fn record_best_score(&mut self) {
        if self.score <= self.best_score {
            return;
        }
        self.best_score = self.score;
        if let Err(err) = self.store.save_best_score(self.score) {
            warn!("failed to persist best score {}: {err:#}", self.score);
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
