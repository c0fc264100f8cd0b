//! Best-score persistence collaborator.
//!
//! The session only talks to storage through [`BestScoreStore`]. Errors are
//! returned to the session, which logs and drops them; they never change
//! game state.

use anyhow::Result;

/// Key under which front ends persist the best score.
pub const BEST_SCORE_KEY: &str = "bestScore";

/// Loads and saves the best score seen across sessions.
pub trait BestScoreStore {
    fn load_best_score(&mut self) -> Result<u64>;
    fn save_best_score(&mut self, score: u64) -> Result<()>;
}

impl<S: BestScoreStore + ?Sized> BestScoreStore for Box<S> {
    fn load_best_score(&mut self) -> Result<u64> {
        (**self).load_best_score()
    }

    fn save_best_score(&mut self, score: u64) -> Result<()> {
        (**self).save_best_score(score)
    }
}

impl<S: BestScoreStore + ?Sized> BestScoreStore for &mut S {
    fn load_best_score(&mut self) -> Result<u64> {
        (**self).load_best_score()
    }

    fn save_best_score(&mut self, score: u64) -> Result<()> {
        (**self).save_best_score(score)
    }
}

/// In-process store; nothing outlives the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: Option<u64>,
    saves: usize,
}

impl MemoryStore {
    /// Store pre-seeded with a best score.
    pub fn with_best(best: u64) -> Self {
        Self { best: Some(best), saves: 0 }
    }

    /// Last saved (or seeded) value.
    pub fn best(&self) -> Option<u64> {
        self.best
    }

    /// How many times `save_best_score` was called.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl BestScoreStore for MemoryStore {
    fn load_best_score(&mut self) -> Result<u64> {
        Ok(self.best.unwrap_or(0))
    }

    fn save_best_score(&mut self, score: u64) -> Result<()> {
        self.best = Some(score);
        self.saves += 1;
        Ok(())
    }
}

/// Persistence disabled or unavailable: best score starts at 0 and writes
/// are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl BestScoreStore for NullStore {
    fn load_best_score(&mut self) -> Result<u64> {
        Ok(0)
    }

    fn save_best_score(&mut self, _score: u64) -> Result<()> {
        Ok(())
    }
}

/// Leniently parse a stored best score. Integers are taken as-is, finite
/// non-negative decimals are truncated, anything else reads as 0.
///
/// ```
/// use twenty48_core::store::parse_best_score;
/// assert_eq!(parse_best_score("1024"), 1024);
/// assert_eq!(parse_best_score(" 12.9 "), 12);
/// assert_eq!(parse_best_score("NaN"), 0);
/// assert_eq!(parse_best_score("-5"), 0);
/// ```
pub fn parse_best_score(raw: &str) -> u64 {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<u64>() {
        return v;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v as u64,
        _ => 0,
    }
}
