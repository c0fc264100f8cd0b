use serde::{Deserialize, Serialize};

use crate::engine::Board;

/// Tunable game rules. Every field falls back to the classic game when
/// omitted from a config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    /// Smallest board size `new_game` accepts.
    #[serde(default = "defaults::min_size")]
    pub min_size: usize,
    /// Largest board size `new_game` accepts.
    #[serde(default = "defaults::max_size")]
    pub max_size: usize,

    /// Tile value that wins the game.
    #[serde(default = "defaults::win_target")]
    pub win_target: u64,

    /// Chance that a spawned tile is a 4 instead of a 2.
    #[serde(default = "defaults::four_probability")]
    pub four_probability: f64,

    /// Whether a won game may continue until it is lost.
    #[serde(default = "defaults::allow_continue")]
    pub allow_continue: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            min_size: defaults::min_size(),
            max_size: defaults::max_size(),
            win_target: defaults::win_target(),
            four_probability: defaults::four_probability(),
            allow_continue: defaults::allow_continue(),
        }
    }
}

impl Rules {
    /// True if a game may be started on a `size` x `size` board.
    pub fn accepts_size(&self, size: usize) -> bool {
        (self.min_size..=self.max_size).contains(&size)
            && (Board::MIN_SIZE..=Board::MAX_SIZE).contains(&size)
    }

    /// Resolve the 4-spawn probability to a sane default (0.1) if out of [0, 1].
    pub fn four_probability_or_default(&self) -> f64 {
        match self.four_probability {
            p if p.is_finite() && (0.0..=1.0).contains(&p) => p,
            _ => defaults::four_probability(),
        }
    }

    /// Resolve the win target to 2048 unless it is a tile value (a power of two >= 4).
    pub fn win_target_or_default(&self) -> u64 {
        match self.win_target {
            t if t >= 4 && t.is_power_of_two() => t,
            _ => defaults::win_target(),
        }
    }
}

mod defaults {
    pub fn min_size() -> usize { 3 }
    pub fn max_size() -> usize { 5 }
    pub fn win_target() -> u64 { 2048 }
    pub fn four_probability() -> f64 { 0.1 }
    pub fn allow_continue() -> bool { true }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_range_is_clamped_to_board_limits() {
        let rules = Rules::default();
        assert!(!rules.accepts_size(2));
        assert!(rules.accepts_size(3));
        assert!(rules.accepts_size(5));
        assert!(!rules.accepts_size(6));

        let wide = Rules { min_size: 0, max_size: 100, ..Rules::default() };
        assert!(!wide.accepts_size(1));
        assert!(wide.accepts_size(8));
        assert!(!wide.accepts_size(9));
    }

    #[test]
    fn invalid_values_fall_back() {
        let rules = Rules { four_probability: 1.5, win_target: 1000, ..Rules::default() };
        assert_eq!(rules.four_probability_or_default(), 0.1);
        assert_eq!(rules.win_target_or_default(), 2048);

        let rules = Rules { four_probability: 0.25, win_target: 512, ..Rules::default() };
        assert_eq!(rules.four_probability_or_default(), 0.25);
        assert_eq!(rules.win_target_or_default(), 512);
    }
}
