use rand::Rng;
use std::fmt;

use super::ops;
use crate::error::BoardError;
use serde::{Deserialize, Serialize};

// Cells hold base-2 exponents: 0 is empty, 1 is a 2, 2 is a 4, ...
pub(crate) type Tile = u8;
pub(crate) type Score = u64;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Parse a direction token (`w`/`a`/`s`/`d`, vim-style `k`/`h`/`j`/`l`,
    /// or the full word). Anything else yields `None`.
    ///
    /// ```
    /// use twenty48_core::Move;
    /// assert_eq!(Move::from_token("W"), Some(Move::Up));
    /// assert_eq!(Move::from_token(" left "), Some(Move::Left));
    /// assert_eq!(Move::from_token("x"), None);
    /// ```
    pub fn from_token(token: &str) -> Option<Move> {
        match token.trim().to_ascii_lowercase().as_str() {
            "w" | "k" | "up" => Some(Move::Up),
            "s" | "j" | "down" => Some(Move::Down),
            "a" | "h" | "left" => Some(Move::Left),
            "d" | "l" | "right" => Some(Move::Right),
            _ => None,
        }
    }
}

/// Row/column coordinate of a cell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

/// Result of sliding a board in one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub board: Board,
    /// Sum of the values of every tile produced by a merge.
    pub score_delta: Score,
    /// True if any cell differs from the board the move started from.
    pub changed: bool,
}

/// Square 2048 board of `size * size` cells, stored row-major.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    pub(crate) size: usize,
    pub(crate) cells: Vec<Tile>,
}

impl Default for Board {
    fn default() -> Self {
        Board {
            size: Board::DEFAULT_SIZE,
            cells: vec![0; Board::DEFAULT_SIZE * Board::DEFAULT_SIZE],
        }
    }
}

impl Board {
    pub const MIN_SIZE: usize = 2;
    pub const MAX_SIZE: usize = 8;
    pub const DEFAULT_SIZE: usize = 4;

    /// Construct an empty `size` x `size` board.
    ///
    /// ```
    /// use twenty48_core::Board;
    /// let b = Board::new(5).unwrap();
    /// assert_eq!(b.count_empty(), 25);
    /// assert!(Board::new(1).is_err());
    /// ```
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if !(Board::MIN_SIZE..=Board::MAX_SIZE).contains(&size) {
            return Err(BoardError::InvalidSize {
                size,
                min: Board::MIN_SIZE,
                max: Board::MAX_SIZE,
            });
        }
        Ok(Board {
            size,
            cells: vec![0; size * size],
        })
    }

    /// Build a board from row-major tile values (0, 2, 4, 8, ...).
    pub fn from_values(size: usize, values: &[u64]) -> Result<Self, BoardError> {
        let mut board = Board::new(size)?;
        if values.len() != board.cells.len() {
            return Err(BoardError::WrongLength {
                expected: board.cells.len(),
                got: values.len(),
            });
        }
        for (cell, &value) in board.cells.iter_mut().zip(values) {
            *cell = ops::value_to_tile(value).ok_or(BoardError::InvalidTile(value))?;
        }
        Ok(board)
    }

    /// Build a board from a slice of equally long rows. Every row must be as
    /// long as there are rows.
    ///
    /// ```
    /// use twenty48_core::Board;
    /// let b = Board::from_rows(&[[2, 0], [0, 4]]).unwrap();
    /// assert_eq!(b.values(), vec![2, 0, 0, 4]);
    /// ```
    pub fn from_rows<R: AsRef<[u64]>>(rows: &[R]) -> Result<Self, BoardError> {
        let size = rows.len();
        if let Some(row) = rows.iter().find(|row| row.as_ref().len() != size) {
            return Err(BoardError::WrongLength {
                expected: size,
                got: row.as_ref().len(),
            });
        }
        let values: Vec<u64> = rows
            .iter()
            .flat_map(|row| row.as_ref().iter().copied())
            .collect();
        Board::from_values(size, &values)
    }

    /// Side length of the board.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Tile value at `pos` (0 if empty), or `None` if `pos` is off the board.
    #[inline]
    pub fn value(&self, pos: Position) -> Option<u64> {
        if pos.row >= self.size || pos.col >= self.size {
            return None;
        }
        Some(ops::tile_value(self.cells[pos.row * self.size + pos.col]))
    }

    /// Row-major tile values.
    pub fn values(&self) -> Vec<u64> {
        self.cells.iter().map(|&t| ops::tile_value(t)).collect()
    }

    /// Tile values grouped by row.
    pub fn rows(&self) -> Vec<Vec<u64>> {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().map(|&t| ops::tile_value(t)).collect())
            .collect()
    }

    /// Lazily iterate over the coordinates of empty cells, row-major.
    /// The iterator is `Clone`, so it can be restarted from any point.
    pub fn empty_cells(&self) -> EmptyCells<'_> {
        EmptyCells {
            cells: &self.cells,
            size: self.size,
            idx: 0,
        }
    }

    /// Count the number of empty cells on the board.
    #[inline]
    pub fn count_empty(&self) -> usize {
        ops::count_empty(self)
    }

    /// Number of non-empty cells.
    #[inline]
    pub fn tile_count(&self) -> usize {
        self.cells.len() - self.count_empty()
    }

    /// Sum of all tile values.
    pub fn tile_sum(&self) -> u64 {
        self.cells.iter().map(|&t| ops::tile_value(t)).sum()
    }

    /// Return the highest tile value (e.g., 2048) present on the board, 0 if empty.
    pub fn highest_tile(&self) -> u64 {
        self.cells
            .iter()
            .copied()
            .max()
            .map(ops::tile_value)
            .unwrap_or(0)
    }

    /// Return the board resulting from sliding/merging tiles in `dir` (no random insert).
    ///
    /// ```
    /// use twenty48_core::{Board, Move};
    /// let b = Board::from_rows(&[[2, 2, 2, 2], [0; 4], [0; 4], [0; 4]]).unwrap();
    /// let out = b.shift(Move::Left);
    /// assert_eq!(out.board.rows()[0], vec![4, 4, 0, 0]);
    /// assert_eq!(out.score_delta, 8);
    /// assert!(out.changed);
    /// ```
    #[inline]
    pub fn shift(&self, dir: Move) -> MoveOutcome {
        ops::shift(self, dir)
    }

    /// Insert a 2 (or a 4 with probability `four_probability`) into a uniformly
    /// chosen empty cell, using the provided RNG. Returns where the tile landed,
    /// or `None` when the board is full.
    ///
    /// Deterministic example using a seeded RNG:
    /// ```
    /// use twenty48_core::Board;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let mut b = Board::new(4).unwrap();
    /// assert!(b.spawn_random_tile(&mut rng, 0.1).is_some());
    /// assert!(b.spawn_random_tile(&mut rng, 0.1).is_some());
    /// assert_eq!(b.count_empty(), 14);
    /// ```
    pub fn spawn_random_tile<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        four_probability: f64,
    ) -> Option<Position> {
        let empty = self.count_empty();
        if empty == 0 {
            return None;
        }
        let index = rng.gen_range(0..empty);
        let pos = self.empty_cells().nth(index)?;
        self.cells[pos.row * self.size + pos.col] = ops::generate_random_tile(rng, four_probability);
        Some(pos)
    }

    /// Return true if the board is full and no two neighbours can merge.
    ///
    /// ```
    /// use twenty48_core::Board;
    /// assert!(!Board::new(4).unwrap().is_game_over());
    /// let stuck = Board::from_rows(&[[2, 4], [4, 2]]).unwrap();
    /// assert!(stuck.is_game_over());
    /// ```
    #[inline]
    pub fn is_game_over(&self) -> bool {
        ops::is_game_over(self)
    }

    /// Return true if any cell holds exactly `target`.
    #[inline]
    pub fn has_won(&self, target: u64) -> bool {
        ops::has_won(self, target)
    }

    /// Directions in which a move would change the board.
    pub fn legal_moves(&self) -> Vec<Move> {
        Move::ALL
            .into_iter()
            .filter(|&dir| self.shift(dir).changed)
            .collect()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("size", &self.size)
            .field("rows", &self.rows())
            .finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(self.size * 8 - 1);
        for (idx, row) in self.cells.chunks(self.size).enumerate() {
            if idx > 0 {
                writeln!(f, "{rule}")?;
            }
            let cells: Vec<String> = row.iter().map(ops::format_val).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

/// Iterator over the coordinates of empty cells in row-major order.
#[derive(Clone, Debug)]
pub struct EmptyCells<'a> {
    cells: &'a [Tile],
    size: usize,
    idx: usize,
}

impl Iterator for EmptyCells<'_> {
    type Item = Position;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        while self.idx < self.cells.len() {
            let idx = self.idx;
            self.idx += 1;
            if self.cells[idx] == 0 {
                return Some(Position::new(idx / self.size, idx % self.size));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn rejects_invalid_construction() {
        assert_eq!(
            Board::new(9),
            Err(BoardError::InvalidSize { size: 9, min: 2, max: 8 })
        );
        assert_eq!(
            Board::from_values(2, &[2, 3, 0, 0]),
            Err(BoardError::InvalidTile(3))
        );
        assert_eq!(
            Board::from_values(2, &[1, 0, 0, 0]),
            Err(BoardError::InvalidTile(1))
        );
        assert_eq!(
            Board::from_values(2, &[2, 0, 0]),
            Err(BoardError::WrongLength { expected: 4, got: 3 })
        );
        assert_eq!(
            Board::from_rows(&[vec![2u64, 0, 0], vec![0]]),
            Err(BoardError::WrongLength { expected: 2, got: 3 })
        );
        assert_eq!(
            Board::from_rows(&[vec![2u64, 0], vec![0, 0, 4]]),
            Err(BoardError::WrongLength { expected: 2, got: 3 })
        );
    }

    #[test]
    fn empty_cells_is_lazy_and_restartable() {
        let b = Board::from_rows(&[[2, 0, 4], [0, 8, 0], [16, 32, 0]]).unwrap();
        let empties = b.empty_cells();
        let first: Vec<_> = empties.clone().collect();
        assert_eq!(
            first,
            vec![
                Position::new(0, 1),
                Position::new(1, 0),
                Position::new(1, 2),
                Position::new(2, 2)
            ]
        );
        let again: Vec<_> = empties.collect();
        assert_eq!(first, again);

        let mut partial = b.empty_cells();
        partial.next();
        let resumed = partial.clone();
        assert_eq!(partial.count(), 3);
        assert_eq!(resumed.count(), 3);
    }

    #[test]
    fn spawn_on_full_board_is_noop() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut b = Board::from_rows(&[[2, 4], [8, 16]]).unwrap();
        let before = b.clone();
        assert_eq!(b.spawn_random_tile(&mut rng, 0.1), None);
        assert_eq!(b, before);
    }

    #[test]
    fn spawn_fills_the_only_empty_cell() {
        let rows = [
            [2, 4, 8, 16],
            [32, 64, 128, 256],
            [512, 1024, 0, 4],
            [8, 16, 32, 64],
        ];
        let mut twos = 0;
        let mut fours = 0;
        for seed in 0..10_000u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut b = Board::from_rows(&rows).unwrap();
            let pos = b.spawn_random_tile(&mut rng, 0.1);
            assert_eq!(pos, Some(Position::new(2, 2)));
            assert_eq!(b.count_empty(), 0);
            match b.value(Position::new(2, 2)) {
                Some(2) => twos += 1,
                Some(4) => fours += 1,
                other => panic!("unexpected spawn {other:?}"),
            }
        }
        assert_eq!(twos + fours, 10_000);
        assert!((800..=1200).contains(&fours), "fours = {fours}");
    }

    #[test]
    fn spawn_respects_probability_extremes() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut b = Board::new(3).unwrap();
        for _ in 0..9 {
            b.spawn_random_tile(&mut rng, 0.0);
        }
        assert!(b.values().iter().all(|&v| v == 2));

        let mut b = Board::new(3).unwrap();
        for _ in 0..9 {
            b.spawn_random_tile(&mut rng, 1.0);
        }
        assert!(b.values().iter().all(|&v| v == 4));
    }

    #[test]
    fn queries() {
        let b = Board::from_rows(&[[2, 0, 0], [0, 64, 0], [4, 0, 2]]).unwrap();
        assert_eq!(b.size(), 3);
        assert_eq!(b.tile_count(), 4);
        assert_eq!(b.tile_sum(), 72);
        assert_eq!(b.highest_tile(), 64);
        assert_eq!(b.value(Position::new(1, 1)), Some(64));
        assert_eq!(b.value(Position::new(3, 0)), None);
        assert_eq!(b.cells, vec![1, 0, 0, 0, 6, 0, 2, 0, 1]);
        assert_eq!(Board::default().highest_tile(), 0);
    }

    #[test]
    fn legal_moves_on_stuck_and_open_boards() {
        let stuck = Board::from_rows(&[[2, 4], [4, 2]]).unwrap();
        assert!(stuck.legal_moves().is_empty());
        let corner = Board::from_rows(&[[2, 0], [0, 0]]).unwrap();
        assert_eq!(corner.legal_moves(), vec![Move::Down, Move::Right]);
    }

    #[test]
    fn display_renders_grid() {
        let b = Board::from_rows(&[[2, 0], [0, 2048]]).unwrap();
        let text = b.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "   2   |       ");
        assert_eq!(lines[1], "-".repeat(15));
        assert_eq!(lines[2], "       |  2048 ");
    }
}
