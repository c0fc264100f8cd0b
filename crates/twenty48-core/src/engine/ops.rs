use rand::Rng;

use super::state::{Board, Move, MoveOutcome, Score, Tile};

/// Probability of spawning a 4 when the caller hands us a nonsensical value.
pub(crate) const DEFAULT_FOUR_PROBABILITY: f64 = 0.1;

/// Largest exponent a cell may hold (2^63, the top power of two in a `u64`).
/// Tiles at the cap never merge.
pub(crate) const MAX_TILE: Tile = 63;

/// Slide/merge tiles in the given direction. No randomness.
///
/// `changed` is a snapshot comparison against `board`, not a flag tracked
/// while compacting.
pub fn shift(board: &Board, direction: Move) -> MoveOutcome {
    let size = board.size;
    let mut cells = board.cells.clone();
    let mut score_delta: Score = 0;
    let mut line = Vec::with_capacity(size);
    for line_idx in 0..size {
        line.clear();
        line.extend(line_indices(size, direction, line_idx).map(|i| board.cells[i]));
        let (merged, gained) = merge_line(&line);
        score_delta = score_delta.saturating_add(gained);
        for (dst, tile) in line_indices(size, direction, line_idx).zip(merged) {
            cells[dst] = tile;
        }
    }
    let moved = Board { size, cells };
    let changed = moved != *board;
    MoveOutcome {
        board: moved,
        score_delta,
        changed,
    }
}

/// Cell indices of one row/column, starting at the edge tiles move toward.
fn line_indices(size: usize, direction: Move, line_idx: usize) -> impl Iterator<Item = usize> {
    (0..size).map(move |step| {
        let (row, col) = match direction {
            Move::Left => (line_idx, step),
            Move::Right => (line_idx, size - 1 - step),
            Move::Up => (step, line_idx),
            Move::Down => (size - 1 - step, line_idx),
        };
        row * size + col
    })
}

/// Compact a line toward index 0, merging each equal adjacent pair at most once.
/// Returns the new line (same length) and the value of all merged tiles.
pub(crate) fn merge_line(line: &[Tile]) -> (Vec<Tile>, Score) {
    let mut out = Vec::with_capacity(line.len());
    let mut score: Score = 0;
    let mut tiles = line.iter().copied().filter(|&t| t != 0).peekable();
    while let Some(tile) = tiles.next() {
        if tile < MAX_TILE && tiles.peek() == Some(&tile) {
            // Consume the partner so the merged tile can't merge again.
            tiles.next();
            out.push(tile + 1);
            score = score.saturating_add(tile_value(tile + 1));
        } else {
            out.push(tile);
        }
    }
    out.resize(line.len(), 0);
    (out, score)
}

/// True if there is no empty cell and no horizontally or vertically adjacent
/// equal pair that can still merge.
pub fn is_game_over(board: &Board) -> bool {
    if count_empty(board) > 0 {
        return false;
    }
    let size = board.size;
    for row in 0..size {
        for col in 0..size {
            let tile = board.cells[row * size + col];
            if tile >= MAX_TILE {
                continue;
            }
            if col + 1 < size && board.cells[row * size + col + 1] == tile {
                return false;
            }
            if row + 1 < size && board.cells[(row + 1) * size + col] == tile {
                return false;
            }
        }
    }
    true
}

/// True if any cell holds exactly `target`. A target of 0 never wins.
pub fn has_won(board: &Board, target: u64) -> bool {
    target != 0 && board.cells.iter().any(|&t| tile_value(t) == target)
}

/// Count the number of zero tiles.
pub fn count_empty(board: &Board) -> usize {
    board.cells.iter().filter(|&&t| t == 0).count()
}

/// Return the cell's actual value (0 if empty), e.g., 2, 4, 8, ...
#[inline]
pub fn tile_value(tile: u8) -> u64 {
    if tile == 0 {
        0
    } else {
        1_u64 << tile
    }
}

/// Inverse of `tile_value`; `None` for anything that is not 0 or 2^k with
/// 1 <= k <= `MAX_TILE`.
pub(crate) fn value_to_tile(value: u64) -> Option<Tile> {
    match value {
        0 => Some(0),
        1 => None,
        v if v.is_power_of_two() && v.trailing_zeros() <= MAX_TILE as u32 => {
            Some(v.trailing_zeros() as Tile)
        }
        _ => None,
    }
}

pub(crate) fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R, four_probability: f64) -> Tile {
    let p = if four_probability.is_finite() {
        four_probability.clamp(0.0, 1.0)
    } else {
        DEFAULT_FOUR_PROBABILITY
    };
    if rng.gen_bool(p) { 2 } else { 1 }
}

pub(crate) fn format_val(val: &u8) -> String {
    match val {
        0 => String::from("       "),
        &x => {
            let mut x = tile_value(x).to_string();
            while x.len() < 7 {
                match x.len() {
                    6 => x = format!(" {}", x),
                    _ => x = format!(" {} ", x),
                }
            }
            x
        }
    }
}
