//! Text rendering and line-based input for the terminal front end.

use rand::Rng;
use twenty48_core::{BestScoreStore, GameSession, GameStatus, Move};

pub const HELP: &str = "\
Moves:     w/a/s/d, k/h/j/l or up/left/down/right
New game:  n [size]
Continue:  c (after reaching the target)
Quit:      q";

/// One parsed line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Move),
    /// Start over, optionally on a different board size.
    NewGame(Option<usize>),
    Continue,
    Help,
    Quit,
}

/// Map a line of input to a command. Unrecognised lines yield `None`.
pub fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let head = words.next()?.to_ascii_lowercase();
    let arg = words.next();
    if words.next().is_some() {
        return None;
    }
    match (head.as_str(), arg) {
        ("q" | "quit" | "exit", None) => Some(Command::Quit),
        ("c" | "continue", None) => Some(Command::Continue),
        ("?" | "help", None) => Some(Command::Help),
        ("n" | "new", None) => Some(Command::NewGame(None)),
        ("n" | "new", Some(size)) => size.parse().ok().map(|s| Command::NewGame(Some(s))),
        (token, None) => Move::from_token(token).map(Command::Move),
        _ => None,
    }
}

/// Render the score line, the grid and a status hint.
pub fn render<R: Rng, S: BestScoreStore>(session: &GameSession<R, S>) -> String {
    let mut out = format!(
        "Score: {}   Best: {}\n\n{}\n",
        session.score(),
        session.best_score(),
        session.board()
    );
    let hint = match session.status() {
        GameStatus::Idle => "Type 'n' to start a game.".to_string(),
        GameStatus::Playing => String::new(),
        GameStatus::Won if session.rules().allow_continue => format!(
            "You reached {}! Type 'c' to keep going or 'n' for a new game.",
            session.rules().win_target_or_default()
        ),
        GameStatus::Won => format!(
            "You reached {}! Type 'n' for a new game.",
            session.rules().win_target_or_default()
        ),
        GameStatus::Lost => "Game over. Type 'n' for a new game.".to_string(),
    };
    if !hint.is_empty() {
        out.push_str(&hint);
        out.push('\n');
    }
    out
}
