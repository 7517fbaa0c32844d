//! Interactive policy
//!
//! Prints the board and the legal moves, then reads `<row> <col>` lines.
//! `-1 -1` requests the swap.

use std::io::{self, BufRead, Stdout, StdinLock, Write};

use hexlink_core::{decode, encode, swap_action, Action, GameState, Move, PolicySource, Pos};

pub struct HumanPolicy<R, W> {
    input: R,
    output: W,
}

impl HumanPolicy<StdinLock<'static>, Stdout> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> HumanPolicy<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn show(&mut self, state: &GameState) -> io::Result<()> {
        writeln!(self.output, "\n{}", state.board())?;
        writeln!(self.output, "Legal moves for {}:", state.active_colour().name())?;

        let size = state.size();
        let moves: Vec<String> = state
            .legal_actions()
            .into_iter()
            .filter_map(|action| decode(action, size).ok())
            .map(|mv| match mv {
                Move::Place(pos) => format!("{} {}", pos.row, pos.col),
                Move::Swap => "-1 -1 (swap)".to_string(),
            })
            .collect();
        writeln!(self.output, "{}", moves.join(", "))
    }
}

impl<R: BufRead, W: Write> PolicySource for HumanPolicy<R, W> {
    /// At end of input an out-of-range action is returned, which the
    /// caller rejects.
    fn select_action(&mut self, state: &GameState) -> Action {
        // Terminal write failures are not fatal to the game
        self.show(state).ok();

        loop {
            write!(self.output, "> ").ok();
            self.output.flush().ok();

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => return Action(usize::MAX),
                Ok(_) => {}
            }

            match parse_entry(&line, state.size()) {
                Some(action) if state.is_legal(action) => return action,
                _ => {
                    writeln!(self.output, "Invalid").ok();
                }
            }
        }
    }
}

/// `<row> <col>` or `-1 -1` for swap
fn parse_entry(line: &str, size: usize) -> Option<Action> {
    let numbers: Vec<i64> = line
        .split_whitespace()
        .map(|token| token.parse().ok())
        .collect::<Option<_>>()?;

    match numbers.as_slice() {
        [-1, -1] => Some(swap_action(size)),
        &[row, col] if row >= 0 && col >= 0 => {
            encode(Move::Place(Pos::new(row as usize, col as usize)), size).ok()
        }
        _ => None,
    }
}
