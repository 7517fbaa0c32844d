//! Wire frames
//!
//! ASCII, newline-terminated, semicolon-delimited:
//! - `START;<N>;<C>` handshake
//! - `CHANGE;<MOVE>;<BOARD>;<NEXT>` move notification
//! - any frame whose first or last field is `END` terminates the game
//!
//! Outbound frames are just the move: `SWAP` or `<row>,<col>`.

use hexlink_core::{Colour, Move, Pos, MAX_BOARD_SIZE};

use crate::error::ProtocolError;

pub const FIELD_SEPARATOR: char = ';';
pub const END_TOKEN: &str = "END";

/// Parsed inbound frame
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    Start {
        size: usize,
        colour: Colour,
    },
    Change {
        mv: Move,
        /// Authoritative board in canonical wire form
        board: String,
        next: Colour,
    },
    End {
        /// Board carried by a `CHANGE;...;END` frame
        board: Option<String>,
        /// Winner named by an `END;<C>` frame
        winner: Option<Colour>,
    },
}

impl Frame {
    /// Parse one frame, without its line terminator
    pub fn parse(line: &str) -> Result<Frame, ProtocolError> {
        let line = line.trim();
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();

        if fields.first() == Some(&END_TOKEN) || fields.last() == Some(&END_TOKEN) {
            return Ok(parse_end(&fields));
        }

        match fields.as_slice() {
            ["START", size, colour] => {
                let size = size
                    .parse::<usize>()
                    .ok()
                    .filter(|n| (1..=MAX_BOARD_SIZE).contains(n))
                    .ok_or_else(|| {
                        ProtocolError::malformed(
                            line,
                            format!("board size must be an integer between 1 and {}", MAX_BOARD_SIZE),
                        )
                    })?;
                let colour = Colour::from_wire(colour)
                    .ok_or_else(|| ProtocolError::malformed(line, "colour must be R or B"))?;
                Ok(Frame::Start { size, colour })
            }
            ["CHANGE", payload, board, next] => {
                let mv = parse_move(payload)
                    .ok_or_else(|| ProtocolError::malformed(line, "bad move payload"))?;
                let next = Colour::from_wire(next)
                    .ok_or_else(|| ProtocolError::malformed(line, "next colour must be R or B"))?;
                Ok(Frame::Change {
                    mv,
                    board: board.to_string(),
                    next,
                })
            }
            _ => Err(ProtocolError::malformed(line, "unknown frame")),
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Frame::End { .. })
    }
}

fn parse_end(fields: &[&str]) -> Frame {
    match fields {
        ["CHANGE", _, board, END_TOKEN] => Frame::End {
            board: Some(board.to_string()),
            winner: None,
        },
        [END_TOKEN, winner, ..] => Frame::End {
            board: None,
            winner: Colour::from_wire(winner),
        },
        _ => Frame::End {
            board: None,
            winner: None,
        },
    }
}

/// `SWAP` or `<row>,<col>`
pub fn parse_move(payload: &str) -> Option<Move> {
    if payload == "SWAP" {
        return Some(Move::Swap);
    }
    let (row, col) = payload.split_once(',')?;
    let row = row.trim().parse().ok()?;
    let col = col.trim().parse().ok()?;
    Some(Move::Place(Pos::new(row, col)))
}

/// Outbound frame for `mv`, newline included
pub fn encode_move(mv: Move) -> String {
    format!("{}\n", mv)
}
