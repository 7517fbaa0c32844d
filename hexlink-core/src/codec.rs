//! Flat action indices for moves
//!
//! On a board of side N, actions `0..N²` address cell `(a / N, a % N)` and
//! action `N²` is the swap sentinel.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Pos;
use crate::error::GameError;

/// Flat action index
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Action(pub usize);

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A move in board terms
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Place(Pos),
    /// Pie rule: take over the opener's side
    Swap,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Place(pos) => write!(f, "{}", pos),
            Move::Swap => f.write_str("SWAP"),
        }
    }
}

/// Number of actions on a board of side `size` (cells plus swap)
pub fn action_space_size(size: usize) -> usize {
    cell_count(size).saturating_add(1)
}

pub fn swap_action(size: usize) -> Action {
    Action(cell_count(size))
}

/// Saturates instead of overflowing for sizes no board can have
fn cell_count(size: usize) -> usize {
    size.saturating_mul(size)
}

pub fn encode(mv: Move, size: usize) -> Result<Action, GameError> {
    match mv {
        Move::Place(pos) if pos.in_bounds(size) => pos
            .row
            .checked_mul(size)
            .and_then(|start| start.checked_add(pos.col))
            .map(Action)
            .ok_or(GameError::InvalidSize(size)),
        Move::Place(pos) => Err(GameError::OutOfBounds { pos, size }),
        Move::Swap => Ok(swap_action(size)),
    }
}

pub fn decode(action: Action, size: usize) -> Result<Move, GameError> {
    let cells = cell_count(size);
    match action.0 {
        a if a < cells => Ok(Move::Place(Pos::new(a / size, a % size))),
        a if a == cells => Ok(Move::Swap),
        a => Err(GameError::InvalidAction { action: a, max: cells }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_space_is_bijective() {
        for size in 1..=15 {
            let n = action_space_size(size);
            assert_eq!(n, size * size + 1);
            for a in 0..n {
                let mv = decode(Action(a), size).unwrap();
                assert_eq!(encode(mv, size).unwrap(), Action(a));
            }
        }
    }

    #[test]
    fn test_row_major_layout() {
        assert_eq!(decode(Action(7), 5).unwrap(), Move::Place(Pos::new(1, 2)));
        assert_eq!(encode(Move::Place(Pos::new(4, 4)), 5).unwrap(), Action(24));
        assert_eq!(decode(Action(25), 5).unwrap(), Move::Swap);
        assert_eq!(swap_action(5), Action(25));
    }

    #[test]
    fn test_decode_out_of_range() {
        assert_eq!(
            decode(Action(26), 5),
            Err(GameError::InvalidAction { action: 26, max: 25 })
        );
        assert!(encode(Move::Place(Pos::new(5, 0)), 5).is_err());
    }

    #[test]
    fn test_huge_sizes_do_not_overflow() {
        let size = 1usize << (usize::BITS / 2);
        assert_eq!(action_space_size(size), usize::MAX);
        assert_eq!(swap_action(usize::MAX), Action(usize::MAX));
        assert_eq!(decode(Action(3), usize::MAX).unwrap(), Move::Place(Pos::new(0, 3)));
        assert_eq!(
            encode(Move::Place(Pos::new(2, 0)), usize::MAX),
            Err(GameError::InvalidSize(usize::MAX))
        );
    }

    #[test]
    fn test_move_display_matches_wire() {
        assert_eq!(Move::Place(Pos::new(3, 10)).to_string(), "3,10");
        assert_eq!(Move::Swap.to_string(), "SWAP");
    }

    #[test]
    fn test_move_json_shape() {
        let json = serde_json::to_string(&Move::Place(Pos::new(1, 2))).unwrap();
        assert_eq!(json, r#"{"Place":{"row":1,"col":2}}"#);
        assert_eq!(serde_json::to_string(&Move::Swap).unwrap(), r#""Swap""#);
    }
}
