//! Error types for the rules engine

use crate::board::{Pos, MAX_BOARD_SIZE};

/// Errors raised by board, codec and game-state operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("invalid board size {0}: must be between 1 and {max}", max = MAX_BOARD_SIZE)]
    InvalidSize(usize),

    #[error("position {pos} is outside a {size}x{size} board")]
    OutOfBounds { pos: Pos, size: usize },

    #[error("malformed board: {0}")]
    MalformedBoard(String),

    #[error("invalid action {action}: must be in [0, {max}]")]
    InvalidAction { action: usize, max: usize },

    #[error("illegal move: {0}")]
    IllegalMove(IllegalMove),

    #[error("swap has already been used this game")]
    SwapAlreadyUsed,

    #[error("board out of sync: {0}")]
    Desync(String),
}

/// Why a move was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMove {
    #[error("cell {0} is occupied")]
    CellOccupied(Pos),

    #[error("game over")]
    GameOver,

    #[error("swap is only available on the responder's first move")]
    SwapUnavailable,
}

impl From<IllegalMove> for GameError {
    fn from(reason: IllegalMove) -> Self {
        GameError::IllegalMove(reason)
    }
}
