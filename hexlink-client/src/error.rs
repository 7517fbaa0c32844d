//! Protocol error taxonomy

use hexlink_core::{Action, Colour, GameError};

use crate::machine::PhaseKind;

/// Every variant is fatal to the session
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection closed by peer")]
    ConnectionClosed,

    #[error("handshake failed: {0}")]
    Handshake(String),

    #[error("malformed frame {frame:?}: {reason}")]
    Malformed { frame: String, reason: String },

    #[error("unexpected frame while {phase}: {frame:?}")]
    UnexpectedFrame { phase: PhaseKind, frame: String },

    #[error("turn mismatch: local state expects {expected:?} to move, server says {got:?}")]
    TurnMismatch { expected: Colour, got: Colour },

    #[error("policy proposed illegal action {action}: {source}")]
    PolicyViolation {
        action: Action,
        #[source]
        source: GameError,
    },

    #[error(transparent)]
    Game(#[from] GameError),
}

impl ProtocolError {
    pub(crate) fn malformed(frame: &str, reason: impl Into<String>) -> Self {
        ProtocolError::Malformed {
            frame: frame.to_string(),
            reason: reason.into(),
        }
    }
}
