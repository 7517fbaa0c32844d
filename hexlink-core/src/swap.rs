//! Pie rule: seat/colour binding and the swap transition

use serde::{Deserialize, Serialize};

use crate::board::Colour;
use crate::error::{GameError, IllegalMove};
use crate::game::GameState;

/// Physical side of the table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    /// Places the first stone
    Opener,
    /// Replies first, may swap
    Responder,
}

impl Seat {
    pub fn other(self) -> Seat {
        match self {
            Seat::Opener => Seat::Responder,
            Seat::Responder => Seat::Opener,
        }
    }

    /// Seat that starts the game holding `colour`
    pub fn initial_for(colour: Colour) -> Option<Seat> {
        match colour {
            Colour::First => Some(Seat::Opener),
            Colour::Second => Some(Seat::Responder),
            Colour::Empty => None,
        }
    }
}

/// Colour held by `seat` given whether the swap happened
pub fn bound_colour(seat: Seat, swapped: bool) -> Colour {
    match (seat, swapped) {
        (Seat::Opener, false) | (Seat::Responder, true) => Colour::First,
        (Seat::Opener, true) | (Seat::Responder, false) => Colour::Second,
    }
}

/// Invert the seat/colour binding on behalf of `actor`.
///
/// The opener's stone stays on the board unchanged and now belongs to the
/// responder. Turn bookkeeping is left to [`GameState::apply_move`].
pub fn apply(state: &GameState, actor: Seat) -> Result<GameState, GameError> {
    if state.swap_used {
        return Err(GameError::SwapAlreadyUsed);
    }
    if !state.swap_available || actor != Seat::Responder || state.active_seat != actor {
        return Err(IllegalMove::SwapUnavailable.into());
    }

    let mut next = state.clone();
    next.swap_used = true;
    next.swap_available = false;
    Ok(next)
}
