//! Per-connection bookkeeping

use rustc_hash::FxHashSet;

use hexlink_core::{Colour, GameState, Move, Pos, Seat};

/// Created on a successful handshake, dropped with the connection
#[derive(Clone, Debug)]
pub struct Session {
    seat: Seat,
    assigned_colour: Colour,
    board_size: usize,
    legal_unplayed: FxHashSet<Pos>,
    state_id: usize,
}

impl Session {
    /// `None` unless `colour` is a stone colour
    pub fn new(board_size: usize, colour: Colour) -> Option<Self> {
        let seat = Seat::initial_for(colour)?;
        let legal_unplayed = (0..board_size)
            .flat_map(|row| (0..board_size).map(move |col| Pos::new(row, col)))
            .collect();
        Some(Self {
            seat,
            assigned_colour: colour,
            board_size,
            legal_unplayed,
            state_id: 0,
        })
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    /// Colour announced in the handshake
    pub fn assigned_colour(&self) -> Colour {
        self.assigned_colour
    }

    /// Colour we hold now, after any swap
    pub fn our_colour(&self, state: &GameState) -> Colour {
        state.colour_of(self.seat)
    }

    pub fn is_our_turn(&self, state: &GameState) -> bool {
        state.active_seat() == self.seat
    }

    pub fn board_size(&self) -> usize {
        self.board_size
    }

    pub fn legal_unplayed(&self) -> &FxHashSet<Pos> {
        &self.legal_unplayed
    }

    /// Turn index of the last synchronised state
    pub fn state_id(&self) -> usize {
        self.state_id
    }

    /// Record a move seen on the wire
    pub(crate) fn record(&mut self, mv: Move, state: &GameState) {
        if let Move::Place(pos) = mv {
            self.legal_unplayed.remove(&pos);
        }
        self.state_id = state.turn_index();
    }
}
