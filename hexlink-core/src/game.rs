//! Game state and the move transition

use serde::{Deserialize, Serialize};

use crate::board::{Board, Colour, Pos};
use crate::codec::{self, Action, Move};
use crate::error::{GameError, IllegalMove};
use crate::swap::{self, Seat};
use crate::win::detect_winner;

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    Won(Colour),
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Game state (value semantics: transitions return a new state)
///
/// The seat to move flips on every applied move, the swap included. The
/// colour to move is the colour currently bound to that seat, so physical
/// stone colours alternate strictly while the swap turn places no stone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) active_seat: Seat,
    pub(crate) turn_index: usize,
    pub(crate) swap_used: bool,
    pub(crate) swap_available: bool,
    pub(crate) result: GameResult,
    pub(crate) history: Vec<Move>,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Fresh game on an empty board, opener to move
    pub fn new(size: usize) -> Result<Self, GameError> {
        Ok(Self {
            board: Board::new(size)?,
            active_seat: Seat::Opener,
            turn_index: 0,
            swap_used: false,
            swap_available: false,
            result: GameResult::Ongoing,
            history: Vec::new(),
        })
    }

    /// Independent copy for speculative search
    pub fn snapshot(&self) -> GameState {
        self.clone()
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn active_seat(&self) -> Seat {
        self.active_seat
    }

    /// Colour of the stone the next placement puts down
    pub fn active_colour(&self) -> Colour {
        self.colour_of(self.active_seat)
    }

    /// Number of moves applied so far, swap included
    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    pub fn swap_used(&self) -> bool {
        self.swap_used
    }

    pub fn swap_available(&self) -> bool {
        self.swap_available
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn winner(&self) -> Option<Colour> {
        match self.result {
            GameResult::Won(colour) => Some(colour),
            GameResult::Ongoing => None,
        }
    }

    pub fn winning_seat(&self) -> Option<Seat> {
        self.winner().and_then(|colour| self.seat_of(colour))
    }

    pub fn is_over(&self) -> bool {
        self.result != GameResult::Ongoing
    }

    /// Moves applied so far, in order
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    // ========================================================================
    // SEAT BINDING
    // ========================================================================

    pub fn colour_of(&self, seat: Seat) -> Colour {
        swap::bound_colour(seat, self.swap_used)
    }

    pub fn seat_of(&self, colour: Colour) -> Option<Seat> {
        [Seat::Opener, Seat::Responder]
            .into_iter()
            .find(|&seat| colour.is_stone() && self.colour_of(seat) == colour)
    }

    /// Seat owning the stone at `pos`
    pub fn owner_of(&self, pos: Pos) -> Option<Seat> {
        self.board.get(pos).and_then(|colour| self.seat_of(colour))
    }

    // ========================================================================
    // ACTION SPACE
    // ========================================================================

    pub fn is_legal(&self, action: Action) -> bool {
        if self.is_over() {
            return false;
        }
        match codec::decode(action, self.size()) {
            Ok(Move::Place(pos)) => self.board.get(pos) == Some(Colour::Empty),
            Ok(Move::Swap) => self.swap_available,
            Err(_) => false,
        }
    }

    /// Legal actions in ascending order; empty once the game is over
    pub fn legal_actions(&self) -> Vec<Action> {
        let size = self.size();
        (0..codec::action_space_size(size))
            .map(Action)
            .filter(|&a| self.is_legal(a))
            .collect()
    }

    /// One flag per action index, `true` where the action is legal
    pub fn valid_action_mask(&self) -> Vec<bool> {
        let size = self.size();
        (0..codec::action_space_size(size))
            .map(|a| self.is_legal(Action(a)))
            .collect()
    }

    // ========================================================================
    // TRANSITIONS
    // ========================================================================

    /// Apply `action` for the seat to move and return the resulting state
    pub fn apply_move(&self, action: Action) -> Result<GameState, GameError> {
        if self.is_over() {
            return Err(IllegalMove::GameOver.into());
        }

        let mv = codec::decode(action, self.size())?;
        let mut next = match mv {
            Move::Swap => swap::apply(self, self.active_seat)?,
            Move::Place(pos) => self.place(pos)?,
        };

        next.turn_index += 1;
        next.active_seat = self.active_seat.other();
        next.history.push(mv);
        Ok(next)
    }

    /// Convenience wrapper encoding `mv` first
    pub fn apply(&self, mv: Move) -> Result<GameState, GameError> {
        self.apply_move(codec::encode(mv, self.size())?)
    }

    fn place(&self, pos: Pos) -> Result<GameState, GameError> {
        match self.board.get(pos) {
            None => return Err(GameError::OutOfBounds { pos, size: self.size() }),
            Some(Colour::Empty) => {}
            Some(_) => return Err(IllegalMove::CellOccupied(pos).into()),
        }

        let mut next = self.clone();
        next.board.set_cell(pos, self.active_colour())?;
        // The responder may swap only in reply to the very first stone
        next.swap_available = self.turn_index == 0;
        if let Some(colour) = detect_winner(&next.board) {
            next.result = GameResult::Won(colour);
        }
        Ok(next)
    }

    /// Adopt an authoritative board in place of the local one.
    ///
    /// The board must have the same size and exactly the stones implied by
    /// the applied moves (red count = ceil(placements / 2), blue count =
    /// floor(placements / 2)). Returns whether the contents differed.
    pub fn resync(&mut self, board: Board) -> Result<bool, GameError> {
        if board.size() != self.size() {
            return Err(GameError::Desync(format!(
                "board size {} does not match game size {}",
                board.size(),
                self.size()
            )));
        }

        let placements = self
            .history
            .iter()
            .filter(|mv| matches!(mv, Move::Place(_)))
            .count();
        let red = board.stone_count(Colour::First);
        let blue = board.stone_count(Colour::Second);
        if red != (placements + 1) / 2 || blue != placements / 2 {
            return Err(GameError::Desync(format!(
                "board has {} red and {} blue stones after {} placements",
                red, blue, placements
            )));
        }

        let changed = board != self.board;
        self.board = board;
        self.result = match detect_winner(&self.board) {
            Some(colour) => GameResult::Won(colour),
            None => GameResult::Ongoing,
        };
        Ok(changed)
    }
}

// ============================================================================
// TESTS
// ============================================================================
