//! Session state machine
//!
//! ```text
//! CONNECTING -> AWAITING_START -> SELECTING_MOVE <-> AWAITING_MESSAGE
//!                    |                  |                  |
//!                    +------------------+------------------+--> TERMINATED
//! ```
//!
//! Each phase owns exactly the data that exists in it: the channel appears on
//! connect, the session and game state on a successful handshake. `step()`
//! performs one transition; any error moves straight to TERMINATED and
//! releases the channel.

use std::fmt;

use hexlink_core::{
    decode, detect_winner, encode, Board, Colour, GameState, Move, PolicySource,
};

use crate::channel::{Connector, FrameChannel};
use crate::error::ProtocolError;
use crate::message::{encode_move, Frame};
use crate::session::Session;

// ============================================================================
// PHASES
// ============================================================================

/// Phase tag without its data
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseKind {
    Connecting,
    AwaitingStart,
    SelectingMove,
    AwaitingMessage,
    Terminated,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PhaseKind::Connecting => "connecting",
            PhaseKind::AwaitingStart => "awaiting start",
            PhaseKind::SelectingMove => "selecting move",
            PhaseKind::AwaitingMessage => "awaiting message",
            PhaseKind::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Connection state after a successful handshake
pub struct Live<Ch> {
    channel: Ch,
    session: Session,
    state: GameState,
    /// Our last sent move, until the server echoes it
    pending: Option<Move>,
}

pub enum Phase<Ch> {
    Connecting,
    AwaitingStart(Ch),
    SelectingMove(Live<Ch>),
    AwaitingMessage(Live<Ch>),
    Terminated(Termination),
}

impl<Ch> Phase<Ch> {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Connecting => PhaseKind::Connecting,
            Phase::AwaitingStart(_) => PhaseKind::AwaitingStart,
            Phase::SelectingMove(_) => PhaseKind::SelectingMove,
            Phase::AwaitingMessage(_) => PhaseKind::AwaitingMessage,
            Phase::Terminated(_) => PhaseKind::Terminated,
        }
    }

    fn live(&self) -> Option<&Live<Ch>> {
        match self {
            Phase::SelectingMove(live) | Phase::AwaitingMessage(live) => Some(live),
            _ => None,
        }
    }
}

/// How the session ended
#[derive(Debug)]
pub enum Termination {
    Finished(SessionOutcome),
    Failed(ProtocolError),
}

impl Termination {
    pub fn into_result(self) -> Result<SessionOutcome, ProtocolError> {
        match self {
            Termination::Finished(outcome) => Ok(outcome),
            Termination::Failed(err) => Err(err),
        }
    }
}

/// Summary of a finished game
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionOutcome {
    pub winner: Option<Colour>,
    /// Our colour at the end, after any swap. `None` if the game ended before START.
    pub our_colour: Option<Colour>,
    pub turns: usize,
    pub swap_used: bool,
    pub final_state: Option<GameState>,
}

impl SessionOutcome {
    /// `None` when the winner is unknown
    pub fn we_won(&self) -> Option<bool> {
        Some(self.winner? == self.our_colour?)
    }
}

/// Result of a single AWAITING_MESSAGE visit
enum Next {
    SelectMove,
    AwaitMessage,
    Finished(Option<Colour>),
}

enum Handshake {
    Begin(Session, GameState),
    Ended(Option<Colour>),
}

// ============================================================================
// MACHINE
// ============================================================================

pub struct ProtocolMachine<C: Connector, P: PolicySource> {
    connector: C,
    policy: P,
    phase: Phase<C::Channel>,
}

impl<C: Connector, P: PolicySource> ProtocolMachine<C, P> {
    pub fn new(connector: C, policy: P) -> Self {
        Self {
            connector,
            policy,
            phase: Phase::Connecting,
        }
    }

    pub fn kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn phase(&self) -> &Phase<C::Channel> {
        &self.phase
    }

    pub fn state(&self) -> Option<&GameState> {
        self.phase.live().map(|live| &live.state)
    }

    pub fn session(&self) -> Option<&Session> {
        self.phase.live().map(|live| &live.session)
    }

    pub fn is_terminated(&self) -> bool {
        self.kind() == PhaseKind::Terminated
    }

    /// Drive the machine to TERMINATED
    pub fn run(mut self) -> Result<SessionOutcome, ProtocolError> {
        loop {
            if let Phase::Terminated(termination) = self.phase {
                return termination.into_result();
            }
            self.step();
        }
    }

    /// Perform one transition and return the new phase
    pub fn step(&mut self) -> PhaseKind {
        let phase = std::mem::replace(&mut self.phase, Phase::Connecting);
        self.phase = match phase {
            Phase::Connecting => self.on_connecting(),
            Phase::AwaitingStart(channel) => Self::on_awaiting_start(channel),
            Phase::SelectingMove(live) => self.on_selecting_move(live),
            Phase::AwaitingMessage(live) => Self::on_awaiting_message(live),
            done @ Phase::Terminated(_) => done,
        };
        self.phase.kind()
    }

    // ========================================================================
    // PHASE HANDLERS
    // ========================================================================

    fn on_connecting(&mut self) -> Phase<C::Channel> {
        match self.connector.connect() {
            Ok(channel) => {
                tracing::info!("Connected to server");
                Phase::AwaitingStart(channel)
            }
            Err(err) => fail(err),
        }
    }

    fn on_awaiting_start(mut channel: C::Channel) -> Phase<C::Channel> {
        match await_start(&mut channel) {
            Ok(Handshake::Begin(session, state)) => {
                let live = Live {
                    channel,
                    session,
                    state,
                    pending: None,
                };
                if live.session.is_our_turn(&live.state) {
                    Phase::SelectingMove(live)
                } else {
                    Phase::AwaitingMessage(live)
                }
            }
            Ok(Handshake::Ended(winner)) => {
                channel.close();
                tracing::info!("Game ended before it started");
                Phase::Terminated(Termination::Finished(SessionOutcome {
                    winner,
                    our_colour: None,
                    turns: 0,
                    swap_used: false,
                    final_state: None,
                }))
            }
            Err(err) => {
                channel.close();
                fail(err)
            }
        }
    }

    fn on_selecting_move(&mut self, mut live: Live<C::Channel>) -> Phase<C::Channel> {
        match live.play(&mut self.policy) {
            Ok(()) => Phase::AwaitingMessage(live),
            Err(err) => live.fail(err),
        }
    }

    fn on_awaiting_message(mut live: Live<C::Channel>) -> Phase<C::Channel> {
        match live.receive() {
            Ok(Next::SelectMove) => Phase::SelectingMove(live),
            Ok(Next::AwaitMessage) => Phase::AwaitingMessage(live),
            Ok(Next::Finished(winner)) => live.finish(winner),
            Err(err) => live.fail(err),
        }
    }
}

fn fail<Ch>(err: ProtocolError) -> Phase<Ch> {
    tracing::error!("Session terminated: {}", err);
    Phase::Terminated(Termination::Failed(err))
}

fn await_start<Ch: FrameChannel>(channel: &mut Ch) -> Result<Handshake, ProtocolError> {
    let line = channel
        .recv_frame()?
        .ok_or_else(|| ProtocolError::Handshake("connection closed before START".to_string()))?;

    match Frame::parse(&line) {
        Ok(Frame::Start { size, colour }) => {
            let state = GameState::new(size)?;
            let session = Session::new(size, colour)
                .ok_or_else(|| ProtocolError::Handshake(format!("no seat for colour {:?}", colour)))?;
            tracing::info!(
                "Assigned colour {} on a {}x{} board",
                colour.name(),
                size,
                size
            );
            Ok(Handshake::Begin(session, state))
        }
        Ok(Frame::End { winner, .. }) => Ok(Handshake::Ended(winner)),
        Ok(_) => Err(ProtocolError::Handshake(format!("expected START, got {:?}", line))),
        Err(err) => Err(ProtocolError::Handshake(err.to_string())),
    }
}

// ============================================================================
// LIVE SESSION STEPS
// ============================================================================

impl<Ch: FrameChannel> Live<Ch> {
    /// Ask the policy, validate, send exactly one frame, commit
    fn play<P: PolicySource>(&mut self, policy: &mut P) -> Result<(), ProtocolError> {
        let size = self.session.board_size();
        let action = policy.select_action(&self.state);
        let next = self
            .state
            .apply_move(action)
            .map_err(|source| ProtocolError::PolicyViolation { action, source })?;
        let mv = decode(action, size)?;

        self.channel.send_frame(&encode_move(mv))?;
        tracing::info!(
            "Playing {} as {}",
            mv,
            self.session.our_colour(&self.state).name()
        );

        self.state = next;
        self.session.record(mv, &self.state);
        self.pending = Some(mv);
        Ok(())
    }

    /// Block for the next frame and fold it into the local state
    fn receive(&mut self) -> Result<Next, ProtocolError> {
        let line = self
            .channel
            .recv_frame()?
            .ok_or(ProtocolError::ConnectionClosed)?;

        match Frame::parse(&line)? {
            Frame::End { board, winner } => {
                let winner = match (winner, board) {
                    (Some(colour), _) => Some(colour),
                    (None, Some(board)) => {
                        detect_winner(&Board::deserialize(&board, self.session.board_size())?)
                    }
                    (None, None) => self.state.winner(),
                };
                Ok(Next::Finished(winner))
            }
            Frame::Change { mv, board, next } => self.observe_change(&line, mv, &board, next),
            Frame::Start { .. } => Err(ProtocolError::UnexpectedFrame {
                phase: PhaseKind::AwaitingMessage,
                frame: line,
            }),
        }
    }

    fn observe_change(
        &mut self,
        line: &str,
        mv: Move,
        board: &str,
        next: Colour,
    ) -> Result<Next, ProtocolError> {
        let size = self.session.board_size();

        // Echo of our own move, or an opponent move
        if self.pending.take() == Some(mv) {
            tracing::debug!("Server acknowledged {}", mv);
        } else {
            if self.session.is_our_turn(&self.state) {
                return Err(ProtocolError::UnexpectedFrame {
                    phase: PhaseKind::AwaitingMessage,
                    frame: line.to_string(),
                });
            }
            let mover = self.state.active_colour();
            self.state = self.state.apply_move(encode(mv, size)?)?;
            self.session.record(mv, &self.state);
            tracing::info!("Opponent played {} as {}", mv, mover.name());
            if mv == Move::Swap {
                tracing::info!(
                    "Swapped: now playing {}",
                    self.session.our_colour(&self.state).name()
                );
            }
        }

        let authoritative = Board::deserialize(board, size)?;
        if self.state.resync(authoritative)? {
            tracing::warn!("Local board differed from server board, adopted server board");
        }
        tracing::debug!("Board after turn {}:\n{}", self.state.turn_index(), self.state.board());

        if let Some(winner) = self.state.winner() {
            tracing::info!("{} has connected its edges, waiting for END", winner.name());
            return Ok(Next::AwaitMessage);
        }

        let expected = self.state.active_colour();
        if next != expected {
            return Err(ProtocolError::TurnMismatch { expected, got: next });
        }

        if self.session.is_our_turn(&self.state) {
            Ok(Next::SelectMove)
        } else {
            Ok(Next::AwaitMessage)
        }
    }

    fn finish(mut self, winner: Option<Colour>) -> Phase<Ch> {
        self.channel.close();
        let our_colour = self.session.our_colour(&self.state);
        match winner {
            Some(colour) if colour == our_colour => tracing::info!("Game over: we won as {}", colour.name()),
            Some(colour) => tracing::info!("Game over: {} won", colour.name()),
            None => tracing::info!("Game over"),
        }
        Phase::Terminated(Termination::Finished(SessionOutcome {
            winner,
            our_colour: Some(our_colour),
            turns: self.state.turn_index(),
            swap_used: self.state.swap_used(),
            final_state: Some(self.state),
        }))
    }

    fn fail(mut self, err: ProtocolError) -> Phase<Ch> {
        self.channel.close();
        fail(err)
    }
}

// ============================================================================
// TESTS
// ============================================================================
