//! HEXLINK Client - Hex game server protocol
//!
//! This crate connects a policy to a game server:
//! - Wire frame parsing and move encoding
//! - Newline-framed channels (TCP and in-memory)
//! - Session bookkeeping
//! - The half-duplex protocol state machine
//! - Agent configuration

mod channel;
mod config;
mod error;
mod machine;
mod message;
mod session;

pub use channel::{Connector, FrameChannel, LineChannel, TcpChannel, TcpConnector};
pub use config::{AgentConfig, PolicyKind, DEFAULT_HOST, DEFAULT_PORT};
pub use error::ProtocolError;
pub use machine::{Live, Phase, PhaseKind, ProtocolMachine, SessionOutcome, Termination};
pub use message::{encode_move, parse_move, Frame, END_TOKEN, FIELD_SEPARATOR};
pub use session::Session;

use hexlink_core::PolicySource;

/// Connect to the configured server and play one game with `policy`
pub fn play<P: PolicySource>(
    config: &AgentConfig,
    policy: P,
) -> Result<SessionOutcome, ProtocolError> {
    let connector = TcpConnector::new(config.address());
    tracing::info!("Connecting to {}", connector.address());
    ProtocolMachine::new(connector, policy).run()
}
