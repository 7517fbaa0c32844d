//! HEXLINK Core - Hex rules engine
//!
//! This crate provides the game logic shared by the network agent and
//! local play:
//! - Board model and its wire/text serializations
//! - Edge-to-edge win detection
//! - Flat action encoding (cells plus the swap sentinel)
//! - Pie rule seat/colour binding
//! - Game state with a single move transition
//! - Policy interface and a random baseline

pub mod board;
pub mod win;
pub mod codec;
pub mod swap;
pub mod game;
pub mod policy;
pub mod error;

// Re-exports for convenient access
pub use board::{Board, Colour, Pos, MAX_BOARD_SIZE, NEIGHBOURS, ROW_SEPARATOR};
pub use win::{has_won, detect_winner};
pub use codec::{action_space_size, decode, encode, swap_action, Action, Move};
pub use swap::Seat;
pub use game::{GameResult, GameState};
pub use policy::{PolicySource, RandomPolicy, DEFAULT_SWAP_PROBABILITY};
pub use error::{GameError, IllegalMove};
