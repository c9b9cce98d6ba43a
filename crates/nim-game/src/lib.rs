//! Session state and matchmaking for Nim.
//!
//! Pure game logic: nothing in this crate performs I/O. Operations return
//! the notifications they produce as addressed [`Outbound`] messages, which
//! keeps the rules testable without a socket.
//!
//! # Key types
//!
//! - [`GameSession`] — authoritative state for one two-player match
//! - [`SessionBroker`] — pairs joining peers into sessions
//! - [`SessionPhase`] — lifecycle state machine
//! - [`GameConfig`] — initial heap sizes

mod broker;
mod config;
mod error;
mod session;

pub use broker::{Joined, SessionBroker};
pub use config::{GameConfig, SessionPhase, HEAP_COUNT};
pub use error::GameError;
pub use session::{GameSession, Outbound, QuitOutcome, SessionId};
