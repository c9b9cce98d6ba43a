//! Error types for the game layer.

use nim_protocol::PlayerSlot;
use nim_transport::PeerAddr;

use crate::{SessionId, SessionPhase};

/// Errors that can occur when acting on a session.
///
/// None of these change session state: a rejected action leaves the
/// session exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Both seats are already taken.
    #[error("session {0} is full")]
    SessionFull(SessionId),

    /// The peer already holds a seat in this session.
    #[error("{0} is already seated in session {1}")]
    AlreadySeated(PeerAddr, SessionId),

    /// The session is in a phase that doesn't allow this operation.
    #[error("not allowed while session is {0}")]
    InvalidPhase(SessionPhase),

    /// The mover is not the player whose turn it is.
    #[error("it is {expected}'s turn, not {actual}'s")]
    NotYourTurn {
        expected: PlayerSlot,
        actual: PlayerSlot,
    },

    /// The heap index is out of range.
    #[error("heap {0} does not exist")]
    NoSuchHeap(u8),

    /// A move must remove at least one marker.
    #[error("must take at least one marker")]
    EmptyTake,

    /// More markers were requested than the heap holds.
    #[error("heap {heap} holds {remaining}, cannot take {requested}")]
    TooMany {
        heap: u8,
        requested: u8,
        remaining: u8,
    },
}
