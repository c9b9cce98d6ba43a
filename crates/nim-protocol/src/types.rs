//! Message types for Nim's wire format.
//!
//! Every datagram carries exactly one message. Messages travel in one of
//! two directions, and the same tag byte can mean different things in
//! each (`N` is "new game" from a client but "player name" from the
//! server). So there are two enums, one per direction, and the decoder is
//! always told which one it is reading.

use std::fmt;

// ---------------------------------------------------------------------------
// Tag bytes
// ---------------------------------------------------------------------------

/// Leading tag bytes, one per message kind.
pub mod tag {
    /// Client → server: join with a player name.
    pub const JOIN: u8 = b'J';
    /// Client → server: take markers. Server → client: whose turn.
    pub const TAKE: u8 = b'T';
    /// Server → client: whose turn (same byte as [`TAKE`]).
    pub const TURN: u8 = b'T';
    /// Client → server: request a new round.
    pub const NEW_GAME: u8 = b'N';
    /// Server → client: a player's name (same byte as [`NEW_GAME`]).
    pub const NAME: u8 = b'N';
    /// Both directions: quit.
    pub const QUIT: u8 = b'Q';
    /// Server → client: your player id.
    pub const ID: u8 = b'I';
    /// Server → client: a player's score.
    pub const SCORE: u8 = b'S';
    /// Server → client: a heap's marker count.
    pub const HEAP: u8 = b'H';
    /// Server → client: the round winner.
    pub const WIN: u8 = b'W';
}

/// Longest player name, in UTF-8 bytes, the protocol will carry.
///
/// The longest message (`Name` with a maximal name) is 4 + 64 = 68 bytes,
/// well inside the 128-byte datagram bound.
pub const MAX_NAME_LEN: usize = 64;

// ---------------------------------------------------------------------------
// PlayerSlot
// ---------------------------------------------------------------------------

/// One of the two seats in a session, assigned in join order.
///
/// On the wire a slot is a single byte, `0` or `1`. Anything else is
/// rejected when decoding, so a `PlayerSlot` value is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlayerSlot {
    /// Player 0: the first to join. Moves first in every round.
    First,
    /// Player 1: the second to join.
    Second,
}

impl PlayerSlot {
    /// Both slots in broadcast order.
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::First, PlayerSlot::Second];

    /// Index into per-player arrays (`0` or `1`).
    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }

    /// The wire byte for this slot.
    pub fn to_wire(self) -> u8 {
        self.index() as u8
    }

    /// The opponent's slot.
    pub fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

impl TryFrom<u8> for PlayerSlot {
    type Error = crate::ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::First),
            1 => Ok(Self::Second),
            other => Err(crate::ProtocolError::InvalidSlot(other)),
        }
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.index())
    }
}

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// Messages a client sends to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// "Put me in a game under this name."
    Join { name: String },

    /// "Remove `count` markers from heap `heap`."
    Take { heap: u8, count: u8 },

    /// "Start a new round."
    NewGame,

    /// "I'm leaving."
    Quit,
}

impl ClientMessage {
    /// The tag byte this message is encoded with.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Join { .. } => tag::JOIN,
            Self::Take { .. } => tag::TAKE,
            Self::NewGame => tag::NEW_GAME,
            Self::Quit => tag::QUIT,
        }
    }
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// Messages the server sends to a client.
///
/// Each one is a small state delta; a client rebuilds the full picture by
/// applying them in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// "You are this player."
    Id { slot: PlayerSlot },

    /// "This player is called `name`."
    Name { slot: PlayerSlot, name: String },

    /// "This player's score is now `score`."
    Score { slot: PlayerSlot, score: u8 },

    /// "Heap `heap` now holds `count` markers."
    Heap { heap: u8, count: u8 },

    /// "It is this player's turn."
    Turn { slot: PlayerSlot },

    /// "This player won the round."
    Win { slot: PlayerSlot },

    /// "The session is over; shut down."
    Quit,
}

impl ServerMessage {
    /// The tag byte this message is encoded with.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Id { .. } => tag::ID,
            Self::Name { .. } => tag::NAME,
            Self::Score { .. } => tag::SCORE,
            Self::Heap { .. } => tag::HEAP,
            Self::Turn { .. } => tag::TURN,
            Self::Win { .. } => tag::WIN,
            Self::Quit => tag::QUIT,
        }
    }
}
