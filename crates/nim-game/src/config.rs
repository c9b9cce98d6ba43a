//! Game configuration and the session state machine.

use std::fmt;

use nim_protocol::PlayerSlot;
use serde::{Deserialize, Serialize};

/// Number of heaps on the board.
pub const HEAP_COUNT: usize = 3;

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// Configuration for a game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Marker count of each heap at the start of every round.
    pub initial_heaps: [u8; HEAP_COUNT],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_heaps: [3, 4, 5],
        }
    }
}

// ---------------------------------------------------------------------------
// SessionPhase
// ---------------------------------------------------------------------------

/// The lifecycle state of a session.
///
/// ```text
/// AwaitingFirst → AwaitingSecond → InPlay ──(last marker taken)──→ RoundWon
///                                    ↑                                │
///                                    └──────────(new game)────────────┘
/// ```
///
/// - **AwaitingFirst**: Session exists but nobody is seated yet.
/// - **AwaitingSecond**: One player seated, waiting for an opponent.
/// - **InPlay**: Both seated, heaps not yet empty. Moves are accepted.
/// - **RoundWon**: Every heap is empty. Only a new game restarts play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nobody seated yet.
    AwaitingFirst,
    /// One player seated.
    AwaitingSecond,
    /// Round in progress.
    InPlay,
    /// Round over, won by the given player.
    RoundWon(PlayerSlot),
}

impl SessionPhase {
    /// Returns `true` once both seats are filled.
    pub fn is_full(&self) -> bool {
        matches!(self, Self::InPlay | Self::RoundWon(_))
    }

    /// Returns `true` if `take` moves are accepted in this phase.
    pub fn accepts_moves(&self) -> bool {
        matches!(self, Self::InPlay)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingFirst => write!(f, "AwaitingFirst"),
            Self::AwaitingSecond => write!(f, "AwaitingSecond"),
            Self::InPlay => write!(f, "InPlay"),
            Self::RoundWon(winner) => write!(f, "RoundWon({winner})"),
        }
    }
}
