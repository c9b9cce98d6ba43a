//! The player's picture of the game, built only from server notifications.

use std::fmt::Write;

use nim::game::HEAP_COUNT;
use nim::protocol::{PlayerSlot, ServerMessage};

use crate::command::CommandError;

/// What the server has told this client so far.
#[derive(Debug, Clone, Default)]
pub struct GameView {
    me: Option<PlayerSlot>,
    names: [String; 2],
    scores: [u8; 2],
    /// `None` until the server has sent the board.
    heaps: Option<[u8; HEAP_COUNT]>,
    turn: Option<PlayerSlot>,
    winner: Option<PlayerSlot>,
    paired: bool,
}

impl GameView {
    /// Folds one notification into the view.
    ///
    /// Returns `true` when the server announced the session is over.
    pub fn apply(&mut self, msg: &ServerMessage) -> bool {
        match msg {
            ServerMessage::Id { slot } => self.me = Some(*slot),
            ServerMessage::Name { slot, name } => {
                self.names[slot.index()] = name.clone();
                if self.me != Some(*slot) {
                    self.paired = true;
                }
            }
            ServerMessage::Score { slot, score } => {
                self.scores[slot.index()] = *score;
            }
            ServerMessage::Heap { heap, count } => {
                let heaps = self.heaps.get_or_insert([0; HEAP_COUNT]);
                if let Some(h) = heaps.get_mut(*heap as usize) {
                    *h = *count;
                }
            }
            ServerMessage::Turn { slot } => {
                self.turn = Some(*slot);
                self.winner = None;
                self.paired = true;
            }
            ServerMessage::Win { slot } => {
                self.winner = Some(*slot);
                self.turn = None;
            }
            ServerMessage::Quit => return true,
        }
        false
    }

    /// Checks a move locally before it is sent.
    pub fn check_take(&self, heap: u8, count: u8) -> Result<(), CommandError> {
        if self.turn.is_none() || self.turn != self.me {
            return Err(CommandError::NotYourTurn);
        }
        let remaining = *self
            .heaps
            .unwrap_or_default()
            .get(heap as usize)
            .ok_or(CommandError::NoSuchHeap(heap))?;
        if count == 0 || count > remaining {
            return Err(CommandError::BadCount { heap, remaining });
        }
        Ok(())
    }

    /// Checks that a new game can be asked for.
    pub fn check_new_game(&self) -> Result<(), CommandError> {
        if self.paired {
            Ok(())
        } else {
            Err(CommandError::NoPartner)
        }
    }

    fn label(&self, slot: PlayerSlot) -> &str {
        let name = &self.names[slot.index()];
        if name.is_empty() { "?" } else { name.as_str() }
    }

    /// Renders the board as text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let Some(me) = self.me else {
            out.push_str("Joining...\n");
            return out;
        };
        let them = me.other();

        let _ = writeln!(
            out,
            "{} = {}    {} = {}",
            self.label(me),
            self.scores[me.index()],
            if self.paired { self.label(them) } else { "(waiting)" },
            self.scores[them.index()],
        );
        for (i, count) in self.heaps.iter().flatten().enumerate() {
            let _ = writeln!(out, "  heap {i}: {:<8} ({count})", "|".repeat(*count as usize));
        }

        let status = match (self.winner, self.turn) {
            (Some(w), _) if w == me => "You win! Type `new` to play again.".to_string(),
            (Some(w), _) => format!("{} wins! Type `new` to play again.", self.label(w)),
            (None, Some(t)) if t == me => "Your turn.".to_string(),
            (None, Some(t)) => format!("{}'s turn.", self.label(t)),
            (None, None) => "Waiting for a partner...".to_string(),
        };
        out.push_str(&status);
        out.push('\n');
        out
    }
}
