//! A single game session: authoritative state for one two-player match.
//!
//! A `GameSession` never touches the network. Every operation returns the
//! notifications it produced as a list of [`Outbound`] messages, already
//! addressed and ordered; the caller encodes and sends them.

use std::fmt;

use nim_protocol::{PlayerSlot, ServerMessage};
use nim_transport::PeerAddr;

use crate::{GameConfig, GameError, SessionPhase, HEAP_COUNT};

/// Identifier for a session, unique within one broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

/// A server message addressed to one peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    /// Destination peer.
    pub to: PeerAddr,
    /// The notification to deliver.
    pub message: ServerMessage,
}

/// What a quit request turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuitOutcome {
    /// The session was full: both players are told to shut down.
    Closed(Vec<Outbound>),
    /// Only one seat was filled: the half-formed session should be
    /// released by whoever is holding it for matchmaking.
    ReleasePending,
}

/// Authoritative state for one match between two peers.
#[derive(Debug, Clone)]
pub struct GameSession {
    id: SessionId,
    config: GameConfig,
    phase: SessionPhase,
    heaps: [u8; HEAP_COUNT],
    scores: [u8; 2],
    turn: PlayerSlot,
    names: [String; 2],
    /// Seated peers in slot order.
    players: Vec<PeerAddr>,
}

impl GameSession {
    /// Creates an empty session with full heaps.
    pub fn new(id: SessionId, config: GameConfig) -> Self {
        Self {
            id,
            heaps: config.initial_heaps,
            config,
            phase: SessionPhase::AwaitingFirst,
            scores: [0, 0],
            turn: PlayerSlot::First,
            names: [String::new(), String::new()],
            players: Vec::with_capacity(2),
        }
    }

    /// Seats `peer` in the next free slot and returns the slot along with
    /// the notifications that seating produced.
    ///
    /// The first joiner only learns about themselves. The second joiner
    /// learns their id, and then both players get the full board.
    pub fn join(
        &mut self,
        peer: PeerAddr,
        name: String,
    ) -> Result<(PlayerSlot, Vec<Outbound>), GameError> {
        if self.players.contains(&peer) {
            return Err(GameError::AlreadySeated(peer, self.id));
        }

        let mut out = Vec::new();
        let slot = match self.phase {
            SessionPhase::AwaitingFirst => {
                let slot = PlayerSlot::First;
                self.seat(slot, peer, name);
                self.phase = SessionPhase::AwaitingSecond;
                out.push(Outbound {
                    to: peer,
                    message: ServerMessage::Id { slot },
                });
                out.push(Outbound {
                    to: peer,
                    message: ServerMessage::Name {
                        slot,
                        name: self.names[slot.index()].clone(),
                    },
                });
                out.push(Outbound {
                    to: peer,
                    message: ServerMessage::Score {
                        slot,
                        score: self.scores[slot.index()],
                    },
                });
                slot
            }
            SessionPhase::AwaitingSecond => {
                let slot = PlayerSlot::Second;
                self.seat(slot, peer, name);
                self.phase = SessionPhase::InPlay;
                out.push(Outbound {
                    to: peer,
                    message: ServerMessage::Id { slot },
                });
                self.broadcast_heaps(&mut out);
                for slot in PlayerSlot::ALL {
                    self.broadcast(
                        &mut out,
                        ServerMessage::Name {
                            slot,
                            name: self.names[slot.index()].clone(),
                        },
                    );
                }
                self.broadcast(
                    &mut out,
                    ServerMessage::Score {
                        slot: self.turn,
                        score: self.scores[self.turn.index()],
                    },
                );
                self.broadcast(&mut out, ServerMessage::Turn { slot: self.turn });
                slot
            }
            SessionPhase::InPlay | SessionPhase::RoundWon(_) => {
                return Err(GameError::SessionFull(self.id));
            }
        };

        tracing::debug!(
            session_id = %self.id,
            %peer,
            %slot,
            phase = %self.phase,
            "player seated"
        );
        Ok((slot, out))
    }

    /// Removes `count` markers from heap `heap` on behalf of `mover`.
    ///
    /// Broadcasts the changed heap, then either the next turn or, when the
    /// board is empty, the winner and their new score. After a win the turn
    /// resets to player 0 and the heaps stay empty until
    /// [`new_game`](Self::new_game).
    ///
    /// # Errors
    /// A move is rejected, with no state change and no notifications, when
    /// the round isn't in play, it isn't `mover`'s turn, the heap doesn't
    /// exist, `count` is zero, or `count` exceeds what the heap holds.
    pub fn take(
        &mut self,
        mover: PlayerSlot,
        heap: u8,
        count: u8,
    ) -> Result<Vec<Outbound>, GameError> {
        self.validate_take(mover, heap, count)?;

        let index = heap as usize;
        self.heaps[index] -= count;

        let mut out = Vec::new();
        self.broadcast(
            &mut out,
            ServerMessage::Heap {
                heap,
                count: self.heaps[index],
            },
        );

        if self.heaps.iter().all(|&h| h == 0) {
            let winner = self.turn;
            let score = &mut self.scores[winner.index()];
            *score = score.saturating_add(1);
            let score = *score;

            self.broadcast(&mut out, ServerMessage::Win { slot: winner });
            self.broadcast(
                &mut out,
                ServerMessage::Score {
                    slot: winner,
                    score,
                },
            );
            self.turn = PlayerSlot::First;
            self.phase = SessionPhase::RoundWon(winner);
            tracing::info!(session_id = %self.id, %winner, score, "round won");
        } else {
            self.turn = self.turn.other();
            self.broadcast(&mut out, ServerMessage::Turn { slot: self.turn });
        }

        Ok(out)
    }

    fn validate_take(
        &self,
        mover: PlayerSlot,
        heap: u8,
        count: u8,
    ) -> Result<(), GameError> {
        if !self.phase.accepts_moves() {
            return Err(GameError::InvalidPhase(self.phase));
        }
        if mover != self.turn {
            return Err(GameError::NotYourTurn {
                expected: self.turn,
                actual: mover,
            });
        }
        let remaining = *self
            .heaps
            .get(heap as usize)
            .ok_or(GameError::NoSuchHeap(heap))?;
        if count == 0 {
            return Err(GameError::EmptyTake);
        }
        if count > remaining {
            return Err(GameError::TooMany {
                heap,
                requested: count,
                remaining,
            });
        }
        Ok(())
    }

    /// Refills the heaps and gives the first move to player 0.
    ///
    /// Scores are untouched. Accepted mid-round as well as after a win.
    pub fn new_game(&mut self) -> Result<Vec<Outbound>, GameError> {
        if !self.phase.is_full() {
            return Err(GameError::InvalidPhase(self.phase));
        }

        self.heaps = self.config.initial_heaps;
        self.turn = PlayerSlot::First;
        self.phase = SessionPhase::InPlay;

        let mut out = Vec::new();
        self.broadcast_heaps(&mut out);
        self.broadcast(&mut out, ServerMessage::Turn { slot: self.turn });
        tracing::info!(session_id = %self.id, "new round started");
        Ok(out)
    }

    /// Handles a quit from either seated player.
    pub fn quit(&self) -> QuitOutcome {
        if self.players.len() == 2 {
            let mut out = Vec::new();
            self.broadcast(&mut out, ServerMessage::Quit);
            QuitOutcome::Closed(out)
        } else {
            QuitOutcome::ReleasePending
        }
    }

    /// Returns the slot `peer` is seated in, if any.
    pub fn slot_of(&self, peer: PeerAddr) -> Option<PlayerSlot> {
        self.players
            .iter()
            .position(|p| *p == peer)
            .and_then(|i| PlayerSlot::try_from(i as u8).ok())
    }

    /// Returns the session's ID.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Returns the current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Returns the marker count of every heap.
    pub fn heaps(&self) -> [u8; HEAP_COUNT] {
        self.heaps
    }

    /// Returns both scores, indexed by slot.
    pub fn scores(&self) -> [u8; 2] {
        self.scores
    }

    /// Returns whose turn it is.
    pub fn turn(&self) -> PlayerSlot {
        self.turn
    }

    /// Returns the name of the player in `slot` (empty if unseated).
    pub fn name(&self, slot: PlayerSlot) -> &str {
        &self.names[slot.index()]
    }

    /// Returns the seated peers in slot order.
    pub fn players(&self) -> &[PeerAddr] {
        &self.players
    }

    fn seat(&mut self, slot: PlayerSlot, peer: PeerAddr, name: String) {
        self.names[slot.index()] = name;
        self.players.push(peer);
    }

    fn broadcast_heaps(&self, out: &mut Vec<Outbound>) {
        for (i, count) in self.heaps.iter().enumerate() {
            self.broadcast(
                out,
                ServerMessage::Heap {
                    heap: i as u8,
                    count: *count,
                },
            );
        }
    }

    /// Queues `message` for every seated player, slot 0 first.
    fn broadcast(&self, out: &mut Vec<Outbound>, message: ServerMessage) {
        for peer in &self.players {
            out.push(Outbound {
                to: *peer,
                message: message.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(port: u16) -> PeerAddr {
        PeerAddr::from(std::net::SocketAddr::from(([127, 0, 0, 1], port)))
    }

    fn full_session() -> GameSession {
        let mut s = GameSession::new(SessionId(1), GameConfig::default());
        s.join(peer(1), "Alice".into()).unwrap();
        s.join(peer(2), "Bob".into()).unwrap();
        s
    }

    fn messages_to(out: &[Outbound], to: PeerAddr) -> Vec<ServerMessage> {
        out.iter()
            .filter(|o| o.to == to)
            .map(|o| o.message.clone())
            .collect()
    }

    #[test]
    fn test_new_session_is_empty_with_full_heaps() {
        let s = GameSession::new(SessionId(3), GameConfig::default());
        assert_eq!(s.phase(), SessionPhase::AwaitingFirst);
        assert_eq!(s.heaps(), [3, 4, 5]);
        assert_eq!(s.scores(), [0, 0]);
        assert!(s.players().is_empty());
    }

    #[test]
    fn test_first_join_notifies_only_the_joiner() {
        let mut s = GameSession::new(SessionId(1), GameConfig::default());
        let (slot, out) = s.join(peer(1), "Alice".into()).unwrap();

        assert_eq!(slot, PlayerSlot::First);
        assert_eq!(s.phase(), SessionPhase::AwaitingSecond);
        assert!(out.iter().all(|o| o.to == peer(1)));
        assert_eq!(
            messages_to(&out, peer(1)),
            vec![
                ServerMessage::Id {
                    slot: PlayerSlot::First
                },
                ServerMessage::Name {
                    slot: PlayerSlot::First,
                    name: "Alice".into()
                },
                ServerMessage::Score {
                    slot: PlayerSlot::First,
                    score: 0
                },
            ]
        );
    }

    #[test]
    fn test_second_join_broadcasts_board_in_slot_order() {
        let mut s = GameSession::new(SessionId(1), GameConfig::default());
        s.join(peer(1), "Alice".into()).unwrap();
        let (slot, out) = s.join(peer(2), "Bob".into()).unwrap();

        assert_eq!(slot, PlayerSlot::Second);
        assert_eq!(s.phase(), SessionPhase::InPlay);
        // Id goes to the joiner alone, first.
        assert_eq!(out[0].to, peer(2));
        // Every broadcast goes to slot 0 then slot 1.
        for pair in out[1..].chunks(2) {
            assert_eq!(pair[0].to, peer(1));
            assert_eq!(pair[1].to, peer(2));
            assert_eq!(pair[0].message, pair[1].message);
        }
        assert_eq!(
            messages_to(&out[1..], peer(1)),
            vec![
                ServerMessage::Heap { heap: 0, count: 3 },
                ServerMessage::Heap { heap: 1, count: 4 },
                ServerMessage::Heap { heap: 2, count: 5 },
                ServerMessage::Name {
                    slot: PlayerSlot::First,
                    name: "Alice".into()
                },
                ServerMessage::Name {
                    slot: PlayerSlot::Second,
                    name: "Bob".into()
                },
                ServerMessage::Score {
                    slot: PlayerSlot::First,
                    score: 0
                },
                ServerMessage::Turn {
                    slot: PlayerSlot::First
                },
            ]
        );
    }

    #[test]
    fn test_third_join_is_rejected() {
        let mut s = full_session();
        assert_eq!(
            s.join(peer(3), "Carol".into()),
            Err(GameError::SessionFull(SessionId(1)))
        );
    }

    #[test]
    fn test_same_peer_cannot_take_both_seats() {
        let mut s = GameSession::new(SessionId(1), GameConfig::default());
        s.join(peer(1), "Alice".into()).unwrap();
        assert_eq!(
            s.join(peer(1), "Alice again".into()),
            Err(GameError::AlreadySeated(peer(1), SessionId(1)))
        );
    }

    #[test]
    fn test_take_decrements_only_the_chosen_heap() {
        let mut s = full_session();
        let out = s.take(PlayerSlot::First, 1, 3).unwrap();

        assert_eq!(s.heaps(), [3, 1, 5]);
        assert_eq!(s.turn(), PlayerSlot::Second);
        assert_eq!(
            messages_to(&out, peer(2)),
            vec![
                ServerMessage::Heap { heap: 1, count: 1 },
                ServerMessage::Turn {
                    slot: PlayerSlot::Second
                },
            ]
        );
    }

    #[test]
    fn test_emptying_the_board_wins_the_round() {
        let mut s = full_session();
        s.take(PlayerSlot::First, 0, 3).unwrap();
        s.take(PlayerSlot::Second, 1, 4).unwrap();
        let out = s.take(PlayerSlot::First, 2, 5).unwrap();

        assert_eq!(s.heaps(), [0, 0, 0]);
        assert_eq!(s.scores(), [1, 0]);
        assert_eq!(s.turn(), PlayerSlot::First);
        assert_eq!(s.phase(), SessionPhase::RoundWon(PlayerSlot::First));
        let wins = out
            .iter()
            .filter(|o| matches!(o.message, ServerMessage::Win { .. }))
            .count();
        assert_eq!(wins, 2, "one Win per player");
        assert_eq!(
            messages_to(&out, peer(1)),
            vec![
                ServerMessage::Heap { heap: 2, count: 0 },
                ServerMessage::Win {
                    slot: PlayerSlot::First
                },
                ServerMessage::Score {
                    slot: PlayerSlot::First,
                    score: 1
                },
            ]
        );
    }

    #[test]
    fn test_second_player_win_resets_turn_to_first() {
        let mut s = full_session();
        s.take(PlayerSlot::First, 0, 3).unwrap();
        s.take(PlayerSlot::Second, 1, 4).unwrap();
        s.take(PlayerSlot::First, 2, 4).unwrap();
        s.take(PlayerSlot::Second, 2, 1).unwrap();

        assert_eq!(s.scores(), [0, 1]);
        assert_eq!(s.turn(), PlayerSlot::First);
        assert_eq!(s.phase(), SessionPhase::RoundWon(PlayerSlot::Second));
    }

    #[test]
    fn test_rejected_takes_change_nothing() {
        let mut s = full_session();
        let before = (s.heaps(), s.turn(), s.scores());

        assert_eq!(
            s.take(PlayerSlot::Second, 0, 1),
            Err(GameError::NotYourTurn {
                expected: PlayerSlot::First,
                actual: PlayerSlot::Second
            })
        );
        assert_eq!(
            s.take(PlayerSlot::First, 3, 1),
            Err(GameError::NoSuchHeap(3))
        );
        assert_eq!(s.take(PlayerSlot::First, 0, 0), Err(GameError::EmptyTake));
        assert_eq!(
            s.take(PlayerSlot::First, 0, 4),
            Err(GameError::TooMany {
                heap: 0,
                requested: 4,
                remaining: 3
            })
        );

        assert_eq!((s.heaps(), s.turn(), s.scores()), before);
    }

    #[test]
    fn test_take_before_opponent_arrives_is_rejected() {
        let mut s = GameSession::new(SessionId(1), GameConfig::default());
        s.join(peer(1), "Alice".into()).unwrap();
        assert_eq!(
            s.take(PlayerSlot::First, 0, 1),
            Err(GameError::InvalidPhase(SessionPhase::AwaitingSecond))
        );
    }

    #[test]
    fn test_take_after_win_is_rejected_until_new_game() {
        let mut s = full_session();
        s.take(PlayerSlot::First, 0, 3).unwrap();
        s.take(PlayerSlot::Second, 1, 4).unwrap();
        s.take(PlayerSlot::First, 2, 5).unwrap();

        assert!(matches!(
            s.take(PlayerSlot::First, 0, 1),
            Err(GameError::InvalidPhase(SessionPhase::RoundWon(_)))
        ));
    }

    #[test]
    fn test_new_game_refills_heaps_and_keeps_scores() {
        let mut s = full_session();
        s.take(PlayerSlot::First, 0, 3).unwrap();
        s.take(PlayerSlot::Second, 1, 4).unwrap();
        s.take(PlayerSlot::First, 2, 5).unwrap();

        let out = s.new_game().unwrap();

        assert_eq!(s.heaps(), [3, 4, 5]);
        assert_eq!(s.turn(), PlayerSlot::First);
        assert_eq!(s.scores(), [1, 0]);
        assert_eq!(s.phase(), SessionPhase::InPlay);
        assert_eq!(
            messages_to(&out, peer(2)),
            vec![
                ServerMessage::Heap { heap: 0, count: 3 },
                ServerMessage::Heap { heap: 1, count: 4 },
                ServerMessage::Heap { heap: 2, count: 5 },
                ServerMessage::Turn {
                    slot: PlayerSlot::First
                },
            ]
        );
    }

    #[test]
    fn test_new_game_mid_round_resets_turn() {
        let mut s = full_session();
        s.take(PlayerSlot::First, 2, 2).unwrap();
        assert_eq!(s.turn(), PlayerSlot::Second);

        s.new_game().unwrap();
        assert_eq!(s.turn(), PlayerSlot::First);
        assert_eq!(s.heaps(), [3, 4, 5]);
    }

    #[test]
    fn test_new_game_needs_two_players() {
        let mut s = GameSession::new(SessionId(1), GameConfig::default());
        s.join(peer(1), "Alice".into()).unwrap();
        assert_eq!(
            s.new_game(),
            Err(GameError::InvalidPhase(SessionPhase::AwaitingSecond))
        );
    }

    #[test]
    fn test_custom_initial_heaps() {
        let config = GameConfig {
            initial_heaps: [1, 1, 1],
        };
        let mut s = GameSession::new(SessionId(9), config);
        s.join(peer(1), "A".into()).unwrap();
        s.join(peer(2), "B".into()).unwrap();
        s.take(PlayerSlot::First, 0, 1).unwrap();
        s.take(PlayerSlot::Second, 1, 1).unwrap();
        s.take(PlayerSlot::First, 2, 1).unwrap();
        assert_eq!(s.phase(), SessionPhase::RoundWon(PlayerSlot::First));

        s.new_game().unwrap();
        assert_eq!(s.heaps(), [1, 1, 1]);
    }

    #[test]
    fn test_quit_from_full_session_closes_for_both() {
        let s = full_session();
        match s.quit() {
            QuitOutcome::Closed(out) => {
                assert_eq!(
                    out,
                    vec![
                        Outbound {
                            to: peer(1),
                            message: ServerMessage::Quit
                        },
                        Outbound {
                            to: peer(2),
                            message: ServerMessage::Quit
                        },
                    ]
                );
            }
            other => panic!("expected Closed, got {other:?}"),
        }
    }

    #[test]
    fn test_quit_from_half_session_releases_it() {
        let mut s = GameSession::new(SessionId(1), GameConfig::default());
        s.join(peer(1), "Alice".into()).unwrap();
        assert_eq!(s.quit(), QuitOutcome::ReleasePending);
    }

    #[test]
    fn test_slot_of() {
        let s = full_session();
        assert_eq!(s.slot_of(peer(1)), Some(PlayerSlot::First));
        assert_eq!(s.slot_of(peer(2)), Some(PlayerSlot::Second));
        assert_eq!(s.slot_of(peer(3)), None);
    }
}
