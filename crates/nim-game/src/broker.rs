//! Session broker: pairs joining peers into two-player sessions.

use nim_protocol::PlayerSlot;
use nim_transport::PeerAddr;

use crate::{GameConfig, GameError, GameSession, Outbound, SessionId};

/// Result of a successful [`SessionBroker::join`].
#[derive(Debug)]
pub struct Joined {
    /// The session the peer was seated in.
    pub session_id: SessionId,
    /// The seat the peer got.
    pub slot: PlayerSlot,
    /// Notifications produced by seating the peer.
    pub outbound: Vec<Outbound>,
    /// The session, handed over once its second seat is filled.
    ///
    /// `None` while the session is still waiting for an opponent; the
    /// broker keeps it until then.
    pub paired: Option<GameSession>,
}

/// Matchmaking for two-player sessions.
///
/// Holds at most one pending session: one with a single player seated,
/// waiting for a second. When the second player arrives the session is
/// handed back to the caller and the broker forgets it, so the next two
/// joiners always start a brand-new session.
#[derive(Debug)]
pub struct SessionBroker {
    config: GameConfig,
    pending: Option<GameSession>,
    next_id: u64,
}

impl SessionBroker {
    /// Creates a broker whose sessions start from `config`.
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            pending: None,
            next_id: 1,
        }
    }

    /// Seats `peer` in the pending session, creating one if needed.
    pub fn join(
        &mut self,
        peer: PeerAddr,
        name: String,
    ) -> Result<Joined, GameError> {
        match self.pending.take() {
            None => {
                let session_id = SessionId(self.next_id);
                self.next_id += 1;
                let mut session =
                    GameSession::new(session_id, self.config.clone());
                let (slot, outbound) = session.join(peer, name)?;
                tracing::info!(%session_id, %peer, "session created");
                self.pending = Some(session);
                Ok(Joined {
                    session_id,
                    slot,
                    outbound,
                    paired: None,
                })
            }
            Some(mut session) => match session.join(peer, name) {
                Ok((slot, outbound)) => {
                    let session_id = session.id();
                    tracing::info!(%session_id, %peer, "session paired");
                    Ok(Joined {
                        session_id,
                        slot,
                        outbound,
                        paired: Some(session),
                    })
                }
                Err(e) => {
                    self.pending = Some(session);
                    Err(e)
                }
            },
        }
    }

    /// Discards the pending half-formed session, if any, and returns it.
    ///
    /// Has no effect on sessions that were already paired; the broker no
    /// longer holds those.
    pub fn quit(&mut self) -> Option<GameSession> {
        let released = self.pending.take();
        if let Some(session) = &released {
            tracing::info!(session_id = %session.id(), "pending session released");
        }
        released
    }

    /// Returns the pending session, if one is waiting.
    pub fn pending(&self) -> Option<&GameSession> {
        self.pending.as_ref()
    }

    /// Returns the pending session if its ID is `id`.
    pub fn pending_mut(&mut self, id: SessionId) -> Option<&mut GameSession> {
        self.pending.as_mut().filter(|s| s.id() == id)
    }
}

impl Default for SessionBroker {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(port: u16) -> PeerAddr {
        PeerAddr::from(std::net::SocketAddr::from(([127, 0, 0, 1], port)))
    }

    #[test]
    fn test_first_join_creates_pending_session() {
        let mut broker = SessionBroker::default();
        let joined = broker.join(peer(1), "Alice".into()).unwrap();

        assert_eq!(joined.slot, PlayerSlot::First);
        assert!(joined.paired.is_none());
        assert_eq!(
            broker.pending().map(GameSession::id),
            Some(joined.session_id)
        );
    }

    #[test]
    fn test_second_join_hands_session_over() {
        let mut broker = SessionBroker::default();
        let first = broker.join(peer(1), "Alice".into()).unwrap();
        let second = broker.join(peer(2), "Bob".into()).unwrap();

        assert_eq!(second.slot, PlayerSlot::Second);
        assert_eq!(second.session_id, first.session_id);
        let session = second.paired.expect("session should be handed over");
        assert_eq!(session.players(), &[peer(1), peer(2)]);
        assert!(broker.pending().is_none());
    }

    #[test]
    fn test_quit_releases_pending_session() {
        let mut broker = SessionBroker::default();
        let joined = broker.join(peer(1), "Alice".into()).unwrap();

        let released = broker.quit().expect("pending session");
        assert_eq!(released.id(), joined.session_id);
        assert!(broker.pending().is_none());

        // The next joiner starts over as player 0 in a new session.
        let next = broker.join(peer(2), "Bob".into()).unwrap();
        assert_eq!(next.slot, PlayerSlot::First);
        assert_ne!(next.session_id, joined.session_id);
    }

    #[test]
    fn test_quit_without_pending_is_a_no_op() {
        let mut broker = SessionBroker::default();
        broker.join(peer(1), "Alice".into()).unwrap();
        broker.join(peer(2), "Bob".into()).unwrap();
        assert!(broker.quit().is_none());
    }

    #[test]
    fn test_rejected_join_keeps_pending_session() {
        let mut broker = SessionBroker::default();
        broker.join(peer(1), "Alice".into()).unwrap();
        assert!(broker.join(peer(1), "Alice".into()).is_err());
        assert!(broker.pending().is_some());
    }

    #[test]
    fn test_pending_mut_checks_id() {
        let mut broker = SessionBroker::default();
        let joined = broker.join(peer(1), "Alice".into()).unwrap();
        assert!(broker.pending_mut(joined.session_id).is_some());
        assert!(broker.pending_mut(SessionId(999)).is_none());
    }
}
