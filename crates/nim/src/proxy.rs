//! Server-side client proxy: one per remote peer.
//!
//! A proxy turns the datagrams of one peer into calls on the broker or
//! on the session that peer is seated in. The flow per datagram is:
//!   1. Decode bytes → `ClientMessage`
//!   2. Join → broker; Take / NewGame / Quit → the bound session
//!   3. Hand back the resulting notifications and any peers that left

use nim_game::{GameSession, Outbound, QuitOutcome, SessionId};
use nim_protocol::{ClientMessage, ProtocolError, WireFormat};
use nim_transport::PeerAddr;

use crate::dispatcher::SessionHost;

/// What processing one datagram produced.
#[derive(Debug, Default)]
pub(crate) struct Processed {
    /// Notifications to send, in order.
    pub(crate) outbound: Vec<Outbound>,
    /// Peers whose proxies should now be dropped.
    pub(crate) departed: Vec<PeerAddr>,
}

impl Processed {
    fn send(outbound: Vec<Outbound>) -> Self {
        Self {
            outbound,
            departed: Vec::new(),
        }
    }
}

/// Binds one remote peer to the session it has joined.
#[derive(Debug)]
pub struct ClientProxy {
    peer: PeerAddr,
    session: Option<SessionId>,
}

impl ClientProxy {
    /// Creates an unbound proxy for `peer`.
    pub fn new(peer: PeerAddr) -> Self {
        Self {
            peer,
            session: None,
        }
    }

    /// Returns the peer this proxy speaks for.
    pub fn peer(&self) -> PeerAddr {
        self.peer
    }

    /// Returns the session this peer joined, if any.
    pub fn session(&self) -> Option<SessionId> {
        self.session
    }

    /// Decodes one datagram from this peer and applies it.
    pub(crate) fn process(
        &mut self,
        datagram: &[u8],
        host: &mut SessionHost,
    ) -> Result<Processed, ProtocolError> {
        let msg = ClientMessage::decode(datagram)?;
        tracing::debug!(
            peer = %self.peer,
            tag = %char::from(msg.tag()),
            "routing client message"
        );

        let processed = match msg {
            ClientMessage::Join { name } => self.on_join(name, host),
            ClientMessage::Take { heap, count } => {
                self.on_take(heap, count, host)
            }
            ClientMessage::NewGame => self.on_new_game(host),
            ClientMessage::Quit => self.on_quit(host),
        };
        Ok(processed)
    }

    fn on_join(&mut self, name: String, host: &mut SessionHost) -> Processed {
        if let Some(session_id) = self.session {
            tracing::warn!(
                peer = %self.peer,
                %session_id,
                "ignoring join from peer already in a session"
            );
            return Processed::default();
        }

        match host.broker.join(self.peer, name) {
            Ok(joined) => {
                self.session = Some(joined.session_id);
                if let Some(session) = joined.paired {
                    host.active.insert(session.id(), session);
                }
                Processed::send(joined.outbound)
            }
            Err(e) => {
                tracing::warn!(peer = %self.peer, error = %e, "join failed");
                Processed::default()
            }
        }
    }

    fn on_take(
        &mut self,
        heap: u8,
        count: u8,
        host: &mut SessionHost,
    ) -> Processed {
        let peer = self.peer;
        let Some(session) = self.bound_session(host) else {
            tracing::warn!(%peer, "ignoring move from peer not in a session");
            return Processed::default();
        };
        let Some(slot) = session.slot_of(peer) else {
            return Processed::default();
        };

        match session.take(slot, heap, count) {
            Ok(outbound) => {
                tracing::debug!(
                    session_id = %session.id(),
                    %slot,
                    heap,
                    count,
                    "move applied"
                );
                Processed::send(outbound)
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %session.id(),
                    %slot,
                    heap,
                    count,
                    error = %e,
                    "move rejected"
                );
                Processed::default()
            }
        }
    }

    fn on_new_game(&mut self, host: &mut SessionHost) -> Processed {
        let peer = self.peer;
        let Some(session) = self.bound_session(host) else {
            tracing::warn!(%peer, "ignoring new game from peer not in a session");
            return Processed::default();
        };

        match session.new_game() {
            Ok(outbound) => Processed::send(outbound),
            Err(e) => {
                tracing::warn!(
                    session_id = %session.id(),
                    error = %e,
                    "new game rejected"
                );
                Processed::default()
            }
        }
    }

    fn on_quit(&mut self, host: &mut SessionHost) -> Processed {
        let peer = self.peer;
        let gone = Processed {
            outbound: Vec::new(),
            departed: vec![peer],
        };
        let Some(session_id) = self.session.take() else {
            tracing::debug!(%peer, "quit from peer that never joined");
            return gone;
        };
        let Some(session) = host.session_mut(session_id) else {
            return gone;
        };

        match session.quit() {
            QuitOutcome::Closed(outbound) => {
                let departed = session.players().to_vec();
                host.active.remove(&session_id);
                tracing::info!(%session_id, %peer, "session closed");
                Processed { outbound, departed }
            }
            QuitOutcome::ReleasePending => {
                host.broker.quit();
                gone
            }
        }
    }

    fn bound_session<'h>(
        &self,
        host: &'h mut SessionHost,
    ) -> Option<&'h mut GameSession> {
        host.session_mut(self.session?)
    }
}
