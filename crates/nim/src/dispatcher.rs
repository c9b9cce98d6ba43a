//! Peer dispatcher: routes each inbound datagram to its sender's proxy.
//!
//! The server has one socket for everybody, so the sender's address is
//! the only thing that says which player a datagram belongs to. The
//! dispatcher keeps the address → [`ClientProxy`] registry, creates a
//! proxy the first time an address shows up, and drops it once that peer
//! has left.

use std::collections::HashMap;

use nim_game::{GameConfig, GameSession, Outbound, SessionBroker, SessionId};
use nim_transport::PeerAddr;

use crate::proxy::ClientProxy;

/// Everything a proxy can act on: the broker and the paired sessions.
///
/// A half-formed session lives in the broker; once paired it moves into
/// `active` and is owned there until one of its players quits.
#[derive(Debug)]
pub(crate) struct SessionHost {
    pub(crate) broker: SessionBroker,
    pub(crate) active: HashMap<SessionId, GameSession>,
}

impl SessionHost {
    /// Looks `id` up among paired sessions, then the broker's pending one.
    pub(crate) fn session_mut(
        &mut self,
        id: SessionId,
    ) -> Option<&mut GameSession> {
        match self.active.get_mut(&id) {
            Some(session) => Some(session),
            None => self.broker.pending_mut(id),
        }
    }
}

/// Address-keyed registry of client proxies.
///
/// Purely in-memory: [`dispatch`](Self::dispatch) takes the bytes and
/// sender of one datagram and returns the datagrams to send in response.
/// The socket itself belongs to [`NimServer`](crate::NimServer).
#[derive(Debug)]
pub struct PeerDispatcher {
    proxies: HashMap<PeerAddr, ClientProxy>,
    host: SessionHost,
}

impl PeerDispatcher {
    /// Creates an empty dispatcher whose sessions start from `config`.
    pub fn new(config: GameConfig) -> Self {
        Self {
            proxies: HashMap::new(),
            host: SessionHost {
                broker: SessionBroker::new(config),
                active: HashMap::new(),
            },
        }
    }

    /// Routes one datagram from `from` and returns the resulting
    /// notifications, in send order.
    ///
    /// Malformed datagrams are logged and dropped; they never affect any
    /// session and never stop the caller's loop.
    pub fn dispatch(&mut self, from: PeerAddr, datagram: &[u8]) -> Vec<Outbound> {
        let proxy = self.proxies.entry(from).or_insert_with(|| {
            tracing::debug!(peer = %from, "new peer");
            ClientProxy::new(from)
        });

        match proxy.process(datagram, &mut self.host) {
            Ok(processed) => {
                for peer in &processed.departed {
                    if self.proxies.remove(peer).is_some() {
                        tracing::debug!(%peer, "peer removed");
                    }
                }
                processed.outbound
            }
            Err(e) => {
                tracing::warn!(
                    peer = %from,
                    len = datagram.len(),
                    error = %e,
                    "dropping malformed datagram"
                );
                Vec::new()
            }
        }
    }

    /// Returns the proxy registered for `peer`, if any.
    pub fn proxy(&self, peer: PeerAddr) -> Option<&ClientProxy> {
        self.proxies.get(&peer)
    }

    /// Returns the number of registered peers.
    pub fn peer_count(&self) -> usize {
        self.proxies.len()
    }

    /// Returns a paired session by ID.
    pub fn session(&self, id: SessionId) -> Option<&GameSession> {
        self.host.active.get(&id)
    }

    /// Returns the number of paired sessions.
    pub fn session_count(&self) -> usize {
        self.host.active.len()
    }

    /// Returns the session waiting for a second player, if any.
    pub fn pending_session(&self) -> Option<&GameSession> {
        self.host.broker.pending()
    }
}

impl Default for PeerDispatcher {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
