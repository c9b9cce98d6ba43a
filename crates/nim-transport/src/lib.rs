//! Datagram transport layer for Nim.
//!
//! Provides the [`DatagramTransport`] trait that abstracts over a single
//! connectionless socket shared by many remote peers, plus [`PeerAddr`],
//! the identity used to tell those peers apart.
//!
//! Nothing here knows about messages or games: a transport moves opaque
//! byte buffers, one per datagram, with no delivery or ordering guarantee.
//!
//! # Feature Flags
//!
//! - `udp` (default) — UDP transport via `tokio::net::UdpSocket`

mod error;
#[cfg(feature = "udp")]
mod udp;

pub use error::TransportError;
#[cfg(feature = "udp")]
pub use udp::UdpTransport;

use std::fmt;
use std::net::SocketAddr;

/// Largest datagram either side of the protocol will accept.
///
/// Every message fits well inside this bound. Transports read
/// into a buffer one byte larger so an oversize datagram is handed up
/// intact enough for the protocol layer to reject it.
pub const MAX_DATAGRAM_SIZE: usize = 128;

/// Network endpoint of a remote peer (host + port).
///
/// Two datagrams with the same `PeerAddr` come from the same logical peer
/// for as long as the server keeps a mapping for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerAddr(SocketAddr);

impl PeerAddr {
    /// Wraps a socket address.
    pub fn new(addr: SocketAddr) -> Self {
        Self(addr)
    }

    /// Returns the underlying socket address.
    pub fn into_inner(self) -> SocketAddr {
        self.0
    }
}

impl From<SocketAddr> for PeerAddr {
    fn from(addr: SocketAddr) -> Self {
        Self(addr)
    }
}

impl fmt::Display for PeerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One socket, many peers: receives datagrams tagged with their sender and
/// sends datagrams to an explicit destination.
pub trait DatagramTransport: Send + Sync + 'static {
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next datagram and returns its bytes and sender.
    ///
    /// The future is `Send` so a receive loop can run on a spawned task.
    fn recv_from(
        &self,
    ) -> impl Future<Output = Result<(Vec<u8>, PeerAddr), Self::Error>> + Send;

    /// Sends one datagram to `peer`.
    fn send_to(
        &self,
        data: &[u8],
        peer: PeerAddr,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Returns the local address the transport is bound to.
    fn local_addr(&self) -> Result<PeerAddr, Self::Error>;
}

/// Resolves `host` and `port` into a single [`PeerAddr`].
///
/// The first address returned by the resolver wins.
pub async fn resolve(host: &str, port: u16) -> Result<PeerAddr, TransportError> {
    let target = format!("{host}:{port}");
    let mut addrs = tokio::net::lookup_host(&target)
        .await
        .map_err(|_| TransportError::Unresolved(target.clone()))?;
    let first = addrs.next().map(PeerAddr::from);
    drop(addrs);
    first.ok_or(TransportError::Unresolved(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn addr(s: &str) -> PeerAddr {
        PeerAddr::from(s.parse::<SocketAddr>().unwrap())
    }

    #[test]
    fn test_peer_addr_display_matches_socket_addr() {
        assert_eq!(addr("127.0.0.1:4000").to_string(), "127.0.0.1:4000");
    }

    #[test]
    fn test_peer_addr_into_inner() {
        let raw: SocketAddr = "10.0.0.2:9".parse().unwrap();
        assert_eq!(PeerAddr::new(raw).into_inner(), raw);
    }

    #[test]
    fn test_peer_addr_port_distinguishes_peers() {
        // Same host, different port: two different players.
        let mut map = HashMap::new();
        map.insert(addr("127.0.0.1:5000"), "alice");
        map.insert(addr("127.0.0.1:5001"), "bob");
        assert_eq!(map.len(), 2);
        assert_eq!(map[&addr("127.0.0.1:5001")], "bob");
    }

    #[tokio::test]
    async fn test_resolve_unknown_host_names_target() {
        match resolve("nim.invalid", 7070).await {
            Err(TransportError::Unresolved(target)) => {
                assert_eq!(target, "nim.invalid:7070");
            }
            other => panic!("expected Unresolved, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_numeric_host() {
        let peer = resolve("127.0.0.1", 7070).await.unwrap();
        assert_eq!(peer, addr("127.0.0.1:7070"));
    }
}
