//! UDP transport implementation using `tokio::net::UdpSocket`.

use tokio::net::UdpSocket;

use crate::{DatagramTransport, PeerAddr, TransportError, MAX_DATAGRAM_SIZE};

/// A [`DatagramTransport`] over one bound UDP socket.
///
/// All methods take `&self`, so one transport can be shared (e.g. behind
/// an `Arc`) between a sending half and a receive loop.
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Binds a new UDP transport to the given `host:port` address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(TransportError::BindFailed)?;
        tracing::info!(addr, "UDP transport bound");
        Ok(Self { socket })
    }
}

impl DatagramTransport for UdpTransport {
    type Error = TransportError;

    async fn recv_from(&self) -> Result<(Vec<u8>, PeerAddr), Self::Error> {
        let mut buf = [0u8; MAX_DATAGRAM_SIZE + 1];
        let (len, from) = self
            .socket
            .recv_from(&mut buf)
            .await
            .map_err(TransportError::ReceiveFailed)?;
        let peer = PeerAddr::from(from);
        tracing::trace!(%peer, len, "datagram received");
        Ok((buf[..len].to_vec(), peer))
    }

    async fn send_to(
        &self,
        data: &[u8],
        peer: PeerAddr,
    ) -> Result<(), Self::Error> {
        self.socket
            .send_to(data, peer.into_inner())
            .await
            .map_err(|source| TransportError::SendFailed { peer, source })?;
        tracing::trace!(%peer, len = data.len(), "datagram sent");
        Ok(())
    }

    fn local_addr(&self) -> Result<PeerAddr, Self::Error> {
        self.socket
            .local_addr()
            .map(PeerAddr::from)
            .map_err(TransportError::LocalAddr)
    }
}
