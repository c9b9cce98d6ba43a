//! Client side: a player's connection to a remote Nim server.
//!
//! [`RemoteSession`] is the player's stand-in for the game session that
//! lives on the server. Its methods each send one datagram; everything
//! the server says back arrives on the channel returned by
//! [`RemoteSession::connect`].

use std::sync::Arc;

use nim_protocol::{ClientMessage, ServerMessage, WireFormat};
use nim_transport::{DatagramTransport, PeerAddr, UdpTransport};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::NimError;

/// Client end of one game: sends player actions to the server.
pub struct RemoteSession<T: DatagramTransport = UdpTransport> {
    transport: Arc<T>,
    server: PeerAddr,
    receiver: JoinHandle<()>,
}

impl RemoteSession<UdpTransport> {
    /// Binds `local_addr` and starts listening for notifications from
    /// `server`.
    ///
    /// Returns the session along with the receiving end of its
    /// notification channel. The channel closes when the receive task
    /// stops on a socket error.
    pub async fn connect(
        local_addr: &str,
        server: PeerAddr,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ServerMessage>), NimError> {
        let transport = UdpTransport::bind(local_addr).await?;
        Ok(Self::with_transport(transport, server))
    }
}

impl<T> RemoteSession<T>
where
    T: DatagramTransport,
    NimError: From<T::Error>,
{
    /// Starts listening for notifications from `server` on an
    /// already-bound transport.
    pub fn with_transport(
        transport: T,
        server: PeerAddr,
    ) -> (Self, mpsc::UnboundedReceiver<ServerMessage>) {
        let transport = Arc::new(transport);
        let (tx, rx) = mpsc::unbounded_channel();
        let receiver = tokio::spawn(receive_loop(Arc::clone(&transport), server, tx));

        (
            Self {
                transport,
                server,
                receiver,
            },
            rx,
        )
    }

    /// Returns the local address this client is bound to.
    pub fn local_addr(&self) -> Result<PeerAddr, NimError> {
        Ok(self.transport.local_addr()?)
    }

    /// Returns the server this client talks to.
    pub fn server(&self) -> PeerAddr {
        self.server
    }

    /// Asks to be seated under `name`.
    pub async fn join(&self, name: &str) -> Result<(), NimError> {
        self.send(ClientMessage::Join {
            name: name.to_string(),
        })
        .await
    }

    /// Removes `count` markers from heap `heap`.
    pub async fn take(&self, heap: u8, count: u8) -> Result<(), NimError> {
        self.send(ClientMessage::Take { heap, count }).await
    }

    /// Asks for a fresh board.
    pub async fn new_game(&self) -> Result<(), NimError> {
        self.send(ClientMessage::NewGame).await
    }

    /// Leaves the session.
    pub async fn quit(&self) -> Result<(), NimError> {
        self.send(ClientMessage::Quit).await
    }

    async fn send(&self, msg: ClientMessage) -> Result<(), NimError> {
        let bytes = msg.encode()?;
        self.transport.send_to(&bytes, self.server).await?;
        Ok(())
    }
}

impl<T: DatagramTransport> Drop for RemoteSession<T> {
    fn drop(&mut self) {
        self.receiver.abort();
    }
}

/// Decodes notifications from `server` and forwards them in arrival order.
async fn receive_loop<T: DatagramTransport>(
    transport: Arc<T>,
    server: PeerAddr,
    tx: mpsc::UnboundedSender<ServerMessage>,
) {
    loop {
        let (datagram, from) = match transport.recv_from().await {
            Ok(received) => received,
            Err(e) => {
                tracing::error!(error = %e, "receive failed, closing session");
                return;
            }
        };
        if from != server {
            tracing::debug!(peer = %from, "ignoring datagram from unknown peer");
            continue;
        }

        match ServerMessage::decode(&datagram) {
            Ok(msg) => {
                if tx.send(msg).is_err() {
                    tracing::debug!("notification channel closed");
                    return;
                }
            }
            Err(e) => {
                tracing::warn!(
                    peer = %from,
                    error = %e,
                    "dropping malformed notification"
                );
            }
        }
    }
}
