//! `NimServer` builder and server loop.
//!
//! This is the entry point for running a Nim server. It ties the layers
//! together: transport → protocol → dispatcher → game.

use nim_game::{GameConfig, Outbound};
use nim_protocol::WireFormat;
use nim_transport::{DatagramTransport, PeerAddr, UdpTransport};

use crate::{NimError, PeerDispatcher};

/// Builder for configuring and starting a Nim server.
///
/// # Example
///
/// ```rust,ignore
/// use nim::prelude::*;
///
/// let server = NimServer::builder()
///     .bind("0.0.0.0:7070")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct NimServerBuilder {
    bind_addr: String,
    game_config: GameConfig,
}

impl NimServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:7070".to_string(),
            game_config: GameConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the starting board used for every session.
    pub fn game_config(mut self, config: GameConfig) -> Self {
        self.game_config = config;
        self
    }

    /// Binds the UDP socket and returns a server ready to [`run`](NimServer::run).
    pub async fn build(self) -> Result<NimServer<UdpTransport>, NimError> {
        let transport = UdpTransport::bind(&self.bind_addr).await?;
        Ok(NimServer::with_transport(transport, self.game_config))
    }
}

impl Default for NimServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A Nim server: one shared socket, one dispatcher, one loop.
///
/// Datagrams are handled strictly one at a time in arrival order, so the
/// game state needs no locking.
pub struct NimServer<T: DatagramTransport = UdpTransport> {
    transport: T,
    dispatcher: PeerDispatcher,
}

impl NimServer<UdpTransport> {
    /// Creates a new builder.
    pub fn builder() -> NimServerBuilder {
        NimServerBuilder::new()
    }
}

impl<T> NimServer<T>
where
    T: DatagramTransport,
    NimError: From<T::Error>,
{
    /// Creates a server over an already-bound transport.
    pub fn with_transport(transport: T, config: GameConfig) -> Self {
        Self {
            transport,
            dispatcher: PeerDispatcher::new(config),
        }
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<PeerAddr, NimError> {
        Ok(self.transport.local_addr()?)
    }

    /// Returns the dispatcher, for inspecting sessions and peers.
    pub fn dispatcher(&self) -> &PeerDispatcher {
        &self.dispatcher
    }

    /// Receives one datagram, routes it, and sends every resulting
    /// notification before returning.
    ///
    /// Malformed datagrams are absorbed by the dispatcher; only transport
    /// failures surface as errors.
    pub async fn receive_and_route(&mut self) -> Result<(), NimError> {
        let (datagram, from) = self.transport.recv_from().await?;
        let outbound = self.dispatcher.dispatch(from, &datagram);
        self.deliver(outbound).await
    }

    async fn deliver(&self, outbound: Vec<Outbound>) -> Result<(), NimError> {
        for Outbound { to, message } in outbound {
            let bytes = message.encode()?;
            self.transport.send_to(&bytes, to).await?;
        }
        Ok(())
    }

    /// Runs the server loop until a transport error occurs.
    ///
    /// Send and receive failures on the shared socket are fatal: the loop
    /// logs the error and returns it.
    pub async fn run(mut self) -> Result<(), NimError> {
        let addr = self.local_addr()?;
        tracing::info!(%addr, "Nim server running");

        loop {
            if let Err(e) = self.receive_and_route().await {
                tracing::error!(error = %e, "server loop stopped");
                return Err(e);
            }
        }
    }
}
