//! # Nim
//!
//! Two-player Nim over UDP.
//!
//! The server side is a single socket shared by every player. Each
//! datagram is routed by sender address to a [`ClientProxy`], which turns
//! it into an action on the player's [`GameSession`]; the resulting
//! notifications go back out as datagrams. The client side is a
//! [`RemoteSession`] that sends player actions and forwards whatever the
//! server announces over a channel.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nim::prelude::*;
//!
//! # async fn serve() -> Result<(), NimError> {
//! let server = NimServer::builder()
//!     .bind("0.0.0.0:7070")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod client;
mod dispatcher;
mod error;
pub mod logging;
mod proxy;
mod server;

pub use client::RemoteSession;
pub use dispatcher::PeerDispatcher;
pub use error::NimError;
pub use proxy::ClientProxy;
pub use server::{NimServer, NimServerBuilder};

// Re-export sub-crates for advanced usage.
pub use nim_game as game;
pub use nim_protocol as protocol;
pub use nim_transport as transport;

/// Convenience re-exports for building servers and clients.
pub mod prelude {
    pub use crate::{
        ClientProxy, NimError, NimServer, NimServerBuilder, PeerDispatcher,
        RemoteSession,
    };
    pub use nim_game::{
        GameConfig, GameError, GameSession, Outbound, SessionId, SessionPhase,
    };
    pub use nim_protocol::{
        ClientMessage, PlayerSlot, ProtocolError, ServerMessage, WireFormat,
    };
    pub use nim_transport::{
        DatagramTransport, PeerAddr, TransportError, UdpTransport,
    };
}
