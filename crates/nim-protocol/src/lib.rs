//! Wire protocol for Nim.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`PlayerSlot`]) —
//!   the messages that travel on the wire, one per datagram.
//! - **Codec** ([`WireFormat`]) — how those messages become bytes and back.
//! - **Errors** ([`ProtocolError`]) — what can go wrong doing that.
//!
//! # Architecture
//!
//! The protocol layer sits between the transport (raw datagrams) and the
//! game engine. It doesn't know about sockets or sessions.
//!
//! ```text
//! Transport (bytes) → Protocol (ClientMessage) → Game (session state)
//! ```

mod codec;
mod error;
mod types;

pub use codec::WireFormat;
pub use error::ProtocolError;
pub use types::{tag, ClientMessage, PlayerSlot, ServerMessage, MAX_NAME_LEN};
