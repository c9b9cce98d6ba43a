//! Unified error type for the Nim crates.

use nim_protocol::ProtocolError;
use nim_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum NimError {
    /// A transport-level error (bind, send, receive, resolve).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (unknown tag, truncated, bad field).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
