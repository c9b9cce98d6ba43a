//! Error types for the protocol layer.
//!
//! A `ProtocolError` always means "these bytes are not a valid message"
//! (or "this message cannot be put into bytes"). It never means the network
//! failed; that is a `TransportError`.

/// Errors that can occur while encoding or decoding a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The leading byte matches no message of the expected direction.
    #[error("unknown message tag {0:#04x}")]
    UnknownTag(u8),

    /// Fewer bytes were present than the message requires.
    #[error("truncated message: needed {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// A player id field held something other than 0 or 1.
    #[error("invalid player slot {0}")]
    InvalidSlot(u8),

    /// A name field was not valid UTF-8.
    #[error("name is not valid UTF-8")]
    InvalidUtf8,

    /// A name exceeds [`MAX_NAME_LEN`](crate::MAX_NAME_LEN) bytes.
    #[error("name is {len} bytes, limit is {max}")]
    NameTooLong { len: usize, max: usize },

    /// The datagram exceeds [`MAX_DATAGRAM_SIZE`](nim_transport::MAX_DATAGRAM_SIZE).
    #[error("datagram is {len} bytes, limit is {max}")]
    Oversized { len: usize, max: usize },
}
