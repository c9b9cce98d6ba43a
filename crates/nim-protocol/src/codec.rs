//! Binary encoding for Nim messages.
//!
//! Layout: one tag byte, then the fields of that message in order.
//!
//! ```text
//! integer  → 1 byte, unsigned
//! slot     → 1 byte, 0 or 1
//! name     → 2-byte big-endian length, then that many bytes of UTF-8
//! ```
//!
//! Bytes after a complete message are ignored.

use nim_transport::MAX_DATAGRAM_SIZE;

use crate::types::{tag, ClientMessage, PlayerSlot, ServerMessage, MAX_NAME_LEN};
use crate::ProtocolError;

/// Conversion between a message and the bytes of one datagram.
///
/// Implemented for [`ClientMessage`] and [`ServerMessage`]. The implementing
/// type picks the direction, which is how the decoder knows whether `N`
/// means "new game" or "name".
pub trait WireFormat: Sized {
    /// Encodes the message into a fresh buffer.
    ///
    /// # Errors
    /// Returns [`ProtocolError::NameTooLong`] if a name field exceeds
    /// [`MAX_NAME_LEN`].
    fn encode(&self) -> Result<Vec<u8>, ProtocolError>;

    /// Decodes one message from a datagram.
    ///
    /// # Errors
    /// - [`ProtocolError::UnknownTag`] — leading byte is not a known tag
    /// - [`ProtocolError::Truncated`] — fewer bytes than the message needs
    /// - [`ProtocolError::Oversized`] — datagram exceeds the size bound
    /// - [`ProtocolError::InvalidSlot`], [`ProtocolError::InvalidUtf8`],
    ///   [`ProtocolError::NameTooLong`] — malformed fields
    fn decode(data: &[u8]) -> Result<Self, ProtocolError>;
}

// ---------------------------------------------------------------------------
// Writer / Reader
// ---------------------------------------------------------------------------

struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn new(tag: u8) -> Self {
        let mut buf = Vec::with_capacity(8);
        buf.push(tag);
        Self { buf }
    }

    fn u8(mut self, value: u8) -> Self {
        self.buf.push(value);
        self
    }

    fn slot(self, slot: PlayerSlot) -> Self {
        self.u8(slot.to_wire())
    }

    fn name(mut self, name: &str) -> Result<Self, ProtocolError> {
        let bytes = name.as_bytes();
        if bytes.len() > MAX_NAME_LEN {
            return Err(ProtocolError::NameTooLong {
                len: bytes.len(),
                max: MAX_NAME_LEN,
            });
        }
        self.buf.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
        self.buf.extend_from_slice(bytes);
        Ok(self)
    }

    fn finish(self) -> Vec<u8> {
        self.buf
    }
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Result<Self, ProtocolError> {
        if data.len() > MAX_DATAGRAM_SIZE {
            return Err(ProtocolError::Oversized {
                len: data.len(),
                max: MAX_DATAGRAM_SIZE,
            });
        }
        Ok(Self { data, pos: 0 })
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ProtocolError> {
        let end = self.pos + n;
        if end > self.data.len() {
            return Err(ProtocolError::Truncated {
                expected: end,
                actual: self.data.len(),
            });
        }
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn u8(&mut self) -> Result<u8, ProtocolError> {
        Ok(self.take(1)?[0])
    }

    fn slot(&mut self) -> Result<PlayerSlot, ProtocolError> {
        PlayerSlot::try_from(self.u8()?)
    }

    fn name(&mut self) -> Result<String, ProtocolError> {
        let len_bytes = self.take(2)?;
        let len = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
        if len > MAX_NAME_LEN {
            return Err(ProtocolError::NameTooLong {
                len,
                max: MAX_NAME_LEN,
            });
        }
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| ProtocolError::InvalidUtf8)
    }
}

// ---------------------------------------------------------------------------
// Implementations
// ---------------------------------------------------------------------------

impl WireFormat for ClientMessage {
    fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let w = Writer::new(self.tag());
        let w = match self {
            Self::Join { name } => w.name(name)?,
            Self::Take { heap, count } => w.u8(*heap).u8(*count),
            Self::NewGame | Self::Quit => w,
        };
        Ok(w.finish())
    }

    fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut r = Reader::new(data)?;
        match r.u8()? {
            tag::JOIN => Ok(Self::Join { name: r.name()? }),
            tag::TAKE => Ok(Self::Take {
                heap: r.u8()?,
                count: r.u8()?,
            }),
            tag::NEW_GAME => Ok(Self::NewGame),
            tag::QUIT => Ok(Self::Quit),
            other => Err(ProtocolError::UnknownTag(other)),
        }
    }
}

impl WireFormat for ServerMessage {
    fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let w = Writer::new(self.tag());
        let w = match self {
            Self::Id { slot } | Self::Turn { slot } | Self::Win { slot } => {
                w.slot(*slot)
            }
            Self::Name { slot, name } => w.slot(*slot).name(name)?,
            Self::Score { slot, score } => w.slot(*slot).u8(*score),
            Self::Heap { heap, count } => w.u8(*heap).u8(*count),
            Self::Quit => w,
        };
        Ok(w.finish())
    }

    fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut r = Reader::new(data)?;
        match r.u8()? {
            tag::ID => Ok(Self::Id { slot: r.slot()? }),
            tag::NAME => Ok(Self::Name {
                slot: r.slot()?,
                name: r.name()?,
            }),
            tag::SCORE => Ok(Self::Score {
                slot: r.slot()?,
                score: r.u8()?,
            }),
            tag::HEAP => Ok(Self::Heap {
                heap: r.u8()?,
                count: r.u8()?,
            }),
            tag::TURN => Ok(Self::Turn { slot: r.slot()? }),
            tag::WIN => Ok(Self::Win { slot: r.slot()? }),
            tag::QUIT => Ok(Self::Quit),
            other => Err(ProtocolError::UnknownTag(other)),
        }
    }
}
