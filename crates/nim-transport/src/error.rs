/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Binding the local socket failed.
    #[error("bind failed: {0}")]
    BindFailed(#[source] std::io::Error),

    /// Sending a datagram failed.
    #[error("send to {peer} failed: {source}")]
    SendFailed {
        peer: crate::PeerAddr,
        #[source]
        source: std::io::Error,
    },

    /// Receiving a datagram failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// The socket could not report its own address.
    #[error("local address unavailable: {0}")]
    LocalAddr(#[source] std::io::Error),

    /// A host/port pair did not resolve to any socket address.
    #[error("could not resolve address {0}")]
    Unresolved(String),
}
