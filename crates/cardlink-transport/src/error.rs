use crate::PeerId;

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The link to the peer is closed (or was never opened).
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// The named peer is not connected on this transport.
    #[error("peer {0} is not connected")]
    UnknownPeer(PeerId),

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding, accepting or dialing failed.
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] std::io::Error),

    /// The hello exchange did not complete.
    #[error("handshake failed: {0}")]
    HandshakeFailed(String),
}
