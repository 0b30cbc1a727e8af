//! Error types for the protocol layer.
//!
//! When you see a `ProtocolError`, the problem is in turning a transfer
//! message into bytes or back, not in the link or the session.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: not JSON, a missing or unknown key, or a
    /// value of the wrong type.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The bytes decoded but the message breaks a protocol rule, such as
    /// a card id outside the catalog.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
