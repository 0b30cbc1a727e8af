//! Error types for the session layer.

use cardlink_catalog::CatalogError;
use cardlink_protocol::ProtocolError;
use cardlink_transport::{PeerId, PeerState};

use crate::SessionState;

/// Errors from inbound handling and session setup.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Inbound bytes don't decode to a valid transfer message (bad
    /// encoding, missing or extra keys, or a card id outside the catalog).
    /// The message is dropped; connection state is untouched.
    #[error("malformed message from {peer}: {source}")]
    MalformedMessage {
        /// Who sent it.
        peer: PeerId,
        /// Why it was rejected.
        #[source]
        source: ProtocolError,
    },

    /// The transport reported a state the session can't move to from
    /// where it is (e.g. `Connected` while `Idle`).
    #[error("invalid transition from {from} on peer state {to}")]
    InvalidTransition {
        /// The session state when the report arrived.
        from: SessionState,
        /// The reported peer state.
        to: PeerState,
    },

    /// A state report or data from a peer other than the one this
    /// session tracks. Sessions are single-peer.
    #[error("session tracks {expected}, ignoring {got}")]
    UnexpectedPeer {
        /// The tracked peer.
        expected: PeerId,
        /// The peer named in the report.
        got: PeerId,
    },

    /// Data arrived while the session isn't `Connected`. The card is
    /// dropped so a cleared hand stays cleared.
    #[error("data from {peer} while session is {state}")]
    NotConnected {
        /// Who sent it.
        peer: PeerId,
        /// The session state when it arrived.
        state: SessionState,
    },

    /// A catalog lookup failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The session configuration is unusable.
    #[error("invalid session config: {0}")]
    InvalidConfig(String),
}

/// Why a card could not be sent.
///
/// Reported synchronously to the caller of
/// [`send_card`](crate::PeerSessionManager::send_card) and to
/// [`on_card_send_failed`](crate::SessionObserver::on_card_send_failed).
/// Never retried by the session.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// The transport doesn't have exactly one connected peer. Sessions
    /// never guess a target among several peers.
    #[error("expected exactly one connected peer, found {count}")]
    NoPeer {
        /// How many peers the transport reported.
        count: usize,
    },

    /// The session is not in the `Connected` state.
    #[error("session is {0}, not connected")]
    NotConnected(SessionState),

    /// The message could not be encoded.
    #[error(transparent)]
    Encode(#[from] ProtocolError),

    /// The transport reported a send failure.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}
