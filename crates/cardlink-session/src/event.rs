//! Events the session hands to the UI layer.

use cardlink_catalog::Card;
use cardlink_transport::PeerId;

use crate::SessionState;

/// A change in connection status, for the UI's status text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The handshake with `peer` started.
    Connecting(PeerId),
    /// Linked to `peer`; cards can be sent.
    Connected(PeerId),
    /// `peer` is gone. Every displayed card has been discarded.
    NotConnected(PeerId),
}

impl ConnectionEvent {
    pub(crate) fn entering(state: SessionState, peer: PeerId) -> Option<Self> {
        match state {
            SessionState::Connecting => Some(Self::Connecting(peer)),
            SessionState::Connected => Some(Self::Connected(peer)),
            SessionState::NotConnected => Some(Self::NotConnected(peer)),
            SessionState::Idle => None,
        }
    }

    /// The peer the event is about.
    pub fn peer(&self) -> &PeerId {
        match self {
            Self::Connecting(peer) | Self::Connected(peer) | Self::NotConnected(peer) => peer,
        }
    }

    /// The session state this event moved into.
    pub fn state(&self) -> SessionState {
        match self {
            Self::Connecting(_) => SessionState::Connecting,
            Self::Connected(_) => SessionState::Connected,
            Self::NotConnected(_) => SessionState::NotConnected,
        }
    }
}

/// A card that arrived from the peer, resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedCardEvent {
    /// Who sent it.
    pub from: PeerId,
    /// The catalog entry.
    pub card: Card,
    /// Whether to show it face-up.
    pub is_front: bool,
}
