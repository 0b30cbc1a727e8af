//! Peer transport layer for Cardlink.
//!
//! Provides the [`PeerTransport`] trait: the narrow contract the session
//! layer needs from a point-to-point link to one other device. A transport
//! can send an opaque byte buffer to a named peer, report which peers are
//! connected, and push [`TransportEvent`]s (peer state changes and inbound
//! bytes) into a [`TransportEvents`] stream.
//!
//! # Implementations
//!
//! - [`MemoryTransport`] — two linked in-process endpoints, used by tests
//!   and single-process demos.
//! - `WebSocketPeerTransport` — one device advertises, the other browses
//!   and dials it (feature `websocket`, default).

#![allow(async_fn_in_trait)]

mod error;
mod memory;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
pub use memory::MemoryTransport;
#[cfg(feature = "websocket")]
pub use websocket::WebSocketPeerTransport;

use std::fmt;
use std::future::Future;

use rand::Rng;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// PeerId
// ---------------------------------------------------------------------------

/// Identity of a device taking part in a session.
///
/// A peer id is the device's display name followed by a short random
/// suffix (`Alice#3fa2`), so two devices sharing a name stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerId(String);

impl PeerId {
    /// Wraps an already-formed peer id (e.g. one received in a hello).
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Creates a fresh peer id for the given display name.
    pub fn generate(display_name: &str) -> Self {
        let suffix: u16 = rand::rng().random();
        Self(format!("{display_name}#{suffix:04x}"))
    }

    /// The human-readable part of the id, without the random suffix.
    pub fn display_name(&self) -> &str {
        self.0
            .rsplit_once('#')
            .map_or(self.0.as_str(), |(name, _)| name)
    }

    /// The full id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Peer state and delivery mode
// ---------------------------------------------------------------------------

/// Connection state of a remote peer, as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    /// The link is being established.
    Connecting,
    /// The link is up; data can flow.
    Connected,
    /// The link is down (handshake failed or the peer went away).
    NotConnected,
}

impl fmt::Display for PeerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::NotConnected => "not connected",
        };
        f.write_str(s)
    }
}

/// Delivery guarantee requested for a send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendMode {
    /// Delivered exactly once and in order, or the send fails.
    #[default]
    Reliable,
    /// May be dropped. Transports without an unreliable channel deliver
    /// these reliably.
    Unreliable,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Something the transport observed about its link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A peer moved to a new connection state.
    PeerStateChanged {
        /// The peer whose state changed.
        peer: PeerId,
        /// Its new state.
        state: PeerState,
    },
    /// A peer sent us a byte buffer.
    DataReceived {
        /// The sender.
        peer: PeerId,
        /// The raw payload.
        data: Vec<u8>,
    },
}

/// Inbound stream of [`TransportEvent`]s for one transport.
///
/// Events are delivered in the order the transport observed them.
#[derive(Debug)]
pub struct TransportEvents {
    rx: mpsc::UnboundedReceiver<TransportEvent>,
}

impl TransportEvents {
    /// Creates a linked sender/stream pair.
    ///
    /// Transport implementations keep the sender and hand the stream to
    /// whoever drives the session.
    pub fn channel() -> (mpsc::UnboundedSender<TransportEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }

    /// Waits for the next event. Returns `None` once the transport is gone.
    pub async fn recv(&mut self) -> Option<TransportEvent> {
        self.rx.recv().await
    }

    /// Returns the next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<TransportEvent> {
        self.rx.try_recv().ok()
    }
}

// ---------------------------------------------------------------------------
// PeerTransport
// ---------------------------------------------------------------------------

/// A point-to-point link to remote peers.
///
/// The futures are `Send` so a session driven by any transport can run on
/// a spawned Tokio task.
pub trait PeerTransport: Send + Sync + 'static {
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends `data` to `peer` with the given delivery mode.
    fn send(
        &self,
        peer: &PeerId,
        data: &[u8],
        mode: SendMode,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Returns the peers currently connected on this transport.
    fn connected_peers(&self) -> impl Future<Output = Vec<PeerId>> + Send;

    /// Returns this device's own peer id.
    fn local_peer(&self) -> &PeerId;
}
