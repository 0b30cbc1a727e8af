//! The peer session manager: one session, one peer, one card at a time.
//!
//! This is the central piece of the session layer. It's responsible for:
//! - Following the transport's peer state reports through the
//!   [`SessionState`] machine
//! - Refusing sends unless exactly one peer is connected
//! - Encoding outgoing cards and decoding incoming ones
//! - Keeping the hand in step (cards in on receive, out on send, all gone
//!   on disconnect)
//! - Telling the [`SessionObserver`] about each of these
//!
//! # Concurrency note
//!
//! The transport reports state changes from its own task while the UI
//! sends from another, so state, tracked peer and hand live behind one
//! async mutex. `send_card` keeps the lock for the whole transport send:
//! there is never more than one send in flight, and a disconnect reported
//! mid-send is applied right after the send completes. Observer callbacks
//! run after the lock is released.

use cardlink_catalog::{Card, CardId, Catalog};
use cardlink_protocol::{CardTransferMessage, Codec};
use cardlink_transport::{PeerId, PeerState, PeerTransport, SendMode};
use tokio::sync::Mutex;

use crate::{
    ConnectionEvent, Hand, ReceivedCardEvent, SendError, SessionError,
    SessionObserver, SessionState,
};

/// Mutable session state. Only touched with the manager's lock held.
#[derive(Debug, Default)]
struct SessionCore {
    state: SessionState,
    /// The peer the current (or last) cycle is about.
    peer: Option<PeerId>,
    hand: Hand,
}

/// Owns the link to one remote peer and the card exchange over it.
///
/// Generic over the transport `T`, the wire codec `C` and the UI observer
/// `O`, so tests can swap in an in-memory transport and a recording
/// observer.
///
/// ## Lifecycle
///
/// ```text
/// on_peer_state_changed(Connecting) ──→ on_peer_state_changed(Connected)
///                                                 │
///                       send_card() / on_data_received()  (repeatable)
///                                                 │
///                                                 ▼
///                        on_peer_state_changed(NotConnected) ──→ hand cleared
/// ```
pub struct PeerSessionManager<T, C, O> {
    transport: T,
    codec: C,
    observer: O,
    catalog: &'static Catalog,
    core: Mutex<SessionCore>,
}

impl<T, C, O> PeerSessionManager<T, C, O>
where
    T: PeerTransport,
    C: Codec,
    O: SessionObserver,
{
    /// Creates an `Idle` session over `transport`.
    pub fn new(transport: T, codec: C, observer: O) -> Self {
        Self {
            transport,
            codec,
            observer,
            catalog: Catalog::standard(),
            core: Mutex::new(SessionCore::default()),
        }
    }

    // =====================================================================
    // Transport callbacks
    // =====================================================================

    /// Applies a peer state report from the transport.
    ///
    /// Returns the event to show, or `None` if the report repeats the
    /// current state. Entering `NotConnected` discards the whole hand and
    /// calls [`SessionObserver::on_peer_disconnected_clear_all`].
    ///
    /// # Errors
    /// - [`SessionError::UnexpectedPeer`] — the session is tracking a
    ///   different peer
    /// - [`SessionError::InvalidTransition`] — the lifecycle doesn't allow
    ///   this move
    ///
    /// State is unchanged on error.
    pub async fn on_peer_state_changed(
        &self,
        peer: PeerId,
        reported: PeerState,
    ) -> Result<Option<ConnectionEvent>, SessionError> {
        let (event, cleared) = {
            let mut core = self.core.lock().await;

            if core.state.has_peer() {
                if let Some(tracked) = core.peer.as_ref().filter(|t| **t != peer) {
                    return Err(SessionError::UnexpectedPeer {
                        expected: tracked.clone(),
                        got: peer,
                    });
                }
            }

            let previous = core.state;
            let Some(next) = previous.on_peer_state(reported)? else {
                tracing::debug!(%peer, state = %previous, "repeated peer state ignored");
                return Ok(None);
            };

            core.state = next;
            core.peer = Some(peer.clone());
            let cleared = (next == SessionState::NotConnected)
                .then(|| core.hand.clear());

            tracing::info!(%peer, from = %previous, to = %next, "session state changed");
            (ConnectionEvent::entering(next, peer), cleared)
        };

        let Some(event) = event else {
            return Ok(None);
        };
        self.observer.on_connection_state_changed(&event);
        if let Some(dropped) = cleared {
            tracing::info!(peer = %event.peer(), dropped, "peer gone, hand cleared");
            self.observer.on_peer_disconnected_clear_all();
        }
        Ok(Some(event))
    }

    /// Decodes bytes received from `from` and adds the card to the hand.
    ///
    /// # Errors
    /// - [`SessionError::MalformedMessage`] if the bytes are not a valid
    ///   transfer message
    /// - [`SessionError::NotConnected`] if the session isn't `Connected`
    /// - [`SessionError::UnexpectedPeer`] if `from` isn't the tracked peer
    ///
    /// In every case the message is dropped and the connection state is
    /// left alone.
    pub async fn on_data_received(
        &self,
        from: &PeerId,
        bytes: &[u8],
    ) -> Result<ReceivedCardEvent, SessionError> {
        let msg = CardTransferMessage::decode(&self.codec, bytes).map_err(|source| {
            SessionError::MalformedMessage {
                peer: from.clone(),
                source,
            }
        })?;
        let card = self.catalog.lookup(msg.card_id)?;

        {
            let mut core = self.core.lock().await;
            if core.state != SessionState::Connected {
                return Err(SessionError::NotConnected {
                    peer: from.clone(),
                    state: core.state,
                });
            }
            if let Some(tracked) = core.peer.as_ref().filter(|t| *t != from) {
                return Err(SessionError::UnexpectedPeer {
                    expected: tracked.clone(),
                    got: from.clone(),
                });
            }
            core.hand.insert(card.id, msg.is_front);
        }

        tracing::info!(peer = %from, card = %card, is_front = msg.is_front, "card received");
        self.observer.on_card_received(card, msg.is_front);

        Ok(ReceivedCardEvent {
            from: from.clone(),
            card: card.clone(),
            is_front: msg.is_front,
        })
    }

    // =====================================================================
    // Commands
    // =====================================================================

    /// Sends `card` to the connected peer, face-up if `is_front`.
    ///
    /// The card leaves the hand once the transport accepts it. Either way
    /// the observer hears about the outcome.
    ///
    /// # Errors
    /// - [`SendError::NoPeer`] — the transport has zero or several peers
    /// - [`SendError::NotConnected`] — the session isn't `Connected`
    /// - [`SendError::Encode`] — the card id is not a catalog key
    /// - [`SendError::Transport`] — the channel failed; not retried
    pub async fn send_card(
        &self,
        card: &Card,
        is_front: bool,
    ) -> Result<(), SendError> {
        let result = self.try_send(card, is_front).await;
        match &result {
            Ok(()) => self.observer.on_card_send_succeeded(card),
            Err(e) => {
                tracing::warn!(card_id = %card.id, error = %e, "card send failed");
                self.observer.on_card_send_failed(card, e);
            }
        }
        result
    }

    async fn try_send(&self, card: &Card, is_front: bool) -> Result<(), SendError> {
        let mut core = self.core.lock().await;

        let peers = self.transport.connected_peers().await;
        let [target] = peers.as_slice() else {
            return Err(SendError::NoPeer { count: peers.len() });
        };
        if core.state != SessionState::Connected {
            return Err(SendError::NotConnected(core.state));
        }

        let bytes = CardTransferMessage::new(card.id, is_front).encode(&self.codec)?;
        self.transport
            .send(target, &bytes, SendMode::Reliable)
            .await
            .map_err(|e| SendError::Transport(Box::new(e)))?;

        core.hand.remove(card.id);
        tracing::debug!(card_id = %card.id, is_front, peer = %target, "card sent");
        Ok(())
    }

    /// Turns a card in the hand over. Returns its new facing, or `None`
    /// if the card isn't in the hand.
    pub async fn flip(&self, card_id: CardId) -> Option<bool> {
        self.core.lock().await.hand.flip(card_id)
    }

    // =====================================================================
    // Accessors
    // =====================================================================

    /// The current session state.
    pub async fn state(&self) -> SessionState {
        self.core.lock().await.state
    }

    /// The tracked peer while `Connecting` or `Connected`.
    pub async fn peer(&self) -> Option<PeerId> {
        let core = self.core.lock().await;
        core.peer.clone().filter(|_| core.state.has_peer())
    }

    /// A snapshot of the hand.
    pub async fn hand(&self) -> Hand {
        self.core.lock().await.hand.clone()
    }

    /// The card catalog used to resolve ids.
    pub fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The observer receiving session events.
    pub fn observer(&self) -> &O {
        &self.observer
    }
}

// =========================================================================
// Tests
// =========================================================================
