//! `CardLink` builder and event loop.
//!
//! This is the entry point for running one side of a card link. It ties
//! together all the layers: transport → protocol → session → UI observer.

use std::sync::Arc;

use cardlink_catalog::CardId;
use cardlink_protocol::JsonCodec;
use cardlink_session::{Hand, PeerSessionManager, SessionConfig, SessionObserver, SessionState};
use cardlink_transport::{
    PeerId, PeerTransport, TransportEvent, TransportEvents, WebSocketPeerTransport,
};

use crate::CardlinkError;

type Manager<T, O> = PeerSessionManager<T, JsonCodec, O>;

/// Builder for configuring and opening a card link.
///
/// # Example
///
/// ```rust,ignore
/// use cardlink::prelude::*;
///
/// let link = CardLink::builder()
///     .display_name("bob")
///     .browse("127.0.0.1:7070", my_ui)
///     .await?;
/// let handle = link.handle();
/// tokio::spawn(link.run());
/// ```
pub struct CardLinkBuilder {
    config: SessionConfig,
}

impl CardLinkBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
        }
    }

    /// Sets the name shown to the other device.
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.config.display_name = name.into();
        self
    }

    /// Sets the discovery service type. Both devices must agree on it.
    pub fn service_type(mut self, service_type: impl Into<String>) -> Self {
        self.config.service_type = service_type.into();
        self
    }

    /// Replaces the whole session configuration.
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Listens on `addr` and waits for a peer to browse in.
    pub async fn advertise<O: SessionObserver>(
        self,
        addr: &str,
        observer: O,
    ) -> Result<CardLink<WebSocketPeerTransport, O>, CardlinkError> {
        self.config.validate()?;
        let local = PeerId::generate(&self.config.display_name);
        let (transport, events) =
            WebSocketPeerTransport::advertise(addr, local, &self.config.service_type).await?;
        Ok(CardLink::new(transport, events, observer))
    }

    /// Connects to a device advertising on `addr`.
    pub async fn browse<O: SessionObserver>(
        self,
        addr: &str,
        observer: O,
    ) -> Result<CardLink<WebSocketPeerTransport, O>, CardlinkError> {
        self.config.validate()?;
        let local = PeerId::generate(&self.config.display_name);
        let (transport, events) =
            WebSocketPeerTransport::browse(addr, local, &self.config.service_type).await?;
        Ok(CardLink::new(transport, events, observer))
    }

    /// Uses an already-open transport and its event stream.
    pub fn with_transport<T: PeerTransport, O: SessionObserver>(
        self,
        transport: T,
        events: TransportEvents,
        observer: O,
    ) -> Result<CardLink<T, O>, CardlinkError> {
        self.config.validate()?;
        Ok(CardLink::new(transport, events, observer))
    }
}

impl Default for CardLinkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One side of a card link.
///
/// Call [`run()`](Self::run) to start pumping transport events into the
/// session. Take a [`handle()`](Self::handle) first if you need to send.
pub struct CardLink<T, O> {
    manager: Arc<Manager<T, O>>,
    events: TransportEvents,
}

impl CardLink<(), ()> {
    /// Creates a new builder.
    pub fn builder() -> CardLinkBuilder {
        CardLinkBuilder::new()
    }
}

impl<T, O> CardLink<T, O>
where
    T: PeerTransport,
    O: SessionObserver,
{
    fn new(transport: T, events: TransportEvents, observer: O) -> Self {
        Self {
            manager: Arc::new(PeerSessionManager::new(transport, JsonCodec, observer)),
            events,
        }
    }

    /// A cloneable handle for sending cards and reading session state.
    pub fn handle(&self) -> CardLinkHandle<T, O> {
        CardLinkHandle {
            manager: Arc::clone(&self.manager),
        }
    }

    /// Runs the event loop until the transport's event stream closes.
    ///
    /// Malformed messages and rejected state reports are logged and
    /// dropped; they never stop the loop.
    pub async fn run(mut self) {
        tracing::info!(local = %self.manager.transport().local_peer(), "card link running");

        while let Some(event) = self.events.recv().await {
            dispatch(&self.manager, event).await;
        }

        tracing::info!("transport event stream closed");
    }
}

async fn dispatch<T, O>(manager: &Manager<T, O>, event: TransportEvent)
where
    T: PeerTransport,
    O: SessionObserver,
{
    match event {
        TransportEvent::PeerStateChanged { peer, state } => {
            if let Err(e) = manager.on_peer_state_changed(peer, state).await {
                tracing::warn!(error = %e, "peer state report rejected");
            }
        }
        TransportEvent::DataReceived { peer, data } => {
            if let Err(e) = manager.on_data_received(&peer, &data).await {
                tracing::warn!(%peer, bytes = data.len(), error = %e, "dropping inbound message");
            }
        }
    }
}

/// Sends cards and reads session state while [`CardLink::run`] drives the
/// link on another task.
pub struct CardLinkHandle<T, O> {
    manager: Arc<Manager<T, O>>,
}

impl<T, O> Clone for CardLinkHandle<T, O> {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
        }
    }
}

impl<T, O> CardLinkHandle<T, O>
where
    T: PeerTransport,
    O: SessionObserver,
{
    /// Sends the catalog card `card_id`, face-up if `is_front`.
    pub async fn send_card(&self, card_id: CardId, is_front: bool) -> Result<(), CardlinkError> {
        let card = self.manager.catalog().lookup(card_id)?;
        self.manager.send_card(card, is_front).await?;
        Ok(())
    }

    /// Turns a card in the hand over. Returns its new facing.
    pub async fn flip(&self, card_id: CardId) -> Option<bool> {
        self.manager.flip(card_id).await
    }

    pub async fn state(&self) -> SessionState {
        self.manager.state().await
    }

    pub async fn peer(&self) -> Option<PeerId> {
        self.manager.peer().await
    }

    pub async fn hand(&self) -> Hand {
        self.manager.hand().await
    }

    /// The transport, e.g. to disconnect it.
    pub fn transport(&self) -> &T {
        self.manager.transport()
    }

    pub fn observer(&self) -> &O {
        self.manager.observer()
    }
}
