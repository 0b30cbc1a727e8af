//! # Cardlink
//!
//! Pass playing cards between two devices over a single peer link.
//!
//! One device advertises, the other browses and connects. Once the link is
//! up either side can send a card from the 52-card catalog, face-up or
//! face-down; the other side adds it to its hand. When the peer goes away
//! every card on screen is cleared at once.
//!
//! The meta crate wires the layers together: a transport's event stream is
//! pumped into a [`PeerSessionManager`](cardlink_session::PeerSessionManager)
//! by [`CardLink::run`], and the UI talks to the session through a
//! [`SessionObserver`](cardlink_session::SessionObserver) and a
//! [`CardLinkHandle`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cardlink::prelude::*;
//!
//! # async fn demo() -> Result<(), CardlinkError> {
//! let link = CardLink::builder()
//!     .display_name("alice")
//!     .advertise("127.0.0.1:7070", ())
//!     .await?;
//! let handle = link.handle();
//! tokio::spawn(link.run());
//!
//! // Later, once the peer has connected:
//! handle.send_card(CardId(51), true).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod link;
mod logging;

pub use error::CardlinkError;
pub use link::{CardLink, CardLinkBuilder, CardLinkHandle};
pub use logging::init_logging;

pub use cardlink_catalog as catalog;
pub use cardlink_protocol as protocol;
pub use cardlink_session as session;
pub use cardlink_transport as transport;

/// Everything needed to drive a link from a UI.
pub mod prelude {
    pub use crate::{CardLink, CardLinkBuilder, CardLinkHandle, CardlinkError, init_logging};

    pub use cardlink_catalog::{Card, CardId, Catalog, CatalogError, Rank, Suit};
    pub use cardlink_protocol::{CardTransferMessage, JsonCodec, ProtocolError};
    pub use cardlink_session::{
        ConnectionEvent, Hand, HandCard, ReceivedCardEvent, SendError, SessionConfig,
        SessionError, SessionObserver, SessionState,
    };
    pub use cardlink_transport::{
        MemoryTransport, PeerId, PeerState, PeerTransport, SendMode, TransportError,
        TransportEvent, TransportEvents, WebSocketPeerTransport,
    };
}
