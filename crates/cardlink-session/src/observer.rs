//! UI hook for session events.
//!
//! The session doesn't draw anything. It reports what happened through the
//! [`SessionObserver`] trait and leaves presentation (status text, card
//! animations, clearing the table) to the implementor.

use cardlink_catalog::Card;

use crate::{ConnectionEvent, SendError};

/// Receives session events for presentation.
///
/// Every method has an empty default, so an observer only implements what
/// it shows. Callbacks run on whichever task drove the session (the
/// transport event loop or the caller of `send_card`) and are made after
/// the session's lock is released, so they may call back into the
/// session.
///
/// # Example
///
/// ```rust
/// use cardlink_catalog::Card;
/// use cardlink_session::{ConnectionEvent, SessionObserver};
///
/// /// Prints status changes and arriving cards.
/// struct ConsoleUi;
///
/// impl SessionObserver for ConsoleUi {
///     fn on_connection_state_changed(&self, event: &ConnectionEvent) {
///         println!("{}: {}", event.peer(), event.state());
///     }
///
///     fn on_card_received(&self, card: &Card, is_front: bool) {
///         println!("got {card} ({})", if is_front { "face up" } else { "face down" });
///     }
/// }
/// ```
pub trait SessionObserver: Send + Sync + 'static {
    /// The connection status changed.
    fn on_connection_state_changed(&self, _event: &ConnectionEvent) {}

    /// A card arrived and was added to the hand.
    fn on_card_received(&self, _card: &Card, _is_front: bool) {}

    /// A card was delivered to the peer and left the hand.
    fn on_card_send_succeeded(&self, _card: &Card) {}

    /// A card could not be sent. It stays where it was.
    fn on_card_send_failed(&self, _card: &Card, _error: &SendError) {}

    /// The peer disconnected; every displayed card must go at once.
    fn on_peer_disconnected_clear_all(&self) {}
}

/// Ignores everything. Useful for tests and headless peers.
impl SessionObserver for () {}

impl<O: SessionObserver> SessionObserver for std::sync::Arc<O> {
    fn on_connection_state_changed(&self, event: &ConnectionEvent) {
        (**self).on_connection_state_changed(event);
    }

    fn on_card_received(&self, card: &Card, is_front: bool) {
        (**self).on_card_received(card, is_front);
    }

    fn on_card_send_succeeded(&self, card: &Card) {
        (**self).on_card_send_succeeded(card);
    }

    fn on_card_send_failed(&self, card: &Card, error: &SendError) {
        (**self).on_card_send_failed(card, error);
    }

    fn on_peer_disconnected_clear_all(&self) {
        (**self).on_peer_disconnected_clear_all();
    }
}
