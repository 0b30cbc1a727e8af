//! Peer session management for Cardlink.
//!
//! This crate owns everything that happens between "a transport reported
//! something" and "the UI should show something":
//!
//! 1. **Connection state** — a single-peer state machine driven by the
//!    transport's callbacks ([`SessionState`])
//! 2. **Card exchange** — sending a card and decoding a received one
//!    ([`PeerSessionManager`])
//! 3. **The hand** — the cards currently shown on this device ([`Hand`]),
//!    cleared in one step when the peer goes away
//! 4. **UI notifications** — the [`SessionObserver`] callbacks
//!
//! # How it fits in the stack
//!
//! ```text
//! UI (above)  ← SessionObserver callbacks, send_card commands
//!     ↕
//! Session Layer (this crate)  ← state machine, hand, catalog lookups
//!     ↕
//! Protocol + Transport (below)  ← CardTransferMessage, PeerTransport
//! ```

mod config;
mod error;
mod event;
mod hand;
mod manager;
mod observer;
mod state;

pub use config::SessionConfig;
pub use error::{SendError, SessionError};
pub use event::{ConnectionEvent, ReceivedCardEvent};
pub use hand::{Hand, HandCard};
pub use manager::PeerSessionManager;
pub use observer::SessionObserver;
pub use state::SessionState;
