//! Wire protocol for Cardlink.
//!
//! This crate defines the one message two peers exchange:
//!
//! - **Message** ([`CardTransferMessage`]) — which card moved and whether
//!   it should land face-up.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how messages become
//!   bytes and back.
//! - **Errors** ([`ProtocolError`]) — what can go wrong on the way.
//!
//! # Architecture
//!
//! The protocol layer sits between the transport (raw bytes) and the
//! session (card events). It doesn't know about peers or connection
//! state.
//!
//! ```text
//! Transport (bytes) → Protocol (CardTransferMessage) → Session (Card + facing)
//! ```

mod codec;
mod error;
mod message;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use message::CardTransferMessage;
