//! Unified error type for Cardlink.

use cardlink_catalog::CatalogError;
use cardlink_session::{SendError, SessionError};
use cardlink_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// Through the `cardlink` meta crate callers deal with this one type; the
/// `#[from]` conversions let `?` lift sub-crate errors automatically.
/// Encoding and decoding failures arrive wrapped in [`SendError`] or
/// [`SessionError`], which say which side of the link they happened on.
#[derive(Debug, thiserror::Error)]
pub enum CardlinkError {
    /// Opening, using or closing the peer link failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Inbound handling or session setup failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A card could not be sent.
    #[error(transparent)]
    Send(#[from] SendError),

    /// A card id is not in the catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
