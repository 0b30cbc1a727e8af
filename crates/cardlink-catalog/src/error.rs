//! Error types for the catalog.

use crate::CardId;

/// Errors that can occur when reading the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// No card has this id. With a conforming peer this never happens:
    /// inbound ids are range-checked before lookup.
    #[error("no card with id {0}")]
    NotFound(CardId),
}
