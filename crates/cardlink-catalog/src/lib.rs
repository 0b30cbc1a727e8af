//! The card catalog for Cardlink.
//!
//! A fixed, immutable table of the 52 standard playing cards, built once
//! and indexed by [`CardId`]. Ids are assigned suit-major, rank-minor:
//!
//! ```text
//!  0..=12   spade   2..Ace
//! 13..=25   club    2..Ace
//! 26..=38   diamond 2..Ace
//! 39..=51   heart   2..Ace
//! ```
//!
//! The catalog knows nothing about images beyond an opaque
//! [`ImageRef`] name; resolving it to pixels is the UI's business.

mod card;
mod error;

pub use card::{CARD_BACK_IMAGE, Card, CardId, ImageRef, Rank, Suit};
pub use error::CatalogError;

use std::sync::OnceLock;

/// Number of cards in the catalog.
pub const DECK_SIZE: usize = Suit::ALL.len() * Rank::COUNT;

/// The full, ordered set of cards.
///
/// Cheap to share: it is read-only after construction, so any number of
/// threads can look cards up through a `&Catalog` at once.
#[derive(Debug, Clone)]
pub struct Catalog {
    cards: Vec<Card>,
}

impl Catalog {
    /// Builds the catalog: every suit in [`Suit::ALL`] order, ranks 2
    /// through Ace within each suit, ids counting up from 0.
    pub fn build() -> Self {
        let cards = Suit::ALL
            .iter()
            .flat_map(|&suit| Rank::all().map(move |rank| (suit, rank)))
            .enumerate()
            .map(|(index, (suit, rank))| Card::new(CardId(index as u32), suit, rank))
            .collect();
        Self { cards }
    }

    /// The process-wide catalog, built on first use.
    pub fn standard() -> &'static Catalog {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(Catalog::build)
    }

    /// Looks a card up by id.
    ///
    /// # Errors
    /// Returns [`CatalogError::NotFound`] if `id` is outside `[0, 52)`.
    pub fn lookup(&self, id: CardId) -> Result<&Card, CatalogError> {
        usize::try_from(id.0)
            .ok()
            .and_then(|index| self.cards.get(index))
            .ok_or(CatalogError::NotFound(id))
    }

    /// Finds the card with the given suit and rank.
    pub fn find(&self, suit: Suit, rank: Rank) -> &Card {
        // Both indices are in range by construction of `Suit` and `Rank`.
        &self.cards[suit.index() * Rank::COUNT + rank.index()]
    }

    /// Iterates over all cards in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Number of cards (always [`DECK_SIZE`]).
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::build()
    }
}
