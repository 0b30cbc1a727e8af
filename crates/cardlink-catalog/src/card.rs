//! Card identity types: suits, ranks, ids and the card value itself.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Asset name of the shared card back, shown for face-down cards.
pub const CARD_BACK_IMAGE: &str = "card_back";

// ---------------------------------------------------------------------------
// CardId
// ---------------------------------------------------------------------------

/// Index of a card in the catalog.
///
/// Serializes as a plain integer so it can sit directly in the transfer
/// message. Any `u32` can be decoded; only `0..52` resolves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Suit
// ---------------------------------------------------------------------------

/// One of the four suits, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    Spade,
    Club,
    Diamond,
    Heart,
}

impl Suit {
    /// All suits in the order the catalog lays them out.
    pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Club, Suit::Diamond, Suit::Heart];

    /// Lowercase name, used in asset names (`heart`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Spade => "spade",
            Self::Club => "club",
            Self::Diamond => "diamond",
            Self::Heart => "heart",
        }
    }

    /// Capitalized name, used in display names (`Heart`).
    pub fn title(self) -> &'static str {
        match self {
            Self::Spade => "Spade",
            Self::Club => "Club",
            Self::Diamond => "Diamond",
            Self::Heart => "Heart",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

// ---------------------------------------------------------------------------
// Rank
// ---------------------------------------------------------------------------

/// A card rank from 2 up to Ace (14).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(u8);

impl Rank {
    pub const JACK: Rank = Rank(11);
    pub const QUEEN: Rank = Rank(12);
    pub const KING: Rank = Rank(13);
    pub const ACE: Rank = Rank(14);

    /// Number of ranks per suit.
    pub const COUNT: usize = 13;

    const LOWEST: u8 = 2;
    const HIGHEST: u8 = 14;

    /// Returns the rank with this numeric value, if it is in `2..=14`.
    pub fn new(value: u8) -> Option<Rank> {
        (Self::LOWEST..=Self::HIGHEST)
            .contains(&value)
            .then_some(Rank(value))
    }

    /// All ranks from 2 to Ace.
    pub fn all() -> impl Iterator<Item = Rank> + Clone {
        (Self::LOWEST..=Self::HIGHEST).map(Rank)
    }

    /// The numeric value (2..=14).
    pub fn value(self) -> u8 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        usize::from(self.0 - Self::LOWEST)
    }
}

/// Prints `2`..`10`, then `Jack`, `Queen`, `King`, `Ace`.
impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::JACK => f.write_str("Jack"),
            Self::QUEEN => f.write_str("Queen"),
            Self::KING => f.write_str("King"),
            Self::ACE => f.write_str("Ace"),
            Rank(n) => write!(f, "{n}"),
        }
    }
}

// ---------------------------------------------------------------------------
// ImageRef
// ---------------------------------------------------------------------------

/// Opaque handle to a card face asset, e.g. `heart_14`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef(String);

impl ImageRef {
    fn for_card(suit: Suit, rank: Rank) -> Self {
        Self(format!("{}_{:02}", suit.name(), rank.value()))
    }

    /// The asset name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Card
// ---------------------------------------------------------------------------

/// A playing card. Immutable once the catalog has built it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Catalog index.
    pub id: CardId,
    pub suit: Suit,
    pub rank: Rank,
    /// Display name, e.g. `"Ace of Heart "`. The trailing space is part
    /// of the name peers show, so it is kept verbatim.
    pub name: String,
    /// Face asset.
    pub image_ref: ImageRef,
}

impl Card {
    pub(crate) fn new(id: CardId, suit: Suit, rank: Rank) -> Self {
        Self {
            id,
            suit,
            rank,
            name: format!("{rank} of {} ", suit.title()),
            image_ref: ImageRef::for_card(suit, rank),
        }
    }

    /// The asset to show for this card given its facing.
    pub fn face_image(&self, is_front: bool) -> &str {
        if is_front {
            self.image_ref.as_str()
        } else {
            CARD_BACK_IMAGE
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.trim_end())
    }
}
