//! The hand: cards currently shown on this device.
//!
//! Cards join the hand when they arrive from the peer, leave it when they
//! are sent away, and the whole hand is dropped at once when the peer
//! disconnects. The session keeps the hand behind the same lock as its
//! state machine, so a disconnect can never interleave with a half-applied
//! insert or remove.

use cardlink_catalog::CardId;

/// One displayed card and its facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandCard {
    pub card_id: CardId,
    pub is_front: bool,
}

/// An ordered collection of displayed cards, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<HandCard>,
}

impl Hand {
    /// Creates an empty hand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a card at the end and returns its index.
    pub fn insert(&mut self, card_id: CardId, is_front: bool) -> usize {
        self.cards.push(HandCard { card_id, is_front });
        self.cards.len() - 1
    }

    /// Removes the oldest copy of `card_id`, if present.
    pub fn remove(&mut self, card_id: CardId) -> Option<HandCard> {
        let index = self.position(card_id)?;
        Some(self.cards.remove(index))
    }

    /// Turns the oldest copy of `card_id` over. Returns its new facing.
    pub fn flip(&mut self, card_id: CardId) -> Option<bool> {
        let index = self.position(card_id)?;
        let card = &mut self.cards[index];
        card.is_front = !card.is_front;
        Some(card.is_front)
    }

    /// Discards every card. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.cards.len();
        self.cards.clear();
        dropped
    }

    /// The card at `index`.
    pub fn get(&self, index: usize) -> Option<&HandCard> {
        self.cards.get(index)
    }

    /// Whether `card_id` is in the hand.
    pub fn contains(&self, card_id: CardId) -> bool {
        self.position(card_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HandCard> {
        self.cards.iter()
    }

    fn position(&self, card_id: CardId) -> Option<usize> {
        self.cards.iter().position(|c| c.card_id == card_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_appends_and_returns_index() {
        let mut hand = Hand::new();
        assert_eq!(hand.insert(CardId(5), true), 0);
        assert_eq!(hand.insert(CardId(9), false), 1);
        assert_eq!(
            hand.get(1),
            Some(&HandCard { card_id: CardId(9), is_front: false })
        );
    }

    #[test]
    fn test_remove_takes_oldest_copy() {
        let mut hand = Hand::new();
        hand.insert(CardId(5), true);
        hand.insert(CardId(5), false);

        let removed = hand.remove(CardId(5)).unwrap();

        assert!(removed.is_front);
        assert_eq!(hand.len(), 1);
        assert!(hand.contains(CardId(5)));
    }

    #[test]
    fn test_remove_missing_returns_none() {
        let mut hand = Hand::new();
        assert!(hand.remove(CardId(1)).is_none());
    }

    #[test]
    fn test_flip_toggles_facing() {
        let mut hand = Hand::new();
        hand.insert(CardId(3), false);

        assert_eq!(hand.flip(CardId(3)), Some(true));
        assert_eq!(hand.flip(CardId(3)), Some(false));
        assert_eq!(hand.flip(CardId(4)), None);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut hand = Hand::new();
        hand.insert(CardId(1), true);
        hand.insert(CardId(2), true);

        assert_eq!(hand.clear(), 2);
        assert!(hand.is_empty());
        assert_eq!(hand.iter().count(), 0);
    }
}
