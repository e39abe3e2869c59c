//! Deck sequencing
//!
//! Owns the shuffled order, the cursor and the cards already revealed.
//!
//! ```text
//! ShuffledOrder: [ C  A  D | B  E ]
//!                           ^ cursor = 3
//! ShownHistory:  [ C  A  D ]          len == cursor
//! ```

use crate::shuffle::shuffle_cards;
use crate::types::{Card, Deck};
use rand::Rng;

/// Outcome of asking the sequencer for the next card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reveal {
    /// The card to present next
    Revealed(Card),

    /// Every card of the current shuffle has been shown
    Exhausted,
}

/// Shuffled deck with a reveal cursor
#[derive(Debug, Clone, Default)]
pub struct DeckSequencer {
    /// Permutation of the deck
    order: Vec<Card>,

    /// Index of the next card to reveal
    cursor: usize,

    /// Revealed cards, oldest first
    shown: Vec<Card>,
}

impl DeckSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reshuffle the deck and rewind
    ///
    /// Does nothing when the deck is empty.
    pub fn prepare<R: Rng + ?Sized>(&mut self, deck: &Deck, rng: &mut R) {
        if deck.is_empty() {
            return;
        }

        let mut order = deck.cards().to_vec();
        shuffle_cards(&mut order, rng);

        self.order = order;
        self.cursor = 0;
        self.shown.clear();

        tracing::debug!(cards = self.order.len(), "Deck shuffled");
    }

    /// Drop the current shuffle entirely
    pub fn clear(&mut self) {
        self.order.clear();
        self.cursor = 0;
        self.shown.clear();
    }

    /// Reveal the card under the cursor
    pub fn next(&mut self) -> Reveal {
        let Some(card) = self.order.get(self.cursor).cloned() else {
            return Reveal::Exhausted;
        };

        self.shown.push(card.clone());
        self.cursor += 1;

        Reveal::Revealed(card)
    }

    /// Cards left in the current shuffle
    pub fn remaining_count(&self) -> usize {
        self.order.len().saturating_sub(self.cursor)
    }

    /// Cards revealed since the last prepare
    pub fn shown_count(&self) -> usize {
        self.shown.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Revealed cards, oldest first
    pub fn shown_history(&self) -> &[Card] {
        &self.shown
    }

    /// The current permutation
    pub fn order(&self) -> &[Card] {
        &self.order
    }

    /// True when no shuffle is loaded
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.order.len()
    }
}
