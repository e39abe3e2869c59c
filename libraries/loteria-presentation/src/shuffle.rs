//! Randomization of the deck and soundtrack selection

use crate::types::{AudioTrack, Card};
use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle cards in place using Fisher-Yates
///
/// Each card has equal probability of appearing at any position.
pub fn shuffle_cards<R: Rng + ?Sized>(cards: &mut [Card], rng: &mut R) {
    cards.shuffle(rng);
}

/// Pick one track uniformly at random
pub fn choose_track<'a, R: Rng + ?Sized>(
    tracks: &'a [AudioTrack],
    rng: &mut R,
) -> Option<&'a AudioTrack> {
    tracks.choose(rng)
}
