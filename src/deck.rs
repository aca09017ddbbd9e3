use crate::card::{Card, NUM_CARDS_DECK};
use rand::{seq::SliceRandom, thread_rng, Rng};

/// The 52 cards in index order: clubs, diamonds, spades, hearts, ace to king.
pub fn standard_set() -> Vec<Card> {
    (0..NUM_CARDS_DECK as u8).map(Card::from_index).collect()
}

/// A fresh uniformly random permutation of the deck.
pub fn shuffled() -> Vec<Card> {
    shuffled_with(&mut thread_rng())
}

pub fn shuffled_with<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut cards = standard_set();
    cards.shuffle(rng);
    cards
}
