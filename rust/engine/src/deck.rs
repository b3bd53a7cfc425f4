use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

/// A shuffled 52-card deck. Cards are drawn from the top and never return
/// until [`Deck::shuffle`] refills it.
#[derive(Debug)]
pub struct Deck {
    cards: Vec<Card>,
    rng: ChaCha20Rng,
    seed: u64,
}

impl Deck {
    /// Shuffled deck seeded from the thread rng.
    pub fn new() -> Self {
        Self::new_with_seed(rand::random())
    }

    pub fn new_with_seed(seed: u64) -> Self {
        let mut deck = Self {
            cards: Vec::with_capacity(52),
            rng: ChaCha20Rng::seed_from_u64(seed),
            seed,
        };
        deck.shuffle();
        deck
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Refills all 52 cards and shuffles them with the deck's own rng stream.
    pub fn shuffle(&mut self) {
        self.cards = full_deck();
        self.cards.shuffle(&mut self.rng);
    }

    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::EmptyDeck)
    }

    pub fn draw_n(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        if n > self.cards.len() {
            return Err(GameError::EmptyDeck);
        }
        (0..n).map(|_| self.draw()).collect()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}
