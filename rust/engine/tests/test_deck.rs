use std::collections::HashSet;

use jetons_engine::cards::Card;
use jetons_engine::deck::Deck;
use jetons_engine::errors::GameError;

#[test]
fn fresh_deck_has_52_unique_cards() {
    let mut deck = Deck::new_with_seed(42);
    assert_eq!(deck.remaining(), 52);
    let mut seen = HashSet::new();
    for i in 0..52 {
        let c = deck.draw().expect("should have 52 cards");
        assert!(seen.insert(c), "card {} duplicated at position {}", c, i);
    }
    assert_eq!(deck.draw(), Err(GameError::EmptyDeck));
}

#[test]
fn same_seed_same_order() {
    let mut d1 = Deck::new_with_seed(12345);
    let mut d2 = Deck::new_with_seed(12345);
    let a: Vec<Card> = d1.draw_n(10).unwrap();
    let b: Vec<Card> = d2.draw_n(10).unwrap();
    assert_eq!(a, b, "same seed must yield identical order");
}

#[test]
fn different_seeds_differ() {
    let mut d1 = Deck::new_with_seed(1);
    let mut d2 = Deck::new_with_seed(2);
    assert_ne!(d1.draw_n(10).unwrap(), d2.draw_n(10).unwrap());
}

#[test]
fn deck_is_shuffled_at_construction() {
    let mut deck = Deck::new_with_seed(7);
    let drawn = deck.draw_n(52).unwrap();
    let mut sorted = drawn.clone();
    sorted.sort();
    assert_ne!(drawn, sorted);
}

#[test]
fn draw_n_beyond_remaining_fails_without_drawing() {
    let mut deck = Deck::new_with_seed(3);
    deck.draw_n(50).unwrap();
    assert_eq!(deck.draw_n(3), Err(GameError::EmptyDeck));
    assert_eq!(deck.remaining(), 2);
}

#[test]
fn shuffle_refills_the_deck() {
    let mut deck = Deck::new_with_seed(5);
    deck.draw_n(20).unwrap();
    deck.shuffle();
    assert_eq!(deck.remaining(), 52);
}
