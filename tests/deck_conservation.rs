use blackjack_table::cards::Card;
use blackjack_table::deck::{Deck, DeckConfig, DeckError, CARDS_PER_DECK};
use blackjack_table::hand::Hand;
use proptest::prelude::*;
use std::collections::HashSet;

fn assert_conserved(deck: &Deck) {
    assert_eq!(deck.len() + deck.discards().len() + deck.in_play(), deck.total());
}

proptest! {
    #[test]
    fn fresh_shoe_is_a_permutation(seed in any::<u64>(), decks in 1usize..4) {
        let deck = Deck::new(&DeckConfig::default().with_decks(decks).with_seed(seed));
        prop_assert_eq!(deck.len(), decks * CARDS_PER_DECK);
        let distinct: HashSet<Card> = deck.shoe().iter().copied().collect();
        prop_assert_eq!(distinct.len(), CARDS_PER_DECK);
    }

    #[test]
    fn dealing_and_discarding_conserves_cards(seed in any::<u64>(), rounds in 1usize..30) {
        let mut deck = Deck::new(&DeckConfig::default().with_seed(seed));
        for _ in 0..rounds {
            deck.shuffle_if_needed();
            let mut hands = Vec::new();
            for _ in 0..3 {
                let mut hand = Hand::deal(&mut deck).unwrap();
                if hand.value() < 15 {
                    hand.hit(&mut deck).unwrap();
                }
                hands.push(hand);
            }
            prop_assert!(deck.in_play() >= 6);
            assert_conserved(&deck);
            for hand in hands {
                deck.discard_hand(hand).unwrap();
            }
            prop_assert_eq!(deck.in_play(), 0);
            assert_conserved(&deck);
        }
    }

    #[test]
    fn same_seed_same_order(seed in any::<u64>()) {
        let a = Deck::new(&DeckConfig::default().with_seed(seed));
        let b = Deck::new(&DeckConfig::default().with_seed(seed));
        prop_assert_eq!(a.shoe(), b.shoe());
    }
}

#[test]
fn exhausted_shoe_reports_empty() {
    let mut deck = Deck::stacked(blackjack_table::cards::parse_cards("Ah Kd").unwrap());
    let hand = Hand::deal(&mut deck).unwrap();
    assert_eq!(deck.deal_card(), Err(DeckError::Empty));
    deck.discard_hand(hand).unwrap();
    // the discards come back on the next deal
    assert!(deck.deal_card().is_ok());
    assert_conserved(&deck);
}
