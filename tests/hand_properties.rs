use blackjack_table::cards::{Card, Rank, Suit};
use blackjack_table::game::dealer_must_hit;
use blackjack_table::hand::Hand;
use proptest::prelude::*;

fn any_card() -> impl Strategy<Value = Card> {
    (0u8..13, 0u8..4).prop_map(|(r, s)| Card::from_indices(r, s).unwrap())
}

fn hard_sum(cards: &[Card]) -> u32 {
    cards.iter().map(|c| u32::from(c.value().low())).sum()
}

proptest! {
    #[test]
    fn value_is_best_total_not_over_twenty_one(cards in prop::collection::vec(any_card(), 1..10)) {
        let low = hard_sum(&cards);
        let has_ace = cards.iter().any(|c| c.is_ace());
        let hand = Hand::from_cards(cards);
        let expected = if has_ace && low + 10 <= 21 { low + 10 } else { low };
        prop_assert_eq!(u32::from(hand.value()), expected);
        prop_assert_eq!(hand.is_soft(), has_ace && low + 10 <= 21);
        prop_assert_eq!(hand.is_bust(), expected > 21);
    }

    #[test]
    fn adding_a_card_never_lowers_the_hard_total(
        cards in prop::collection::vec(any_card(), 1..8),
        extra in any_card(),
    ) {
        let before = hard_sum(&cards);
        let mut more = cards.clone();
        more.push(extra);
        prop_assert!(hard_sum(&more) > before);
        // a bust hand is bust for good
        if Hand::from_cards(cards).is_bust() {
            prop_assert!(Hand::from_cards(more).is_bust());
        }
    }

    #[test]
    fn dealer_never_stands_below_seventeen(cards in prop::collection::vec(any_card(), 2..6)) {
        let hand = Hand::from_cards(cards);
        if hand.value() < 17 {
            prop_assert!(dealer_must_hit(&hand, false));
            prop_assert!(dealer_must_hit(&hand, true));
        }
        if hand.value() > 17 {
            prop_assert!(!dealer_must_hit(&hand, true));
        }
    }

    #[test]
    fn card_text_parses_back(card in any_card()) {
        let parsed: Card = card.to_string().parse().unwrap();
        prop_assert_eq!(parsed, card);
    }
}

#[test]
fn face_cards_count_ten() {
    for rank in [Rank::Ten, Rank::Jack, Rank::Queen, Rank::King] {
        let cards = vec![Card::new(rank, Suit::Spades), Card::new(Rank::Ace, Suit::Hearts)];
        let hand = Hand::from_cards(cards);
        assert!(hand.is_blackjack());
    }
}
