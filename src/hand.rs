use crate::cards::{parse_cards, Card, CardValue};
use crate::deck::{Deck, DeckError};
use std::fmt;
use std::str::FromStr;

/// Highest total that does not bust.
pub const BLACKJACK: u8 = 21;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandError {
    #[error("card parse error: {0}")]
    CardParse(String),
    #[error("a hand needs at least one card")]
    Empty,
}

/// Cards dealt to one participant for one round.
///
/// Hands only grow. A hand dealt from a [`Deck`] owns cards the deck counts as
/// in play, so it is deliberately not `Clone`; give it back with
/// [`Deck::discard_hand`] when the round is over.
///
/// ```
/// use blackjack_table::hand::Hand;
///
/// let hand: Hand = "Ah Ac 9d".parse().unwrap();
/// assert_eq!(hand.value(), 21);
/// assert!(hand.is_soft());
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    /// Deal a fresh two-card hand.
    pub fn deal(deck: &mut Deck) -> Result<Self, DeckError> {
        let first = deck.deal_card()?;
        let second = match deck.deal_card() {
            Ok(c) => c,
            Err(e) => {
                // keep the deck's in-play count honest before bailing out
                deck.discard_hand(Hand { cards: vec![first] })?;
                return Err(e);
            }
        };
        Ok(Self { cards: vec![first, second] })
    }

    /// A hand that did not come from a deck, for evaluation only.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Deal one more card onto the hand and return it.
    pub fn hit(&mut self, deck: &mut Deck) -> Result<Card, DeckError> {
        let card = deck.deal_card()?;
        self.cards.push(card);
        Ok(card)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub(crate) fn into_cards(self) -> Vec<Card> {
        self.cards
    }

    /// The card the dealer shows face up.
    pub fn dealer_up_card(&self) -> Option<Card> {
        self.cards.first().copied()
    }

    pub fn contains_ace(&self) -> bool {
        self.cards.iter().any(|c| c.is_ace())
    }

    /// Best total: every Ace starts at 11 and drops to 1, one at a time, while the hand is over 21.
    pub fn value(&self) -> u8 {
        self.score().0
    }

    /// Whether an Ace is still counted as 11 in [`Hand::value`].
    pub fn is_soft(&self) -> bool {
        self.score().1
    }

    pub fn is_bust(&self) -> bool {
        self.value() > BLACKJACK
    }

    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.value() == BLACKJACK
    }

    fn score(&self) -> (u8, bool) {
        let mut total: u32 = 0;
        let mut soft_aces = 0u32;
        for card in &self.cards {
            match card.value() {
                CardValue::Single(v) => total += v as u32,
                CardValue::Dual(_, hi) => {
                    total += hi as u32;
                    soft_aces += 1;
                }
            }
        }
        while total > BLACKJACK as u32 && soft_aces > 0 {
            total -= 10;
            soft_aces -= 1;
        }
        (total.min(u8::MAX as u32) as u8, soft_aces > 0)
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Cards: ")?;
        for (i, c) in self.cards.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, "; Value: {}", self.value())
    }
}

impl FromStr for Hand {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        if cards.is_empty() {
            return Err(HandError::Empty);
        }
        Ok(Hand::from_cards(cards))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(s: &str) -> Hand {
        s.parse().unwrap()
    }

    #[test]
    fn two_aces_and_nine_make_twenty_one() {
        let h = hand("Ah As 9c");
        assert_eq!(h.value(), 21);
        assert!(h.is_soft());
    }

    #[test]
    fn hard_totals_are_literal_sums() {
        assert_eq!(hand("10h 7c").value(), 17);
        assert!(!hand("10h 7c").is_soft());
        assert_eq!(hand("Kh Qd 5s").value(), 25);
        assert!(hand("Kh Qd 5s").is_bust());
    }

    #[test]
    fn aces_downgrade_one_at_a_time() {
        assert_eq!(hand("Ah 6c").value(), 17);
        assert!(hand("Ah 6c").is_soft());
        let h = hand("Ah 6c 9d");
        assert_eq!(h.value(), 16);
        assert!(!h.is_soft());
        assert_eq!(hand("Ah Ad Ac As").value(), 14);
        assert_eq!(hand("Ah Ad Ac As 7h").value(), 21);
    }

    #[test]
    fn blackjack_needs_exactly_two_cards() {
        assert!(hand("Ah Kd").is_blackjack());
        assert!(!hand("7h 7d 7c").is_blackjack());
    }

    #[test]
    fn up_card_is_first_card() {
        let h = hand("9s Ah");
        assert_eq!(h.dealer_up_card(), Some("9s".parse().unwrap()));
        assert!(h.contains_ace());
    }

    #[test]
    fn display_matches_table_narrative() {
        assert_eq!(hand("Ah 6c").to_string(), "Cards: A♥, 6♣; Value: 17");
    }

    #[test]
    fn empty_text_is_rejected() {
        assert_eq!(Hand::from_str("  "), Err(HandError::Empty));
        assert!(matches!(Hand::from_str("Xq"), Err(HandError::CardParse(_))));
    }
}
