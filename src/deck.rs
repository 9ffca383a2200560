use crate::cards::{Card, Rank, Suit};
use crate::hand::Hand;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;

/// Cards in one standard deck.
pub const CARDS_PER_DECK: usize = 52;

/// How `Deck::shuffle` permutes the shoe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum ShuffleMode {
    /// Textbook Fisher-Yates: every position `0..len-1` starts a swap window.
    #[default]
    FisherYates,
    /// Historical bound: positions `len-2` and `len-1` never start a swap window,
    /// so the final pair can only move when an earlier index swaps into it.
    Legacy,
}

/// Deck construction and reshuffle settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct DeckConfig {
    pub decks: usize,
    pub reshuffle_threshold: usize,
    pub shuffle: ShuffleMode,
    pub seed: Option<u64>,
}

impl DeckConfig {
    pub const DEFAULT_DECKS: usize = 1;
    pub const DEFAULT_RESHUFFLE_THRESHOLD: usize = 15;

    pub fn with_decks(mut self, decks: usize) -> Self {
        self.decks = decks;
        self
    }

    pub fn with_reshuffle_threshold(mut self, threshold: usize) -> Self {
        self.reshuffle_threshold = threshold;
        self
    }

    pub fn with_shuffle(mut self, shuffle: ShuffleMode) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Set a deterministic RNG seed for reproducible shuffles.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            decks: Self::DEFAULT_DECKS,
            reshuffle_threshold: Self::DEFAULT_RESHUFFLE_THRESHOLD,
            shuffle: ShuffleMode::default(),
            seed: None,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("no cards left in the shoe or the discard pile")]
    Empty,
    #[error("cannot discard {returned} cards, only {in_play} are in play")]
    Foreign { returned: usize, in_play: usize },
}

/// A shoe of `decks` x 52 cards with a discard pile.
///
/// Dealt cards are tracked as in play until their hand is handed back through
/// [`Deck::discard_hand`], so `len() + discards().len() + in_play()` always
/// equals `total()`.
#[derive(Debug, Clone)]
pub struct Deck {
    shoe: Vec<Card>,
    discards: Vec<Card>,
    in_play: usize,
    total: usize,
    reshuffles: u64,
    config: DeckConfig,
    rng: ChaCha8Rng,
}

impl Deck {
    /// Build and shuffle a shoe from `config`.
    ///
    /// ```
    /// use blackjack_table::deck::{Deck, DeckConfig};
    ///
    /// let deck = Deck::new(&DeckConfig::default().with_decks(2).with_seed(1));
    /// assert_eq!(deck.len(), 104);
    /// ```
    pub fn new(config: &DeckConfig) -> Self {
        let mut shoe = Vec::with_capacity(config.decks * CARDS_PER_DECK);
        for _ in 0..config.decks {
            for &r in &Rank::ALL {
                for &s in &Suit::ALL {
                    shoe.push(Card::new(r, s));
                }
            }
        }
        let mut deck = Self::from_parts(shoe, config.clone());
        deck.shuffle();
        deck
    }

    /// A single shuffled deck with the default reshuffle threshold.
    pub fn standard() -> Self {
        Self::new(&DeckConfig::default())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(&DeckConfig::default().with_seed(seed))
    }

    /// An unshuffled shoe dealt in the given order (first card comes out first).
    ///
    /// The reshuffle threshold is zero so the order survives until the shoe runs out.
    pub fn stacked(cards: Vec<Card>) -> Self {
        let mut shoe = cards;
        shoe.reverse();
        let config = DeckConfig::default().with_reshuffle_threshold(0);
        Self::from_parts(shoe, config)
    }

    fn from_parts(shoe: Vec<Card>, config: DeckConfig) -> Self {
        let rng = match config.seed {
            Some(v) => ChaCha8Rng::seed_from_u64(v),
            None => {
                let mut seed = [0u8; 32];
                rand::rng().fill_bytes(&mut seed);
                ChaCha8Rng::from_seed(seed)
            }
        };
        let total = shoe.len();
        Self { shoe, discards: Vec::new(), in_play: 0, total, reshuffles: 0, config, rng }
    }

    /// Cards left in the shoe.
    pub fn len(&self) -> usize {
        self.shoe.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shoe.is_empty()
    }

    /// Undealt cards; the last element is the next card out.
    pub fn shoe(&self) -> &[Card] {
        &self.shoe
    }

    pub fn discards(&self) -> &[Card] {
        &self.discards
    }

    /// Cards dealt into hands that have not been discarded yet.
    pub fn in_play(&self) -> usize {
        self.in_play
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of shuffles performed, including the initial one.
    pub fn reshuffles(&self) -> u64 {
        self.reshuffles
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    /// Fold the discard pile back into the shoe and permute it.
    pub fn shuffle(&mut self) {
        log::info!(
            "shuffling {} shoe + {} discards ({:?})",
            self.shoe.len(),
            self.discards.len(),
            self.config.shuffle
        );
        self.shoe.append(&mut self.discards);
        let n = self.shoe.len();
        let last_window = match self.config.shuffle {
            ShuffleMode::FisherYates => n.saturating_sub(1),
            ShuffleMode::Legacy => n.saturating_sub(2),
        };
        for i in 0..last_window {
            let j = self.rng.random_range(i..n);
            self.shoe.swap(i, j);
        }
        self.reshuffles += 1;
        self.check_conservation();
    }

    /// Reshuffle when the shoe has dropped below the configured threshold.
    pub fn shuffle_if_needed(&mut self) -> bool {
        if self.shoe.len() < self.config.reshuffle_threshold {
            self.shuffle();
            return true;
        }
        false
    }

    /// Deal the top card; it stays in play until its hand is discarded.
    ///
    /// An empty shoe triggers one reshuffle of the discards before giving up.
    pub fn deal_card(&mut self) -> Result<Card, DeckError> {
        if self.shoe.is_empty() {
            self.shuffle();
        }
        let card = self.shoe.pop().ok_or(DeckError::Empty)?;
        self.in_play += 1;
        log::debug!("dealt {card} ({} left in shoe)", self.shoe.len());
        self.check_conservation();
        Ok(card)
    }

    /// Return a finished hand's cards to the discard pile.
    pub fn discard_hand(&mut self, hand: Hand) -> Result<(), DeckError> {
        let cards = hand.into_cards();
        if cards.len() > self.in_play {
            return Err(DeckError::Foreign { returned: cards.len(), in_play: self.in_play });
        }
        self.in_play -= cards.len();
        self.discards.extend(cards);
        self.check_conservation();
        Ok(())
    }

    fn check_conservation(&self) {
        assert_eq!(
            self.shoe.len() + self.discards.len() + self.in_play,
            self.total,
            "deck bookkeeping lost track of a card"
        );
    }
}

fn write_cards(f: &mut fmt::Formatter<'_>, cards: &[Card]) -> fmt::Result {
    for (i, c) in cards.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{c}")?;
    }
    Ok(())
}

/// Shoe in dealing order (next card first), then the discard pile.
impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Deck: ")?;
        let shoe: Vec<Card> = self.shoe.iter().rev().copied().collect();
        write_cards(f, &shoe)?;
        f.write_str("; Discards: ")?;
        write_cards(f, &self.discards)
    }
}
