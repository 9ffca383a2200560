use crate::cards::Card;
use crate::hand::Hand;
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

use super::{AgentKind, PlayerAgent, TurnAction, TurnView};

/// Difficulty tiers; lower tiers stray from basic strategy more often.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Med",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }

    fn mistake_rate(self) -> f64 {
        match self {
            Difficulty::Easy => 0.2,
            Difficulty::Medium => 0.08,
            Difficulty::Hard => 0.0,
        }
    }
}

/// Configuration for a bot's stake and randomness.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct BotProfile {
    pub difficulty: Difficulty,
    pub stake: i64,
    pub rng_seed: Option<u64>,
}

impl BotProfile {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self { difficulty, stake: 1, rng_seed: None }
    }

    pub fn with_stake(mut self, stake: i64) -> Self {
        self.stake = stake;
        self
    }

    /// Set a deterministic RNG seed for reproducible decisions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

impl Default for BotProfile {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::Medium)
    }
}

/// Plays hit/stand basic strategy against the dealer's up-card.
#[derive(Debug)]
pub struct BotAgent {
    profile: BotProfile,
    rng: StdRng,
}

impl BotAgent {
    pub fn new(profile: BotProfile) -> Self {
        let rng = match profile.rng_seed {
            Some(v) => StdRng::seed_from_u64(v),
            None => {
                let mut seed = [0u8; 32];
                rand::rng().fill_bytes(&mut seed);
                StdRng::from_seed(seed)
            }
        };
        Self { profile, rng }
    }

    pub fn profile(&self) -> &BotProfile {
        &self.profile
    }
}

impl PlayerAgent for BotAgent {
    fn bet(&mut self, balance: i64) -> i64 {
        if balance <= 0 {
            return 0;
        }
        self.profile.stake.min(balance).max(0)
    }

    fn turn(&mut self, view: &TurnView<'_>) -> TurnAction {
        let advised = basic_strategy(view.hand, view.dealer_up_card);
        if view.hand.value() >= 21 {
            return TurnAction::Stand;
        }
        let rate = self.profile.difficulty.mistake_rate();
        if rate > 0.0 && self.rng.random::<f64>() < rate {
            return match advised {
                TurnAction::Hit => TurnAction::Stand,
                _ => TurnAction::Hit,
            };
        }
        advised
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Bot
    }
}

/// Hit/stand chart; the up-card Ace counts 11.
fn basic_strategy(hand: &Hand, up: Card) -> TurnAction {
    let total = hand.value();
    let dealer = up.value().high();
    let stand = if hand.is_soft() {
        total >= 19 || (total == 18 && dealer <= 8)
    } else if total >= 17 {
        true
    } else if total >= 13 {
        (2..=6).contains(&dealer)
    } else if total == 12 {
        (4..=6).contains(&dealer)
    } else {
        false
    };
    if stand {
        TurnAction::Stand
    } else {
        TurnAction::Hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    fn hand(s: &str) -> Hand {
        s.parse().unwrap()
    }

    #[test]
    fn chart_stands_on_stiff_hands_against_weak_up_cards() {
        assert_eq!(basic_strategy(&hand("10h 3c"), card("6d")), TurnAction::Stand);
        assert_eq!(basic_strategy(&hand("10h 3c"), card("7d")), TurnAction::Hit);
        assert_eq!(basic_strategy(&hand("10h 2c"), card("3d")), TurnAction::Hit);
        assert_eq!(basic_strategy(&hand("10h 2c"), card("4d")), TurnAction::Stand);
    }

    #[test]
    fn chart_handles_soft_totals() {
        assert_eq!(basic_strategy(&hand("Ah 7c"), card("8d")), TurnAction::Stand);
        assert_eq!(basic_strategy(&hand("Ah 7c"), card("9d")), TurnAction::Hit);
        assert_eq!(basic_strategy(&hand("Ah 7c"), card("Ad")), TurnAction::Hit);
        assert_eq!(basic_strategy(&hand("Ah 6c"), card("2d")), TurnAction::Hit);
    }

    #[test]
    fn hard_bot_never_deviates() {
        let mut bot = BotAgent::new(BotProfile::for_difficulty(Difficulty::Hard).with_seed(11));
        let h = hand("10h 9c");
        let view = TurnView { seat: 0, dealer_up_card: card("10d"), hand: &h, all_hands: &[] };
        for _ in 0..50 {
            assert_eq!(bot.turn(&view), TurnAction::Stand);
        }
    }

    #[test]
    fn bot_never_hits_twenty_one() {
        let mut bot = BotAgent::new(BotProfile::for_difficulty(Difficulty::Easy).with_seed(3));
        let h = hand("Ah Kc");
        let view = TurnView { seat: 0, dealer_up_card: card("5d"), hand: &h, all_hands: &[] };
        for _ in 0..50 {
            assert_eq!(bot.turn(&view), TurnAction::Stand);
        }
    }

    #[test]
    fn bet_is_capped_by_balance() {
        let mut bot = BotAgent::new(BotProfile::default().with_stake(10).with_seed(1));
        assert_eq!(bot.bet(100), 10);
        assert_eq!(bot.bet(4), 4);
        assert_eq!(bot.bet(0), 0);
    }

    #[test]
    fn seeded_bots_agree() {
        let h = hand("10h 6c");
        let view = TurnView { seat: 0, dealer_up_card: card("9d"), hand: &h, all_hands: &[] };
        let mut a = BotAgent::new(BotProfile::for_difficulty(Difficulty::Easy).with_seed(99));
        let mut b = BotAgent::new(BotProfile::for_difficulty(Difficulty::Easy).with_seed(99));
        let xs: Vec<_> = (0..20).map(|_| a.turn(&view)).collect();
        let ys: Vec<_> = (0..20).map(|_| b.turn(&view)).collect();
        assert_eq!(xs, ys);
    }
}
