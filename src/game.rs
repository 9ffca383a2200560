use crate::agents::{AgentTable, TurnAction, TurnView};
use crate::cards::Card;
use crate::deck::{Deck, DeckConfig, DeckError};
use crate::hand::{Hand, BLACKJACK};
use std::fmt;

/// Total the dealer must reach before standing.
pub const DEALER_STANDS_ON: u8 = 17;

/// Where the round controller currently is (or stopped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Phase {
    Idle,
    AcceptingBets,
    Dealing,
    PlayerTurns(usize),
    DealerPlay,
    Resolved,
}

/// Who a history entry is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    Player(usize),
    Dealer,
    Table,
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::Player(i) => write!(f, "P{}", i + 1),
            Seat::Dealer => f.write_str("Dealer"),
            Seat::Table => f.write_str("Table"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HistoryVerb {
    Bet,
    SitOut,
    NoBets,
    Shuffle,
    Deal,
    UpCard,
    Hit,
    Bust,
    Stand,
    Unsupported(TurnAction),
    DealerHit,
    DealerStand,
}

impl HistoryVerb {
    pub fn label(self) -> &'static str {
        match self {
            HistoryVerb::Bet => "Bet",
            HistoryVerb::SitOut => "Sit out",
            HistoryVerb::NoBets => "No bets",
            HistoryVerb::Shuffle => "Shuffle",
            HistoryVerb::Deal => "Dealt",
            HistoryVerb::UpCard => "Showing",
            HistoryVerb::Hit => "Hit",
            HistoryVerb::Bust => "Bust",
            HistoryVerb::Stand => "Stand",
            HistoryVerb::Unsupported(TurnAction::Double) => "Double (unsupported)",
            HistoryVerb::Unsupported(TurnAction::Split) => "Split (unsupported)",
            HistoryVerb::Unsupported(_) => "Unsupported",
            HistoryVerb::DealerHit => "Hit",
            HistoryVerb::DealerStand => "Stand",
        }
    }
}

/// One line of the round narrative.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct HistoryEntry {
    pub round: u64,
    pub seat: Seat,
    pub verb: HistoryVerb,
    pub cards: Vec<Card>,
    pub amount: Option<i64>,
    pub value: Option<u8>,
}

impl HistoryEntry {
    fn new(round: u64, seat: Seat, verb: HistoryVerb) -> Self {
        Self { round, seat, verb, cards: Vec::new(), amount: None, value: None }
    }

    fn with_cards(mut self, cards: &[Card]) -> Self {
        self.cards = cards.to_vec();
        self
    }

    fn with_amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    fn with_value(mut self, value: u8) -> Self {
        self.value = Some(value);
        self
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.seat, self.verb.label())?;
        for (i, c) in self.cards.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{c}")?;
        }
        if let Some(amount) = self.amount {
            write!(f, " {amount}")?;
        }
        if let Some(value) = self.value {
            write!(f, " ({value})")?;
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error("seat {seat} has no agent")]
    MissingAgent { seat: usize },
    #[error("seat {seat} bet a negative amount: {amount}")]
    InvalidBet { seat: usize, amount: i64 },
    #[error("seat {seat} kept choosing unsupported actions (last: {action})")]
    TurnStalled { seat: usize, action: TurnAction },
    #[error(transparent)]
    Deck(#[from] DeckError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Player {
    pub(crate) name: String,
    pub(crate) balance: i64,
}

impl Player {
    pub fn new(name: impl Into<String>, balance: i64) -> Self {
        Self { name: name.into(), balance }
    }

    /// Returns the player's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the player's current balance
    pub fn balance(&self) -> i64 {
        self.balance
    }

    /// Adjust the balance by `delta`.
    pub fn money(&mut self, delta: i64) {
        self.balance += delta;
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.name)
    }
}

/// Table rules and shoe settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct TableConfig {
    pub deck: DeckConfig,
    pub dealer_hits_soft_17: bool,
    /// Consecutive Double/Split answers tolerated before the round is abandoned.
    pub max_unsupported_actions: usize,
}

impl TableConfig {
    pub fn with_deck(mut self, deck: DeckConfig) -> Self {
        self.deck = deck;
        self
    }

    pub fn with_dealer_hits_soft_17(mut self, hits: bool) -> Self {
        self.dealer_hits_soft_17 = hits;
        self
    }

    pub fn with_max_unsupported_actions(mut self, n: usize) -> Self {
        self.max_unsupported_actions = n;
        self
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { deck: DeckConfig::default(), dealer_hits_soft_17: true, max_unsupported_actions: 3 }
    }
}

/// A hand as it stood when the round resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandSnapshot {
    pub cards: Vec<Card>,
    pub value: u8,
    pub soft: bool,
}

impl HandSnapshot {
    pub fn is_bust(&self) -> bool {
        self.value > BLACKJACK
    }
}

impl From<&Hand> for HandSnapshot {
    fn from(hand: &Hand) -> Self {
        Self { cards: hand.cards().to_vec(), value: hand.value(), soft: hand.is_soft() }
    }
}

/// Output of one round: bets and results indexed by seat.
///
/// A result is `-bet` for a bust and `0` otherwise; wins against the dealer are not paid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    pub round: u64,
    pub bets: Vec<i64>,
    pub results: Vec<i64>,
    pub hands: Vec<Option<HandSnapshot>>,
    pub dealer: Option<HandSnapshot>,
}

impl RoundReport {
    /// Whether any cards were dealt.
    pub fn was_dealt(&self) -> bool {
        self.dealer.is_some()
    }
}

/// The dealer draws below 17, and on a soft 17 when the table says so.
pub fn dealer_must_hit(hand: &Hand, hits_soft_17: bool) -> bool {
    let value = hand.value();
    value < DEALER_STANDS_ON || (hits_soft_17 && value == DEALER_STANDS_ON && hand.is_soft())
}

/// One blackjack table: the shoe, the seated players and the round controller.
#[derive(Debug)]
#[non_exhaustive]
pub struct Game {
    pub(crate) config: TableConfig,
    pub(crate) deck: Deck,
    pub(crate) players: Vec<Player>,
    pub(crate) phase: Phase,
    pub(crate) round: u64,
    hands: Vec<Option<Hand>>,
    dealer_hand: Option<Hand>,
    last_report: Option<RoundReport>,
    history: Vec<HistoryEntry>,
}

impl Game {
    pub fn new(config: TableConfig, players: Vec<Player>) -> Self {
        let deck = Deck::new(&config.deck);
        Self::with_deck(config, deck, players)
    }

    /// Build a table around an existing shoe (stacked decks, replays).
    pub fn with_deck(config: TableConfig, deck: Deck, players: Vec<Player>) -> Self {
        Self {
            config,
            deck,
            players,
            phase: Phase::Idle,
            round: 0,
            hands: Vec::new(),
            dealer_hand: None,
            last_report: None,
            history: Vec::new(),
        }
    }

    /// `n` players named `P1..Pn`, default rules.
    pub fn with_players(n: usize, starting_balance: i64) -> Self {
        let players = (1..=n).map(|i| Player::new(format!("P{i}"), starting_balance)).collect();
        Self::new(TableConfig::default(), players)
    }

    /// Seat another player and return their seat index.
    pub fn add_player(&mut self, player: Player) -> usize {
        log::info!("seating {player}");
        self.players.push(player);
        self.players.len() - 1
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Rounds started so far.
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn last_report(&self) -> Option<&RoundReport> {
        self.last_report.as_ref()
    }

    pub fn history_recent(&self, n: usize) -> Vec<HistoryEntry> {
        self.history_recent_offset(n, 0)
    }

    /// Up to `n` entries ending `offset` entries before the newest one.
    pub fn history_recent_offset(&self, n: usize, offset: usize) -> Vec<HistoryEntry> {
        let end = self.history.len().saturating_sub(offset);
        let start = end.saturating_sub(n);
        self.history[start..end].to_vec()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Apply a round's results to the players' balances.
    pub fn settle(&mut self, report: &RoundReport) {
        for (player, &delta) in self.players.iter_mut().zip(&report.results) {
            player.money(delta);
        }
    }

    /// Play one full round: bets, deal, each seat's turn, dealer play.
    ///
    /// Every hand dealt during the round goes back to the discard pile before
    /// this returns, whether the round resolved or failed.
    pub fn play_round(&mut self, agents: &mut AgentTable) -> Result<RoundReport, GameError> {
        self.round += 1;
        self.history.clear();
        log::info!("round {}: accepting bets", self.round);

        let outcome = self.run_round(agents);
        let released = self.release_hands();
        let report = outcome?;
        released?;

        self.phase = Phase::Resolved;
        log::info!("round {} resolved: {:?}", self.round, report.results);
        self.last_report = Some(report.clone());
        Ok(report)
    }

    fn run_round(&mut self, agents: &mut AgentTable) -> Result<RoundReport, GameError> {
        self.phase = Phase::AcceptingBets;
        let bets = self.collect_bets(agents)?;
        let seats = self.players.len();

        if bets.iter().all(|&b| b == 0) {
            log::info!("no one bet, no hand will be played");
            self.record(HistoryEntry::new(self.round, Seat::Table, HistoryVerb::NoBets));
            return Ok(RoundReport {
                round: self.round,
                bets,
                results: vec![0; seats],
                hands: vec![None; seats],
                dealer: None,
            });
        }

        self.phase = Phase::Dealing;
        self.deal(&bets)?;

        let mut results = Vec::with_capacity(seats);
        for (seat, &bet) in bets.iter().enumerate() {
            self.phase = Phase::PlayerTurns(seat);
            results.push(self.play_turn(seat, bet, agents)?);
        }

        self.phase = Phase::DealerPlay;
        self.dealer_play()?;

        Ok(RoundReport {
            round: self.round,
            bets,
            results,
            hands: self.hands.iter().map(|h| h.as_ref().map(HandSnapshot::from)).collect(),
            dealer: self.dealer_hand.as_ref().map(HandSnapshot::from),
        })
    }

    fn collect_bets(&mut self, agents: &mut AgentTable) -> Result<Vec<i64>, GameError> {
        let mut bets = Vec::with_capacity(self.players.len());
        for seat in 0..self.players.len() {
            let balance = self.players[seat].balance;
            let agent = agents.agent_mut(seat).ok_or(GameError::MissingAgent { seat })?;
            let amount = agent.bet(balance);
            if amount < 0 {
                return Err(GameError::InvalidBet { seat, amount });
            }
            let entry = if amount > 0 {
                log::info!("{} bet {amount}", self.players[seat].name);
                HistoryEntry::new(self.round, Seat::Player(seat), HistoryVerb::Bet)
                    .with_amount(amount)
            } else {
                log::info!("{} is sitting the hand out", self.players[seat].name);
                HistoryEntry::new(self.round, Seat::Player(seat), HistoryVerb::SitOut)
            };
            self.record(entry);
            bets.push(amount);
        }
        Ok(bets)
    }

    fn deal(&mut self, bets: &[i64]) -> Result<(), GameError> {
        if self.deck.shuffle_if_needed() {
            self.record(HistoryEntry::new(self.round, Seat::Table, HistoryVerb::Shuffle));
        }
        log::info!("dealing");

        self.hands = Vec::with_capacity(bets.len());
        for (seat, &bet) in bets.iter().enumerate() {
            if bet <= 0 {
                self.hands.push(None);
                continue;
            }
            let reshuffles = self.deck.reshuffles();
            let hand = Hand::deal(&mut self.deck)?;
            self.note_reshuffle(reshuffles);
            log::debug!("{} hand {hand}", self.players[seat].name);
            let entry = HistoryEntry::new(self.round, Seat::Player(seat), HistoryVerb::Deal)
                .with_cards(hand.cards())
                .with_value(hand.value());
            self.hands.push(Some(hand));
            self.record(entry);
        }

        let reshuffles = self.deck.reshuffles();
        let dealer = Hand::deal(&mut self.deck)?;
        self.note_reshuffle(reshuffles);
        let up: Vec<Card> = dealer.dealer_up_card().into_iter().collect();
        self.dealer_hand = Some(dealer);
        if let Some(card) = up.first() {
            log::info!("dealer showing card {card}");
        }
        self.record(
            HistoryEntry::new(self.round, Seat::Dealer, HistoryVerb::UpCard).with_cards(&up),
        );
        Ok(())
    }

    fn play_turn(
        &mut self,
        seat: usize,
        bet: i64,
        agents: &mut AgentTable,
    ) -> Result<i64, GameError> {
        if bet <= 0 {
            return Ok(0);
        }
        let Some(up) = self.dealer_hand.as_ref().and_then(Hand::dealer_up_card) else {
            return Ok(0);
        };
        let agent = agents.agent_mut(seat).ok_or(GameError::MissingAgent { seat })?;
        let mut unsupported = 0;

        loop {
            let action = {
                let Some(hand) = self.hands.get(seat).and_then(Option::as_ref) else {
                    return Ok(0);
                };
                let view = TurnView { seat, dealer_up_card: up, hand, all_hands: &self.hands };
                agent.turn(&view)
            };
            log::debug!("{} chose {action}", self.players[seat].name);

            match action {
                TurnAction::Hit => {
                    unsupported = 0;
                    let reshuffles = self.deck.reshuffles();
                    let (card, value) = match self.hands[seat].as_mut() {
                        Some(hand) => (hand.hit(&mut self.deck)?, hand.value()),
                        None => return Ok(0),
                    };
                    self.note_reshuffle(reshuffles);
                    self.record(
                        HistoryEntry::new(self.round, Seat::Player(seat), HistoryVerb::Hit)
                            .with_cards(&[card])
                            .with_value(value),
                    );
                    if value > BLACKJACK {
                        log::info!("{} busted with {value}", self.players[seat].name);
                        self.record(
                            HistoryEntry::new(self.round, Seat::Player(seat), HistoryVerb::Bust)
                                .with_amount(-bet)
                                .with_value(value),
                        );
                        return Ok(-bet);
                    }
                }
                TurnAction::Stand => {
                    let value = self.hands[seat].as_ref().map(Hand::value).unwrap_or_default();
                    log::info!("{} stood with {value}", self.players[seat].name);
                    self.record(
                        HistoryEntry::new(self.round, Seat::Player(seat), HistoryVerb::Stand)
                            .with_value(value),
                    );
                    return Ok(0);
                }
                TurnAction::Double | TurnAction::Split => {
                    unsupported += 1;
                    log::debug!("{action} is not supported, asking again");
                    self.record(HistoryEntry::new(
                        self.round,
                        Seat::Player(seat),
                        HistoryVerb::Unsupported(action),
                    ));
                    if unsupported > self.config.max_unsupported_actions {
                        return Err(GameError::TurnStalled { seat, action });
                    }
                }
            }
        }
    }

    fn dealer_play(&mut self) -> Result<(), GameError> {
        let hits_soft_17 = self.config.dealer_hits_soft_17;
        loop {
            let Some(dealer) = self.dealer_hand.as_mut() else {
                return Ok(());
            };
            if !dealer_must_hit(dealer, hits_soft_17) {
                let value = dealer.value();
                log::info!("dealer stands: {dealer}");
                self.record(
                    HistoryEntry::new(self.round, Seat::Dealer, HistoryVerb::DealerStand)
                        .with_value(value),
                );
                return Ok(());
            }
            let reshuffles = self.deck.reshuffles();
            let card = dealer.hit(&mut self.deck)?;
            let value = dealer.value();
            log::debug!("dealer hit: {dealer}");
            self.note_reshuffle(reshuffles);
            self.record(
                HistoryEntry::new(self.round, Seat::Dealer, HistoryVerb::DealerHit)
                    .with_cards(&[card])
                    .with_value(value),
            );
        }
    }

    fn release_hands(&mut self) -> Result<(), DeckError> {
        for hand in self.hands.drain(..).flatten() {
            self.deck.discard_hand(hand)?;
        }
        if let Some(dealer) = self.dealer_hand.take() {
            self.deck.discard_hand(dealer)?;
        }
        Ok(())
    }

    /// Narrate a reshuffle forced by an empty shoe since `before` was read.
    fn note_reshuffle(&mut self, before: u64) {
        if self.deck.reshuffles() > before {
            log::info!("shoe ran dry mid-round, discards reshuffled");
            self.record(HistoryEntry::new(self.round, Seat::Table, HistoryVerb::Shuffle));
        }
    }

    fn record(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }
}
