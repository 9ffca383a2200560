//! Agents: the participants' side of the table.
//!
//! The round controller asks each seat's `PlayerAgent` for a bet and then for
//! turn actions, one blocking call at a time. `AgentTable` maps seats to
//! agents so front-ends can mix the reference strategy, scripted seats and
//! bots without the controller knowing which is which.

use crate::cards::Card;
use crate::hand::Hand;
use core::fmt;
use std::collections::VecDeque;
use std::str::FromStr;

/// Kinds of agents attached to seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AgentKind {
    Reference,
    Scripted,
    Bot,
    Custom,
}

/// What a participant wants to do with their hand.
///
/// `Double` and `Split` are valid answers but the table does not act on them
/// yet; the controller records them and asks again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAction {
    Hit,
    Stand,
    Double,
    Split,
}

impl TurnAction {
    pub fn label(self) -> &'static str {
        match self {
            TurnAction::Hit => "Hit",
            TurnAction::Stand => "Stand",
            TurnAction::Double => "Double",
            TurnAction::Split => "Split",
        }
    }

    /// Whether the table can carry the action out.
    pub fn is_supported(self) -> bool {
        matches!(self, TurnAction::Hit | TurnAction::Stand)
    }
}

impl fmt::Display for TurnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AgentError {
    #[error("invalid turn action: '{0}'")]
    InvalidTurnAction(String),
}

impl FromStr for TurnAction {
    type Err = AgentError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hit" | "h" => Ok(TurnAction::Hit),
            "stand" | "s" => Ok(TurnAction::Stand),
            "double" | "d" => Ok(TurnAction::Double),
            "split" | "p" => Ok(TurnAction::Split),
            _ => Err(AgentError::InvalidTurnAction(s.to_string())),
        }
    }
}

/// Everything a participant may look at when choosing a turn action.
#[derive(Debug, Clone, Copy)]
pub struct TurnView<'a> {
    pub seat: usize,
    pub dealer_up_card: Card,
    pub hand: &'a Hand,
    /// Every seat's hand this round, `None` for seats sitting out.
    pub all_hands: &'a [Option<Hand>],
}

/// A seat controller that answers the table's bet and turn requests.
pub trait PlayerAgent {
    /// Amount to stake this round given the seat's current balance; zero sits the round out.
    fn bet(&mut self, balance: i64) -> i64;
    /// Next action for the hand in `view`.
    fn turn(&mut self, view: &TurnView<'_>) -> TurnAction;
    /// The kind of this agent.
    fn kind(&self) -> AgentKind {
        AgentKind::Custom
    }
}

mod bots;

pub use bots::{BotAgent, BotProfile, Difficulty};

/// The house reference player: flat stake, stands above a fixed total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedStakeAgent {
    pub stake: i64,
    pub stand_above: u8,
}

impl FixedStakeAgent {
    pub fn new(stake: i64, stand_above: u8) -> Self {
        Self { stake, stand_above }
    }
}

impl Default for FixedStakeAgent {
    fn default() -> Self {
        Self::new(1, 16)
    }
}

impl PlayerAgent for FixedStakeAgent {
    fn bet(&mut self, balance: i64) -> i64 {
        if balance > 0 {
            self.stake
        } else {
            0
        }
    }

    fn turn(&mut self, view: &TurnView<'_>) -> TurnAction {
        if view.hand.value() > self.stand_above {
            TurnAction::Stand
        } else {
            TurnAction::Hit
        }
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Reference
    }
}

/// Replays queued bets and actions; sits out and stands once the queues run dry.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAgent {
    bets: VecDeque<i64>,
    actions: VecDeque<TurnAction>,
}

impl ScriptedAgent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bets<I: IntoIterator<Item = i64>>(mut self, bets: I) -> Self {
        self.bets.extend(bets);
        self
    }

    pub fn with_actions<I: IntoIterator<Item = TurnAction>>(mut self, actions: I) -> Self {
        self.actions.extend(actions);
        self
    }

    pub fn push_bet(&mut self, amount: i64) {
        self.bets.push_back(amount);
    }

    pub fn push_action(&mut self, action: TurnAction) {
        self.actions.push_back(action);
    }

    /// Actions not consumed yet.
    pub fn pending_actions(&self) -> usize {
        self.actions.len()
    }
}

impl PlayerAgent for ScriptedAgent {
    fn bet(&mut self, _balance: i64) -> i64 {
        self.bets.pop_front().unwrap_or(0)
    }

    fn turn(&mut self, _view: &TurnView<'_>) -> TurnAction {
        self.actions.pop_front().unwrap_or(TurnAction::Stand)
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Scripted
    }
}

/// One optional agent per seat.
pub struct AgentTable {
    seats: Vec<Option<Box<dyn PlayerAgent>>>,
}

impl fmt::Debug for AgentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags: String = self
            .seats
            .iter()
            .map(|a| match a.as_deref().map(|ag| ag.kind()) {
                Some(AgentKind::Reference) => 'R',
                Some(AgentKind::Scripted) => 'S',
                Some(AgentKind::Bot) => 'B',
                Some(_) => 'C',
                None => '-',
            })
            .collect();
        write!(f, "AgentTable({flags})")
    }
}

impl AgentTable {
    /// Create a table with `n` seats, all empty.
    pub fn for_seats(n: usize) -> Self {
        let mut seats = Vec::with_capacity(n);
        seats.resize_with(n, || None);
        Self { seats }
    }

    /// Every seat played by the reference strategy.
    pub fn reference(n: usize) -> Self {
        let mut table = Self::for_seats(n);
        for seat in 0..n {
            table.set_agent(seat, Some(Box::new(FixedStakeAgent::default())));
        }
        table
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Ensure the table has exactly `n` seats.
    pub fn ensure_len(&mut self, n: usize) {
        if self.seats.len() < n {
            self.seats.resize_with(n, || None);
        }
        if self.seats.len() > n {
            self.seats.truncate(n);
        }
    }

    /// Assign an agent to a seat (or remove when `None`).
    pub fn set_agent(&mut self, seat: usize, agent: Option<Box<dyn PlayerAgent>>) {
        if seat >= self.seats.len() {
            self.ensure_len(seat + 1);
        }
        self.seats[seat] = agent;
    }

    pub fn agent_mut(&mut self, seat: usize) -> Option<&mut (dyn PlayerAgent + 'static)> {
        self.seats.get_mut(seat).and_then(|a| a.as_deref_mut())
    }

    /// Return the kind of agent at a seat, if any.
    pub fn agent_kind(&self, seat: usize) -> Option<AgentKind> {
        self.seats.get(seat).and_then(|a| a.as_deref().map(|ag| ag.kind()))
    }

    pub fn has_agent(&self, seat: usize) -> bool {
        self.seats.get(seat).map(|a| a.is_some()).unwrap_or(false)
    }

    /// Remove all agents.
    pub fn clear(&mut self) {
        for a in &mut self.seats {
            *a = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_of<'a>(hand: &'a Hand, all: &'a [Option<Hand>]) -> TurnView<'a> {
        TurnView { seat: 0, dealer_up_card: "7c".parse().unwrap(), hand, all_hands: all }
    }

    #[test]
    fn reference_bets_unit_only_with_money() {
        let mut agent = FixedStakeAgent::default();
        assert_eq!(agent.bet(1), 1);
        assert_eq!(agent.bet(0), 0);
        assert_eq!(agent.bet(-3), 0);
    }

    #[test]
    fn reference_stands_above_sixteen() {
        let mut agent = FixedStakeAgent::default();
        let seventeen: Hand = "10h 7d".parse().unwrap();
        let sixteen: Hand = "10h 6d".parse().unwrap();
        assert_eq!(agent.turn(&view_of(&seventeen, &[])), TurnAction::Stand);
        assert_eq!(agent.turn(&view_of(&sixteen, &[])), TurnAction::Hit);
    }

    #[test]
    fn scripted_agent_replays_then_stands() {
        let hand: Hand = "2h 3d".parse().unwrap();
        let mut agent = ScriptedAgent::new().with_bets([5]).with_actions([TurnAction::Hit]);
        assert_eq!(agent.bet(100), 5);
        assert_eq!(agent.bet(100), 0);
        assert_eq!(agent.turn(&view_of(&hand, &[])), TurnAction::Hit);
        assert_eq!(agent.turn(&view_of(&hand, &[])), TurnAction::Stand);
    }

    #[test]
    fn turn_actions_parse_and_reject_unknown() {
        assert_eq!("H".parse::<TurnAction>().unwrap(), TurnAction::Hit);
        assert_eq!("split".parse::<TurnAction>().unwrap(), TurnAction::Split);
        assert_eq!(
            "surrender".parse::<TurnAction>(),
            Err(AgentError::InvalidTurnAction("surrender".to_string()))
        );
        assert!(!TurnAction::Double.is_supported());
    }

    #[test]
    fn table_resizes_and_reports_kinds() {
        let mut table = AgentTable::reference(2);
        assert_eq!(table.agent_kind(1), Some(AgentKind::Reference));
        table.set_agent(3, Some(Box::new(ScriptedAgent::new())));
        assert_eq!(table.len(), 4);
        assert!(!table.has_agent(2));
        assert_eq!(format!("{table:?}"), "AgentTable(RR-S)");
        table.ensure_len(1);
        assert_eq!(table.len(), 1);
        table.clear();
        assert!(!table.has_agent(0));
    }
}
