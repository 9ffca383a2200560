use crate::agents::{AgentKind, AgentTable, BotAgent, BotProfile, Difficulty, FixedStakeAgent};
use crate::game::{Game, Phase, RoundReport};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Scene {
    Menu,
    Table,
}

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    MenuNext,
    MenuPrev,
    MenuInc,
    MenuDec,
    MenuApply,
    MenuCancel,
    ToggleMenu,
    ToggleHelp,
    ToggleHistory,
    HistoryUp,
    HistoryDown,
    PlayRound,
    ToggleAutoPlay,
}

#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    pub scene: Scene,
    pub started: Instant,
    // Core table instance
    pub game: Game,
    pub agents: AgentTable,
    // Menu config being edited
    pub menu_index: usize,
    pub cfg_num_players: usize,
    pub cfg_decks: usize,
    pub cfg_reshuffle_threshold: usize,
    pub cfg_starting_balance: i64,
    pub cfg_stake: i64,
    pub cfg_bot_difficulty: Difficulty,
    pub cfg_dealer_hits_soft_17: bool,
    pub stake: i64,
    pub bot_difficulty: Difficulty,
    pub auto_play: bool,
    help_open: bool,
    history_open: bool,
    history_offset: usize,
    round_error: Option<String>,
    round_error_at: Option<Instant>,
}

impl Default for AppState {
    fn default() -> Self {
        let game = Game::with_players(3, 100);
        let difficulty = Difficulty::Medium;
        Self {
            scene: Scene::Menu,
            started: Instant::now(),
            agents: Self::seat_agents(3, 1, difficulty),
            game,
            menu_index: 0,
            cfg_num_players: 3,
            cfg_decks: 1,
            cfg_reshuffle_threshold: 15,
            cfg_starting_balance: 100,
            cfg_stake: 1,
            cfg_bot_difficulty: difficulty,
            cfg_dealer_hits_soft_17: true,
            stake: 1,
            bot_difficulty: difficulty,
            auto_play: false,
            help_open: false,
            history_open: false,
            history_offset: 0,
            round_error: None,
            round_error_at: None,
        }
    }
}

impl AppState {
    pub const HISTORY_PAGE_SIZE: usize = 20;
    const ROUND_ERROR_TTL: Duration = Duration::from_secs(3);

    /// Seat 0 plays the reference strategy, every other seat is a bot.
    pub(crate) fn seat_agents(n: usize, stake: i64, difficulty: Difficulty) -> AgentTable {
        let mut agents = AgentTable::for_seats(n);
        for seat in 0..n {
            if seat == 0 {
                agents.set_agent(seat, Some(Box::new(FixedStakeAgent::new(stake, 16))));
            } else {
                let profile = BotProfile::for_difficulty(difficulty).with_stake(stake);
                agents.set_agent(seat, Some(Box::new(BotAgent::new(profile))));
            }
        }
        agents
    }

    pub fn seat_label(&self, seat: usize) -> Option<&'static str> {
        match self.agents.agent_kind(seat)? {
            AgentKind::Reference => Some("REF"),
            AgentKind::Bot => Some(self.bot_difficulty.label()),
            AgentKind::Scripted => Some("SCRIPT"),
            _ => None,
        }
    }

    pub fn last_report(&self) -> Option<&RoundReport> {
        self.game.last_report()
    }

    pub fn round_error(&self) -> Option<&str> {
        self.round_error.as_deref()
    }

    fn clear_round_error(&mut self) {
        self.round_error = None;
        self.round_error_at = None;
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn history_open(&self) -> bool {
        self.history_open
    }

    pub fn history_offset(&self) -> usize {
        self.history_offset
    }

    pub(crate) fn close_help(&mut self) {
        self.help_open = false;
    }

    pub(crate) fn close_history(&mut self) {
        self.history_open = false;
    }

    pub fn handle_input(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::ToggleMenu => {
                self.toggle_menu();
                false
            }
            InputAction::ToggleHelp => {
                if self.scene == Scene::Table {
                    self.history_open = false;
                    self.help_open = !self.help_open;
                }
                false
            }
            InputAction::ToggleHistory => {
                if self.scene == Scene::Table {
                    self.help_open = false;
                    if !self.history_open {
                        self.history_offset = 0;
                    }
                    self.history_open = !self.history_open;
                }
                false
            }
            InputAction::HistoryUp => {
                if self.scene == Scene::Table && self.history_open {
                    let max_offset =
                        self.game.history_len().saturating_sub(Self::HISTORY_PAGE_SIZE);
                    self.history_offset = (self.history_offset + 1).min(max_offset);
                }
                false
            }
            InputAction::HistoryDown => {
                if self.scene == Scene::Table && self.history_open && self.history_offset > 0 {
                    self.history_offset -= 1;
                }
                false
            }
            InputAction::MenuNext => {
                if self.scene == Scene::Menu {
                    self.menu_next();
                }
                false
            }
            InputAction::MenuPrev => {
                if self.scene == Scene::Menu {
                    self.menu_prev();
                }
                false
            }
            InputAction::MenuInc => {
                if self.scene == Scene::Menu {
                    self.menu_inc();
                }
                false
            }
            InputAction::MenuDec => {
                if self.scene == Scene::Menu {
                    self.menu_dec();
                }
                false
            }
            InputAction::MenuApply => {
                if self.scene == Scene::Menu {
                    self.apply_menu();
                }
                false
            }
            InputAction::MenuCancel => {
                if self.scene == Scene::Menu {
                    self.cancel_menu();
                }
                false
            }
            InputAction::PlayRound => self.scene == Scene::Table && self.play_round(),
            InputAction::ToggleAutoPlay => {
                if self.scene == Scene::Table {
                    self.auto_play = !self.auto_play;
                }
                false
            }
        }
    }

    /// Play one round and settle the balances; returns whether the round resolved.
    pub fn play_round(&mut self) -> bool {
        self.agents.ensure_len(self.game.players().len());
        match self.game.play_round(&mut self.agents) {
            Ok(report) => {
                self.game.settle(&report);
                self.history_offset = 0;
                self.clear_round_error();
                true
            }
            Err(err) => {
                log::warn!("round {} failed: {err}", self.game.round());
                self.auto_play = false;
                self.round_error = Some(err.to_string());
                self.round_error_at = Some(Instant::now());
                false
            }
        }
    }

    /// Whether the last round finished cleanly.
    pub fn round_resolved(&self) -> bool {
        matches!(self.game.phase(), Phase::Resolved)
    }

    pub fn on_tick(&mut self) {
        if let Some(at) = self.round_error_at {
            if at.elapsed() >= Self::ROUND_ERROR_TTL {
                self.clear_round_error();
            }
        }
        if self.scene != Scene::Table || !self.auto_play {
            return;
        }
        if self.game.players().iter().all(|p| p.balance() <= 0) {
            self.auto_play = false;
            return;
        }
        let _ = self.play_round();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_round_ignored_in_menu() {
        let mut app = AppState::default();
        assert!(!app.handle_input(InputAction::PlayRound));
        assert_eq!(app.game.round(), 0);
    }

    #[test]
    fn auto_play_stops_when_everyone_is_broke() {
        let mut app = AppState::default();
        app.cfg_starting_balance = 0;
        app.apply_menu();
        let _ = app.handle_input(InputAction::ToggleAutoPlay);
        assert!(app.auto_play);
        app.on_tick();
        assert!(!app.auto_play);
        assert_eq!(app.game.round(), 0);
    }
}
