use crate::deck::DeckConfig;
use crate::game::{Game, Player, TableConfig};

use super::AppState;

#[derive(Debug, Clone, Copy)]
enum MenuItem {
    Players,
    Decks,
    ReshuffleThreshold,
    StartingBalance,
    Stake,
    BotDifficulty,
    DealerSoft17,
}

const MENU_ITEMS: [MenuItem; 7] = [
    MenuItem::Players,
    MenuItem::Decks,
    MenuItem::ReshuffleThreshold,
    MenuItem::StartingBalance,
    MenuItem::Stake,
    MenuItem::BotDifficulty,
    MenuItem::DealerSoft17,
];

const MAX_SEATS: usize = 7;
const MAX_DECKS: usize = 8;

impl MenuItem {
    fn display(self, app: &AppState) -> String {
        match self {
            MenuItem::Players => format!("Players: {}", app.cfg_num_players),
            MenuItem::Decks => format!("Decks: {}", app.cfg_decks),
            MenuItem::ReshuffleThreshold => {
                format!("Reshuffle below: {} cards", app.cfg_reshuffle_threshold)
            }
            MenuItem::StartingBalance => format!("Starting Balance: ${}", app.cfg_starting_balance),
            MenuItem::Stake => format!("Stake: {}", app.cfg_stake),
            MenuItem::BotDifficulty => {
                format!("Bot Difficulty: {}", app.cfg_bot_difficulty.label())
            }
            MenuItem::DealerSoft17 => format!(
                "Dealer soft 17: {}",
                if app.cfg_dealer_hits_soft_17 { "hit" } else { "stand" }
            ),
        }
    }

    fn inc(self, app: &mut AppState) {
        match self {
            MenuItem::Players => {
                if app.cfg_num_players < MAX_SEATS {
                    app.cfg_num_players += 1;
                }
            }
            MenuItem::Decks => {
                if app.cfg_decks < MAX_DECKS {
                    app.cfg_decks += 1;
                }
            }
            MenuItem::ReshuffleThreshold => {
                app.cfg_reshuffle_threshold = (app.cfg_reshuffle_threshold + 5).min(52);
            }
            MenuItem::StartingBalance => {
                app.cfg_starting_balance = app.cfg_starting_balance.saturating_add(10);
            }
            MenuItem::Stake => {
                app.cfg_stake = app.cfg_stake.saturating_add(1);
            }
            MenuItem::BotDifficulty => {
                app.cfg_bot_difficulty = app.cfg_bot_difficulty.next();
            }
            MenuItem::DealerSoft17 => {
                app.cfg_dealer_hits_soft_17 = !app.cfg_dealer_hits_soft_17;
            }
        }
    }

    fn dec(self, app: &mut AppState) {
        match self {
            MenuItem::Players => {
                if app.cfg_num_players > 1 {
                    app.cfg_num_players -= 1;
                }
            }
            MenuItem::Decks => {
                if app.cfg_decks > 1 {
                    app.cfg_decks -= 1;
                }
            }
            MenuItem::ReshuffleThreshold => {
                app.cfg_reshuffle_threshold = app.cfg_reshuffle_threshold.saturating_sub(5);
            }
            MenuItem::StartingBalance => {
                app.cfg_starting_balance = (app.cfg_starting_balance - 10).max(0);
            }
            MenuItem::Stake => {
                if app.cfg_stake > 1 {
                    app.cfg_stake -= 1;
                }
            }
            MenuItem::BotDifficulty => {
                app.cfg_bot_difficulty = app.cfg_bot_difficulty.prev();
            }
            MenuItem::DealerSoft17 => {
                app.cfg_dealer_hits_soft_17 = !app.cfg_dealer_hits_soft_17;
            }
        }
    }
}

impl AppState {
    pub fn menu_items_display(&self) -> Vec<String> {
        MENU_ITEMS.iter().map(|item| item.display(self)).collect()
    }

    pub fn toggle_menu(&mut self) {
        self.close_help();
        self.close_history();
        self.scene = match self.scene {
            super::Scene::Menu => super::Scene::Table,
            _ => {
                self.open_menu();
                super::Scene::Menu
            }
        };
    }

    // --- Menu operations ---
    pub fn open_menu(&mut self) {
        self.close_help();
        self.close_history();
        self.auto_play = false;
        self.menu_index = 0;
        let config = self.game.config();
        self.cfg_num_players = self.game.players().len();
        self.cfg_decks = config.deck.decks;
        self.cfg_reshuffle_threshold = config.deck.reshuffle_threshold;
        self.cfg_dealer_hits_soft_17 = config.dealer_hits_soft_17;
        self.cfg_stake = self.stake;
        self.cfg_bot_difficulty = self.bot_difficulty;
        self.scene = super::Scene::Menu;
    }

    pub fn apply_menu(&mut self) {
        // Ensure invariants
        self.cfg_num_players = self.cfg_num_players.clamp(1, MAX_SEATS);
        self.cfg_decks = self.cfg_decks.clamp(1, MAX_DECKS);
        self.cfg_stake = self.cfg_stake.max(1);

        self.stake = self.cfg_stake;
        self.bot_difficulty = self.cfg_bot_difficulty;
        let deck = DeckConfig::default()
            .with_decks(self.cfg_decks)
            .with_reshuffle_threshold(self.cfg_reshuffle_threshold);
        let config = TableConfig::default()
            .with_deck(deck)
            .with_dealer_hits_soft_17(self.cfg_dealer_hits_soft_17);
        let players = (1..=self.cfg_num_players)
            .map(|i| Player::new(format!("P{i}"), self.cfg_starting_balance))
            .collect();
        self.game = Game::new(config, players);
        self.agents = Self::seat_agents(self.cfg_num_players, self.stake, self.bot_difficulty);
        self.auto_play = false;
        self.scene = super::Scene::Table;
    }

    pub fn cancel_menu(&mut self) {
        self.scene = super::Scene::Table;
    }

    pub fn menu_next(&mut self) {
        self.menu_index = (self.menu_index + 1) % MENU_ITEMS.len();
    }
    pub fn menu_prev(&mut self) {
        self.menu_index = (self.menu_index + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
    }
    pub fn menu_inc(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.inc(self);
    }
    pub fn menu_dec(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.dec(self);
    }
}
