//! blackjack-table: a single-deck blackjack rules engine
//!
//! Goals:
//! - A shoe that conserves every card: dealt cards come back through the discard pile
//! - Hand scoring with flexible aces (11 until that would bust, then 1)
//! - A round controller that drives pluggable [`agents::PlayerAgent`]s through
//!   bets, hit/stand turns and the dealer's fixed drawing rule
//! - No panics for invalid input; use `Result` for recoverable errors
//!
//! ## Quick start: play a round
//! ```
//! use blackjack_table::agents::AgentTable;
//! use blackjack_table::game::Game;
//!
//! let mut game = Game::with_players(3, 100);
//! let mut agents = AgentTable::reference(3);
//! let report = game.play_round(&mut agents).unwrap();
//! assert_eq!(report.results.len(), 3);
//! // hands are back in the discard pile once the round is over
//! assert_eq!(game.deck().in_play(), 0);
//! game.settle(&report);
//! ```
//!
//! ## Scoring a hand
//! ```
//! use blackjack_table::hand::Hand;
//!
//! let hand: Hand = "Ah 6c".parse().unwrap();
//! assert_eq!(hand.value(), 17);
//! assert!(hand.is_soft());
//! ```
//!
//! ## Binaries
//! ```sh
//! cargo run --bin blackjack            # interactive TUI
//! cargo run --bin simulate -- --rounds 100 --seed 7
//! ```

pub mod agents;
pub mod cards;
pub mod deck;
pub mod game;
pub mod hand;
pub mod tui;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
