use blackjack_table::agents::{AgentTable, FixedStakeAgent};
use blackjack_table::deck::{DeckConfig, ShuffleMode};
use blackjack_table::game::{Game, GameError, Player, TableConfig};
use clap::Parser;

#[derive(Parser)]
#[command(name = "simulate", about = "Play blackjack rounds headlessly with reference players")]
struct Args {
    /// Rounds to play
    #[arg(long, default_value_t = 10)]
    rounds: u64,

    /// Seated players
    #[arg(long, default_value_t = 3)]
    players: usize,

    /// Starting balance for every player
    #[arg(long, default_value_t = 100)]
    balance: i64,

    /// Flat stake each player bets
    #[arg(long, default_value_t = 1)]
    stake: i64,

    /// Decks in the shoe
    #[arg(long, default_value_t = DeckConfig::DEFAULT_DECKS)]
    decks: usize,

    /// Reshuffle before a deal once fewer cards than this remain
    #[arg(long, default_value_t = DeckConfig::DEFAULT_RESHUFFLE_THRESHOLD)]
    threshold: usize,

    /// Seed the shoe for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Use the historical shuffle that leaves the last two cards in place
    #[arg(long)]
    legacy_shuffle: bool,

    /// Dealer stands on soft 17
    #[arg(long)]
    stand_soft_17: bool,

    /// Apply each round's results to the balances
    #[arg(long)]
    settle: bool,
}

impl Args {
    fn table_config(&self) -> TableConfig {
        let mut deck = DeckConfig::default()
            .with_decks(self.decks.max(1))
            .with_reshuffle_threshold(self.threshold);
        if self.legacy_shuffle {
            deck = deck.with_shuffle(ShuffleMode::Legacy);
        }
        if let Some(seed) = self.seed {
            deck = deck.with_seed(seed);
        }
        TableConfig::default().with_deck(deck).with_dealer_hits_soft_17(!self.stand_soft_17)
    }
}

fn main() -> Result<(), GameError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let players =
        (1..=args.players).map(|i| Player::new(format!("P{i}"), args.balance)).collect();
    let mut game = Game::new(args.table_config(), players);
    let mut agents = AgentTable::for_seats(args.players);
    for seat in 0..args.players {
        agents.set_agent(seat, Some(Box::new(FixedStakeAgent::new(args.stake, 16))));
    }
    log::info!("{} players, {} rounds, {:?}", args.players, args.rounds, game.config());

    for _ in 0..args.rounds {
        let report = match game.play_round(&mut agents) {
            Ok(report) => report,
            Err(err) => {
                log::error!("round {} failed: {err}", game.round());
                return Err(err);
            }
        };
        let dealer =
            report.dealer.as_ref().map_or_else(|| String::from("-"), |d| d.value.to_string());
        println!("round {:>4}  dealer {dealer:>2}  results {:?}", report.round, report.results);
        if args.settle {
            game.settle(&report);
        }
    }

    let deck = game.deck();
    println!(
        "shoe {}  discards {}  reshuffles {}",
        deck.len(),
        deck.discards().len(),
        deck.reshuffles()
    );
    for player in game.players() {
        println!("{:<4} {}", player.name(), player.balance());
    }
    Ok(())
}
