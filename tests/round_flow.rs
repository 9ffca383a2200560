use blackjack_table::agents::{AgentTable, PlayerAgent, ScriptedAgent, TurnAction};
use blackjack_table::cards::{parse_cards, Card};
use blackjack_table::deck::{Deck, DeckConfig};
use blackjack_table::game::{Game, HistoryVerb, Phase, Player, TableConfig};

fn stacked(cards: &str, players: usize, config: TableConfig) -> Game {
    let deck = Deck::stacked(parse_cards(cards).unwrap());
    let players = (1..=players).map(|i| Player::new(format!("P{i}"), 10)).collect();
    Game::with_deck(config, deck, players)
}

fn standing(bet: i64) -> Box<dyn PlayerAgent> {
    Box::new(ScriptedAgent::new().with_bets([bet]).with_actions([TurnAction::Stand]))
}

fn cards(s: &str) -> Vec<Card> {
    parse_cards(s).unwrap()
}

#[test]
fn nineteen_stands_and_pushes() {
    let mut game = stacked("10h 9c 10d 7s", 1, TableConfig::default());
    let report = game.play_round(&mut AgentTable::reference(1)).unwrap();
    assert_eq!(report.bets, vec![1]);
    assert_eq!(report.results, vec![0]);
    assert_eq!(report.hands[0].as_ref().unwrap().value, 19);
    assert_eq!(report.dealer.as_ref().unwrap().value, 17);
    assert_eq!(game.phase(), Phase::Resolved);
}

#[test]
fn sixteen_hits_and_busts() {
    let mut game = stacked("10h 6c 10d 7s Kc", 1, TableConfig::default());
    let report = game.play_round(&mut AgentTable::reference(1)).unwrap();
    assert_eq!(report.results, vec![-1]);
    let hand = report.hands[0].as_ref().unwrap();
    assert_eq!(hand.cards, cards("10h 6c Kc"));
    assert!(hand.is_bust());
    // the round never touches balances on its own
    assert_eq!(game.players()[0].balance(), 10);
}

#[test]
fn no_bets_means_no_deal() {
    let mut game = stacked("10h 9c 10d 7s", 2, TableConfig::default());
    let mut agents = AgentTable::for_seats(2);
    agents.set_agent(0, Some(standing(0)));
    agents.set_agent(1, Some(standing(0)));
    let report = game.play_round(&mut agents).unwrap();
    assert_eq!(report.results, vec![0, 0]);
    assert!(report.hands.iter().all(Option::is_none));
    assert!(!report.was_dealt());
    assert_eq!(game.deck().len(), 4);
    let verbs: Vec<_> = game.history_recent(10).into_iter().map(|e| e.verb).collect();
    assert_eq!(verbs, vec![HistoryVerb::SitOut, HistoryVerb::SitOut, HistoryVerb::NoBets]);
}

#[test]
fn deal_order_is_two_cards_per_bettor_then_dealer() {
    let mut game = stacked("2h 3h 4h 5h 6h 7h 8h", 3, TableConfig::default());
    let mut agents = AgentTable::for_seats(3);
    agents.set_agent(0, Some(standing(1)));
    agents.set_agent(1, Some(standing(0)));
    agents.set_agent(2, Some(standing(2)));
    let report = game.play_round(&mut agents).unwrap();

    assert_eq!(report.hands[0].as_ref().unwrap().cards, cards("2h 3h"));
    assert!(report.hands[1].is_none());
    assert_eq!(report.hands[2].as_ref().unwrap().cards, cards("4h 5h"));
    let dealer = report.dealer.unwrap();
    assert_eq!(dealer.cards, cards("6h 7h 8h"));
    assert_eq!(dealer.value, 21);
    assert_eq!(report.results, vec![0, 0, 0]);
}

#[test]
fn dealer_hits_soft_seventeen_when_configured() {
    let deal = "10h 7c Ah 6d 2s";
    let mut game = stacked(deal, 1, TableConfig::default());
    let report = game.play_round(&mut AgentTable::reference(1)).unwrap();
    let dealer = report.dealer.unwrap();
    assert_eq!(dealer.cards, cards("Ah 6d 2s"));
    assert_eq!(dealer.value, 19);

    let mut game = stacked(deal, 1, TableConfig::default().with_dealer_hits_soft_17(false));
    let report = game.play_round(&mut AgentTable::reference(1)).unwrap();
    let dealer = report.dealer.unwrap();
    assert_eq!(dealer.cards, cards("Ah 6d"));
    assert!(dealer.soft);
}

#[test]
fn dealer_busts_without_paying_anyone() {
    let mut game = stacked("10h 8c 10d 6s Kc", 1, TableConfig::default());
    let report = game.play_round(&mut AgentTable::reference(1)).unwrap();
    assert!(report.dealer.as_ref().unwrap().is_bust());
    assert_eq!(report.results, vec![0]);
    let last = game.history_recent(1);
    assert_eq!(last[0].verb, HistoryVerb::DealerStand);
    assert_eq!(last[0].value, Some(26));
}

#[test]
fn settle_is_left_to_the_host() {
    let mut game = stacked("10h 6c 10d 7s Kc", 2, TableConfig::default());
    let mut agents = AgentTable::for_seats(2);
    let hitter = ScriptedAgent::new().with_bets([3]).with_actions([TurnAction::Hit]);
    agents.set_agent(0, Some(Box::new(hitter)));
    agents.set_agent(1, Some(standing(0)));
    let report = game.play_round(&mut agents).unwrap();
    assert_eq!(report.results, vec![-3, 0]);
    assert_eq!(game.players()[0].balance(), 10);
    game.settle(&report);
    assert_eq!(game.players()[0].balance(), 7);
    assert_eq!(game.players()[1].balance(), 10);
}

#[test]
fn hands_return_to_the_discard_pile() {
    let mut game = stacked("10h 9c 10d 7s", 1, TableConfig::default());
    game.play_round(&mut AgentTable::reference(1)).unwrap();
    let deck = game.deck();
    assert_eq!(deck.in_play(), 0);
    assert_eq!(deck.len(), 0);
    assert_eq!(deck.discards().len(), 4);
}

#[test]
fn low_shoe_is_reshuffled_before_the_deal() {
    let config = TableConfig::default()
        .with_deck(DeckConfig::default().with_seed(42).with_reshuffle_threshold(15));
    let players = (1..=3).map(|i| Player::new(format!("P{i}"), 1_000)).collect();
    let mut game = Game::new(config, players);
    let mut agents = AgentTable::reference(3);

    let mut saw_reshuffle = false;
    for _ in 0..40 {
        let before = game.deck().len();
        game.play_round(&mut agents).unwrap();
        let shuffled = game
            .history_recent(game.history_len())
            .iter()
            .any(|e| e.verb == HistoryVerb::Shuffle);
        assert_eq!(shuffled, before < 15, "shoe had {before} cards before the deal");
        saw_reshuffle |= shuffled;

        let deck = game.deck();
        assert_eq!(deck.in_play(), 0);
        assert_eq!(deck.len() + deck.discards().len(), 52);
    }
    assert!(saw_reshuffle);
}
