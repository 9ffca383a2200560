use blackjack_table::agents::{
    AgentError, AgentKind, AgentTable, BotAgent, BotProfile, Difficulty, ScriptedAgent, TurnAction,
};
use blackjack_table::deck::DeckConfig;
use blackjack_table::game::{Game, GameError, Player, TableConfig};

#[test]
fn turn_actions_parse_from_text() {
    assert_eq!("hit".parse::<TurnAction>(), Ok(TurnAction::Hit));
    assert_eq!(" S ".parse::<TurnAction>(), Ok(TurnAction::Stand));
    assert_eq!("d".parse::<TurnAction>(), Ok(TurnAction::Double));
    assert_eq!("split".parse::<TurnAction>(), Ok(TurnAction::Split));
    assert_eq!(
        "surrender".parse::<TurnAction>(),
        Err(AgentError::InvalidTurnAction("surrender".into()))
    );
    assert!(!TurnAction::Double.is_supported());
}

#[test]
fn table_reports_seat_kinds() {
    let mut agents = AgentTable::for_seats(3);
    agents.set_agent(0, Some(Box::new(ScriptedAgent::new())));
    agents.set_agent(2, Some(Box::new(BotAgent::new(BotProfile::default().with_seed(1)))));
    assert_eq!(agents.agent_kind(0), Some(AgentKind::Scripted));
    assert_eq!(agents.agent_kind(1), None);
    assert_eq!(agents.agent_kind(2), Some(AgentKind::Bot));
    assert_eq!(format!("{agents:?}"), "AgentTable(S-B)");
    agents.clear();
    assert!(!agents.has_agent(0));
}

#[test]
fn empty_seat_fails_the_round() {
    let mut game = Game::with_players(2, 10);
    let mut agents = AgentTable::reference(2);
    agents.set_agent(1, None);
    assert_eq!(game.play_round(&mut agents), Err(GameError::MissingAgent { seat: 1 }));
    assert_eq!(game.deck().in_play(), 0);
}

#[test]
fn bots_play_many_rounds_without_losing_cards() {
    let config = TableConfig::default().with_deck(DeckConfig::default().with_seed(7).with_decks(2));
    let players = (1..=5).map(|i| Player::new(format!("P{i}"), 50)).collect();
    let mut game = Game::new(config, players);
    let mut agents = AgentTable::for_seats(5);
    let tiers = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
    for seat in 0..5 {
        let difficulty = tiers[seat % tiers.len()];
        let profile = BotProfile::for_difficulty(difficulty).with_stake(5).with_seed(seat as u64);
        agents.set_agent(seat, Some(Box::new(BotAgent::new(profile))));
    }

    for _ in 0..200 {
        let report = game.play_round(&mut agents).unwrap();
        for (bet, result) in report.bets.iter().zip(&report.results) {
            assert!(*result == 0 || *result == -bet);
        }
        game.settle(&report);
        assert!(game.players().iter().all(|p| p.balance() >= 0));
        assert_eq!(game.deck().in_play(), 0);
    }
    assert!(game.deck().reshuffles() > 1);
}
