use crate::game::{HandSnapshot, Phase, RoundReport};
use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, columns, inner};
use super::{card_span, render_card};

const CARD_WIDTH: u16 = 6;

pub(super) fn draw_table(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // header
            Constraint::Length(6), // dealer
            Constraint::Min(6),    // seats
            Constraint::Length(4), // status bar
        ])
        .split(f.area());

    draw_header(f, chunks[0], app);
    draw_dealer(f, chunks[1], app.last_report());
    draw_seats(f, chunks[2], app);
    draw_status(f, chunks[3], app);

    if app.help_open() {
        draw_help(f);
    } else if app.history_open() {
        draw_history(f, app);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &AppState) {
    let deck = app.game.deck();
    let config = app.game.config();
    let soft_17 = if config.dealer_hits_soft_17 { "hits" } else { "stands on" };
    let lines = vec![
        Line::from(format!(
            "Round {}  Phase: {}  Dealer {soft_17} soft 17",
            app.game.round(),
            phase_label(app.game.phase()),
        )),
        Line::from(format!(
            "Shoe: {}  Discards: {}  In play: {}  Reshuffles: {}  (reshuffle below {})",
            deck.len(),
            deck.discards().len(),
            deck.in_play(),
            deck.reshuffles(),
            config.deck.reshuffle_threshold,
        )),
    ];
    let header = Paragraph::new(lines)
        .block(Block::default().title("blackjack-table").borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_dealer(f: &mut Frame, area: Rect, report: Option<&RoundReport>) {
    let dealer = report.and_then(|r| r.dealer.as_ref());
    let title = match dealer {
        Some(hand) => format!("Dealer: {}", value_label(hand)),
        None => String::from("Dealer"),
    };
    let border = match dealer {
        Some(hand) if hand.is_bust() => Color::LightRed,
        _ => Color::Gray,
    };
    let block =
        Block::default().title(title).borders(Borders::ALL).border_style(Style::default().fg(border));
    f.render_widget(block, area);
    let cards = dealer.map(|h| h.cards.as_slice()).unwrap_or_default();
    render_card_row(f, inner(area), cards, Some(Color::Gray));
}

fn draw_seats(f: &mut Frame, area: Rect, app: &AppState) {
    let players = app.game.players();
    if players.is_empty() {
        return;
    }
    let report = app.last_report();
    let cols = columns(area, players.len());
    for (seat, player) in players.iter().enumerate() {
        let mut title = player.name().to_string();
        if let Some(label) = app.seat_label(seat) {
            title.push_str(&format!(" [{label}]"));
        }
        let hand = report.and_then(|r| r.hands.get(seat)).and_then(Option::as_ref);
        let bet = report.and_then(|r| r.bets.get(seat)).copied().unwrap_or(0);
        let result = report.and_then(|r| r.results.get(seat)).copied();

        let border = match hand {
            Some(h) if h.is_bust() => Color::LightRed,
            Some(_) => Color::Cyan,
            None => Color::DarkGray,
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));
        f.render_widget(block, cols[seat]);

        let seat_inner = inner(cols[seat]);
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(3)])
            .split(seat_inner);

        let dim = Style::default().add_modifier(Modifier::DIM);
        let mut lines = vec![Line::from(format!("Balance: ${}", player.balance()))];
        lines.push(if bet > 0 {
            Line::from(format!("Bet: {bet}"))
        } else {
            Line::from(Span::styled("Sitting out", dim))
        });
        lines.push(match hand {
            Some(h) => Line::from(format!("Hand: {}", value_label(h))),
            None => Line::from(vec![Span::raw("Hand: "), Span::styled("--", dim)]),
        });
        if let Some(delta) = result.filter(|_| hand.is_some()) {
            let style = if delta < 0 {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Green)
            };
            lines.push(Line::from(Span::styled(format!("Result: {delta:+}"), style)));
        }
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), split[0]);

        let cards = hand.map(|h| h.cards.as_slice()).unwrap_or_default();
        render_card_row(f, split[1], cards, Some(Color::Cyan));
    }
}

fn draw_status(f: &mut Frame, area: Rect, app: &AppState) {
    f.render_widget(Block::default().borders(Borders::ALL).title("Status"), area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(inner(area));

    let mut left = match app.last_report() {
        None => vec![Line::from("No round yet. Press Space to deal.")],
        Some(report) if !report.was_dealt() => {
            vec![Line::from(format!("Round {}: no one bet, nothing dealt.", report.round))]
        }
        Some(report) => {
            let busts = report.hands.iter().flatten().filter(|h| h.is_bust()).count();
            vec![Line::from(format!("Round {} resolved, {busts} bust(s).", report.round))]
        }
    };
    if app.auto_play {
        left.push(Line::from(Span::styled("Autoplay on", Style::default().fg(Color::Yellow))));
    }
    if let Some(err) = app.round_error() {
        left.push(Line::from(Span::styled(
            format!("Error: {err}"),
            Style::default().fg(Color::Red),
        )));
    }
    let right = vec![Line::from("Space deal • A autoplay"), Line::from("? help • H history • M menu")];
    f.render_widget(Paragraph::new(left).wrap(Wrap { trim: true }), cols[0]);
    f.render_widget(
        Paragraph::new(right).wrap(Wrap { trim: true }).alignment(Alignment::Right),
        cols[1],
    );
}

fn render_card_row(f: &mut Frame, area: Rect, cards: &[crate::cards::Card], border: Option<Color>) {
    if area.height < 3 {
        let spans: Vec<Span> = cards.iter().flat_map(|&c| [card_span(c), Span::raw(" ")]).collect();
        f.render_widget(Paragraph::new(Line::from(spans)), area);
        return;
    }
    let fit = usize::from(area.width / CARD_WIDTH);
    let constraints: Vec<Constraint> =
        (0..fit).map(|_| Constraint::Length(CARD_WIDTH)).chain([Constraint::Min(0)]).collect();
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(Rect { height: 3, ..area });
    for (slot, &card) in slots.iter().zip(cards.iter().take(fit)) {
        render_card(f, *slot, Some(card), border);
    }
}

fn value_label(hand: &HandSnapshot) -> String {
    if hand.is_bust() {
        format!("{} (bust)", hand.value)
    } else if hand.soft {
        format!("soft {}", hand.value)
    } else {
        hand.value.to_string()
    }
}

fn phase_label(phase: Phase) -> String {
    match phase {
        Phase::Idle => String::from("idle"),
        Phase::AcceptingBets => String::from("bets"),
        Phase::Dealing => String::from("dealing"),
        Phase::PlayerTurns(seat) => format!("P{} to act", seat + 1),
        Phase::DealerPlay => String::from("dealer"),
        Phase::Resolved => String::from("resolved"),
    }
}

fn draw_history(f: &mut Frame, app: &AppState) {
    let area = centered_rect(70, 80, f.area());
    let block = Block::default().title("History").borders(Borders::ALL);
    let entries = app.game.history_recent_offset(AppState::HISTORY_PAGE_SIZE, app.history_offset());
    let mut lines: Vec<Line> = if entries.is_empty() {
        vec![Line::from("No history yet.")]
    } else {
        entries.iter().map(|entry| Line::from(entry.to_string())).collect()
    };
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Up/Down scroll • Close: H or Esc",
        Style::default().add_modifier(Modifier::DIM),
    )));
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(70, 80, f.area());
    let block = Block::default().title("Help").borders(Borders::ALL);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("Table:", bold)),
        Line::from("- Space / Enter: play a round"),
        Line::from("- A: toggle autoplay"),
        Line::from("- H: history of the last round"),
        Line::from(""),
        Line::from(Span::styled("Rules:", bold)),
        Line::from("- Hit or stand only; double and split are refused"),
        Line::from("- A bust loses the stake, every other hand pushes"),
        Line::from("- The shoe is reshuffled before a deal once it runs low"),
        Line::from(""),
        Line::from(Span::styled("Menu:", bold)),
        Line::from("- M: open / close menu"),
        Line::from("- Up / Down: move selection"),
        Line::from("- + / -: adjust value"),
        Line::from("- Enter: apply and sit down"),
        Line::from("- Esc: cancel"),
        Line::from("- Q: quit (menu)"),
        Line::from(""),
        Line::from("Close help: ? or Esc"),
    ];
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}
