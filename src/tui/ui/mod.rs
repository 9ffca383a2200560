mod layout;
mod menu;
mod table;

use crate::cards::Card;
use crate::tui::app::{AppState, Scene};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

pub fn draw(f: &mut Frame, app: &AppState) {
    match app.scene {
        Scene::Menu => menu::draw_menu(f, app),
        Scene::Table => table::draw_table(f, app),
    }
}

fn card_span(card: Card) -> Span<'static> {
    let color = if card.suit().is_red() { Color::Red } else { Color::White };
    Span::styled(card.to_string(), Style::default().fg(color))
}

/// A boxed card; `None` renders face down.
fn render_card(f: &mut Frame, area: Rect, card: Option<Card>, border: Option<Color>) {
    let mut block = Block::default().borders(Borders::ALL);
    if let Some(color) = border {
        block = block.border_style(Style::default().fg(color));
    }
    let content = match card {
        Some(c) => Line::from(card_span(c)),
        None => Line::from(Span::styled("##", Style::default().fg(Color::Blue))),
    };
    f.render_widget(Paragraph::new(content).alignment(Alignment::Center).block(block), area);
}
