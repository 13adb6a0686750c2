//! Host view: the "application" the palette is embedded in.

use crate::app::App;
use crate::colors;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

pub fn render_home(f: &mut Frame, app: &App) {
    let bg_block = Block::default().style(Style::default().bg(colors::BG));
    f.render_widget(bg_block, f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    let page = app.router.current().unwrap_or("/");
    let header = Paragraph::new(Line::from(vec![
        Span::styled("Page ", Style::default().fg(colors::SUBTEXT)),
        Span::styled(
            page,
            Style::default()
                .fg(colors::ON_SURFACE)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Rolodex ")
            .style(Style::default().bg(colors::SURFACE))
            .border_style(Style::default().fg(colors::OUTLINE)),
    );
    f.render_widget(header, chunks[0]);

    let history: Vec<ListItem> = if app.router.history().is_empty() {
        vec![ListItem::new(Span::styled(
            "Nothing opened yet. Press Ctrl+K to search.",
            Style::default().fg(colors::OUTLINE),
        ))]
    } else {
        app.router
            .history()
            .iter()
            .rev()
            .map(|target| {
                ListItem::new(Line::from(vec![
                    Span::styled("  ", Style::default()),
                    Span::styled(target.as_str(), Style::default().fg(colors::ON_SURFACE)),
                    Span::styled(
                        format!("  {}", app.router.url_for(target)),
                        Style::default().fg(colors::OUTLINE),
                    ),
                ]))
            })
            .collect()
    };
    let history_list = List::new(history).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" History ({}) ", app.router.history().len()))
            .style(Style::default().bg(colors::SURFACE))
            .border_style(Style::default().fg(colors::OUTLINE)),
    );
    f.render_widget(history_list, chunks[1]);

    let status = match &app.status_message {
        Some(message) => Span::styled(message.as_str(), Style::default().fg(colors::SUCCESS)),
        None => Span::styled(
            format!("Searching {}", app.backend_label),
            Style::default().fg(colors::SUBTEXT),
        ),
    };
    let help = Paragraph::new(Line::from(vec![
        status,
        Span::styled(
            "   Ctrl+K search  q quit",
            Style::default().fg(colors::OUTLINE),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .style(Style::default().bg(colors::SURFACE))
            .border_style(Style::default().fg(colors::OUTLINE)),
    );
    f.render_widget(help, chunks[2]);
}
