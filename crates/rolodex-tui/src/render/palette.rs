//! Command palette overlay rendering.

use crate::app::{App, HitMap, HitTarget, Palette};
use crate::colors;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;

const LINK_SEPARATOR: &str = "  ·  ";
const PROMPT: &str = "› ";

/// Terminal columns taken by `text`.
fn display_width(text: &str) -> u16 {
    u16::try_from(text.width()).unwrap_or(u16::MAX)
}

/// Column of the caret, relative to the input area, after `query`.
fn cursor_offset(query: &str) -> u16 {
    display_width(PROMPT).saturating_add(display_width(query))
}

/// Render the palette centered over the host view and record its clickable
/// regions in `app.hits`.
// Terminal dimensions are u16, percentage calc uses f32
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn render_palette(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let width = (f32::from(size.width) * 0.6).min(80.0) as u16;
    let width = width.max(40).min(size.width);
    let height = 20.min(size.height.saturating_sub(2));
    let dialog = Rect {
        x: size.x + size.width.saturating_sub(width) / 2,
        y: size.y + size.height.saturating_sub(height) / 3,
        width,
        height,
    };

    f.render_widget(Clear, dialog);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(" Search ")
        .style(Style::default().bg(colors::SURFACE))
        .border_style(Style::default().fg(colors::PRIMARY));
    let inner = block.inner(dialog);
    f.render_widget(block, dialog);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let mut hits = HitMap {
        palette: Some(dialog),
        targets: Vec::new(),
    };

    render_input(f, &app.palette, chunks[0]);
    render_body(f, &app.palette, chunks[2], &mut hits);
    render_links(f, &app.palette, chunks[3], &mut hits);

    let help = Paragraph::new(Line::from(Span::styled(
        "↑↓ move  Enter open  Esc close",
        Style::default().fg(colors::OUTLINE),
    )));
    f.render_widget(help, chunks[4]);

    app.hits = hits;
}

fn render_input(f: &mut Frame, palette: &Palette, area: Rect) {
    let query = palette.query();
    let text = if query.is_empty() {
        Span::styled(
            "Search leads, deals, clients, invoices...",
            Style::default().fg(colors::OUTLINE),
        )
    } else {
        Span::styled(query, Style::default().fg(colors::ON_SURFACE))
    };
    let prompt = Span::styled(PROMPT, Style::default().fg(colors::PRIMARY));
    f.render_widget(Paragraph::new(Line::from(vec![prompt, text])), area);

    let offset = cursor_offset(query);
    f.set_cursor_position((area.x + offset.min(area.width.saturating_sub(1)), area.y));
}

fn message(text: impl Into<String>, style: Style) -> Vec<(Line<'static>, Option<HitTarget>)> {
    vec![(Line::from(Span::styled(text.into(), style)), None)]
}

fn body_lines(palette: &Palette) -> (Vec<(Line<'static>, Option<HitTarget>)>, Option<usize>) {
    let state = palette.state();
    let muted = Style::default().fg(colors::OUTLINE);

    if palette.query().is_empty() {
        if palette.recent().is_empty() {
            return (message("No recent searches", muted), None);
        }
        let mut lines = vec![(
            Line::from(Span::styled(
                "Recent searches",
                Style::default()
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )),
            None,
        )];
        for (index, entry) in palette.recent().iter().enumerate() {
            lines.push((
                Line::from(Span::styled(
                    format!("  {entry}"),
                    Style::default().fg(colors::SUBTEXT),
                )),
                Some(HitTarget::Recent(index)),
            ));
        }
        return (lines, None);
    }

    if !palette.is_searchable() {
        return (
            message(
                format!("Type at least {} characters", palette.min_query_chars()),
                muted,
            ),
            None,
        );
    }

    if let Some(error) = &state.error {
        let mut lines = message(
            "Couldn't complete search",
            Style::default()
                .fg(colors::ERROR)
                .add_modifier(Modifier::BOLD),
        );
        lines.extend(message(error.clone(), Style::default().fg(colors::SUBTEXT)));
        return (lines, None);
    }

    let flat = palette.flat();
    if flat.is_empty() {
        return if state.is_loading || palette.is_pending() {
            (message("Searching...", Style::default().fg(colors::WARNING)), None)
        } else {
            (message(format!("No results for \"{}\"", palette.query()), muted), None)
        };
    }

    let selected = palette.selected();
    let mut selected_line = None;
    let mut lines = Vec::with_capacity(flat.len() + flat.sections().len());

    for section in flat.sections() {
        let info = section.category.info();
        lines.push((
            Line::from(Span::styled(
                format!("{} {}", info.icon, info.label),
                Style::default()
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )),
            None,
        ));

        for index in section.start..section.start + section.len {
            let Some(record) = flat.get(index) else {
                continue;
            };
            let is_selected = selected == Some(index);
            if is_selected {
                selected_line = Some(lines.len());
            }

            let row_style = if is_selected {
                Style::default().bg(colors::SURFACE_HIGH)
            } else {
                Style::default()
            };
            let marker = if is_selected { "› " } else { "  " };

            let mut spans = vec![
                Span::styled(marker, row_style.fg(colors::PRIMARY)),
                Span::styled(
                    record.title.clone(),
                    row_style.fg(colors::ON_SURFACE).add_modifier(if is_selected {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    }),
                ),
            ];
            if let Some(subtitle) = &record.subtitle {
                spans.push(Span::styled(
                    format!("  {subtitle}"),
                    row_style.fg(colors::SUBTEXT),
                ));
            }
            lines.push((Line::from(spans).style(row_style), Some(HitTarget::Result(index))));
        }
    }

    (lines, selected_line)
}

#[allow(clippy::cast_possible_truncation)]
fn render_body(f: &mut Frame, palette: &Palette, area: Rect, hits: &mut HitMap) {
    let (lines, selected_line) = body_lines(palette);

    let visible = usize::from(area.height);
    let offset = match selected_line {
        Some(line) if line >= visible => line + 1 - visible,
        _ => 0,
    };

    let mut rendered = Vec::with_capacity(visible);
    for (row, (line, target)) in lines.into_iter().skip(offset).take(visible).enumerate() {
        if let Some(target) = target {
            hits.targets.push((
                Rect::new(area.x, area.y + row as u16, area.width, 1),
                target,
            ));
        }
        rendered.push(line);
    }

    f.render_widget(Paragraph::new(rendered), area);
}

fn render_links(f: &mut Frame, palette: &Palette, area: Rect, hits: &mut HitMap) {
    let links = palette.view_all_links();
    if links.is_empty() {
        let status = if palette.state().is_loading || palette.is_pending() {
            Span::styled("Searching...", Style::default().fg(colors::WARNING))
        } else {
            Span::raw("")
        };
        f.render_widget(Paragraph::new(Line::from(status)), area);
        return;
    }

    let mut spans = Vec::new();
    let mut x = area.x;
    for (index, link) in links.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(LINK_SEPARATOR, Style::default().fg(colors::OUTLINE)));
            x = x.saturating_add(display_width(LINK_SEPARATOR));
        }
        let link_width = display_width(&link.label);
        let right = area.x.saturating_add(area.width);
        if x < right {
            hits.targets.push((
                Rect::new(x, area.y, link_width.min(right - x), 1),
                HitTarget::ViewAll(index),
            ));
        }
        spans.push(Span::styled(
            link.label.clone(),
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::UNDERLINED),
        ));
        x = x.saturating_add(link_width);
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
