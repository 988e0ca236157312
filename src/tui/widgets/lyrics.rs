//! Lyrics panel - current line centered, sung lines dimmed

use crate::app::state::AppState;
use crate::config::Config;
use crate::lyrics::LinePhase;
use crate::tui::theme::{Theme, get_theme};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::truncate_str;

pub fn render(frame: &mut Frame, cfg: &Config, state: &AppState, area: Rect) {
    let theme = get_theme();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border))
        .title(" Lyrics ")
        .title_style(Style::default().fg(theme.palette.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Add horizontal padding
    let padded = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(1), // Left padding
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Right padding
        ])
        .split(inner)[1];

    let height = padded.height as usize;
    let middle = height.saturating_sub(1) / 2;

    if let Some(text) = state.placeholder() {
        let mut lines = vec![Line::default(); middle];
        lines.push(Line::from(Span::styled(
            text,
            Style::default().fg(theme.palette.fg_muted),
        )));
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), padded);
        return;
    }

    // Never ask for more context than fits around the middle row.
    let context = cfg.ui.context_lines.min(middle);
    let window = state.sync.window(context, context);
    let before = window
        .iter()
        .position(|(_, phase)| *phase == LinePhase::Current)
        .unwrap_or(0);

    let max_width = padded.width as usize;
    let mut lines: Vec<Line> = vec![Line::default(); middle.saturating_sub(before)];
    lines.extend(window.into_iter().map(|(line, phase)| {
        Line::from(Span::styled(
            truncate_str(&line.text, max_width),
            phase_style(&theme, phase),
        ))
    }));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), padded);
}

fn phase_style(theme: &Theme, phase: LinePhase) -> Style {
    match phase {
        LinePhase::Current => Style::default()
            .fg(theme.palette.accent)
            .add_modifier(Modifier::BOLD),
        LinePhase::Past => Style::default().fg(theme.palette.fg_muted),
        LinePhase::Upcoming => Style::default().fg(theme.palette.fg_secondary),
    }
}
