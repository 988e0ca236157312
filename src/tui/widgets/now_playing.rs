//! Now Playing widget - track, artist and playback position

use crate::app::state::AppState;
use crate::tui::theme::get_theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::truncate_str;

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border))
        .title(" Now Playing ")
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

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Track title
            Constraint::Length(1), // Artist
            Constraint::Length(1), // Position
        ])
        .split(padded);

    let content_width = padded.width as usize;

    let (title, artist) = match &state.track {
        Some(t) => (t.title.as_str(), t.artist.as_str()),
        None => ("Not playing", ""),
    };
    let title_line = Line::from(Span::styled(
        truncate_str(title, content_width),
        Style::default()
            .fg(theme.palette.fg_primary)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(title_line), rows[0]);

    let artist_line = Line::from(Span::styled(
        truncate_str(artist, content_width),
        Style::default().fg(theme.palette.fg_secondary),
    ));
    frame.render_widget(Paragraph::new(artist_line), rows[1]);

    if state.track.is_some() {
        let pos_secs = state.sync.position_ms / 1000;
        let position = Line::from(Span::styled(
            format!("{:02}:{:02}", pos_secs / 60, pos_secs % 60),
            Style::default().fg(theme.palette.fg_muted),
        ));
        frame.render_widget(Paragraph::new(position), rows[2]);
    }
}
