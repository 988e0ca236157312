//! Root layout widget - orchestrates main layout structure

use crate::app::state::AppState;
use crate::config::Config;
use crate::tui::theme::get_theme;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{lyrics, now_playing, truncate_str};

/// Main layout structure:
/// ┌────────────────────────────────────┐
/// │ Now Playing                        │
/// ├────────────────────────────────────┤
/// │                                    │
/// │              Lyrics                │
/// │                                    │
/// └────────────────────────────────────┘
///  q quit  r refetch            status
pub fn render(frame: &mut Frame, cfg: &Config, state: &AppState) {
    let root = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Now playing
            Constraint::Min(3),    // Lyrics
            Constraint::Length(1), // Key hints + status
        ])
        .split(root);

    now_playing::render(frame, state, rows[0]);
    lyrics::render(frame, cfg, state, rows[1]);
    render_footer(frame, state, rows[2]);
}

fn render_footer(frame: &mut Frame, state: &AppState, area: ratatui::layout::Rect) {
    let theme = get_theme();
    let hints = " q quit  r refetch  ";
    let width = (area.width as usize).saturating_sub(hints.len());
    let line = Line::from(vec![
        Span::styled(hints, Style::default().fg(theme.palette.fg_muted)),
        Span::styled(
            truncate_str(&state.status, width),
            Style::default().fg(theme.palette.fg_secondary),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
