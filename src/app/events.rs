use crate::lyrics::{LyricLine, TrackQuery};

#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    Media(MediaEvent),
    Lyrics(LyricsEvent),
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(crossterm::event::KeyEvent),
    Resize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEvent {
    TrackChanged(TrackQuery),
    Position { position_ms: u64 },
    /// The source has nothing more to say (player quit, script ended).
    Ended,
}

#[derive(Debug, Clone)]
pub enum LyricsEvent {
    /// Result of one fetch cycle; empty when no lyrics were found.
    Loaded { generation: u64, lines: Vec<LyricLine> },
}
