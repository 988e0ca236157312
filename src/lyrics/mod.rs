//! Lyrics module for fetching and synchronizing lyrics
//!
//! This module provides:
//! - QQ Music API client for fetching LRC lyrics
//! - LRC format parser for synchronized lyrics
//! - Position-based current line selection

pub mod fetcher;
pub mod parser;
pub mod qqmusic;
pub mod sync;

pub use fetcher::{LyricFetcher, LyricSource};
pub use parser::LyricLine;
pub use qqmusic::QqMusicClient;
pub use sync::{LinePhase, SyncState};

/// What to look lyrics up by: the track title and its artist.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackQuery {
    pub title: String,
    pub artist: String,
}

impl TrackQuery {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }

    /// Search keyword: title and artist separated by a single space.
    pub fn keyword(&self) -> String {
        format!("{} {}", self.title, self.artist)
    }

    /// Display form for status lines.
    pub fn label(&self) -> String {
        if self.artist.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.artist)
        }
    }
}
