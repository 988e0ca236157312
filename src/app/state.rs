use crate::lyrics::{SyncState, TrackQuery};

pub struct AppState {
    pub should_quit: bool,

    // Playback
    pub track: Option<TrackQuery>,

    // Lyrics
    pub sync: SyncState,
    pub lyrics_loading: bool,
    /// Bumped for every fetch; results tagged with an older value are stale.
    pub generation: u64,

    // Status message (for debugging/info)
    pub status: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            track: None,
            sync: SyncState::default(),
            lyrics_loading: false,
            generation: 0,
            status: String::new(),
        }
    }

    /// Text shown in place of lyrics when there are none to show.
    pub fn placeholder(&self) -> Option<&'static str> {
        if self.track.is_none() {
            Some("Waiting for playback")
        } else if self.lyrics_loading {
            Some("Loading lyrics...")
        } else if self.sync.is_empty() {
            Some("No lyrics")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::LyricLine;

    #[test]
    fn test_placeholder() {
        let mut s = AppState::new();
        assert_eq!(s.placeholder(), Some("Waiting for playback"));
        s.track = Some(TrackQuery::new("a", "b"));
        s.lyrics_loading = true;
        assert_eq!(s.placeholder(), Some("Loading lyrics..."));
        s.lyrics_loading = false;
        assert_eq!(s.placeholder(), Some("No lyrics"));
        s.sync.lines = vec![LyricLine::new(0, "x")];
        assert_eq!(s.placeholder(), None);
    }
}
