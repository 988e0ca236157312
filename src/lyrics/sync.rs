//! Playback-position driven line selection.

use super::LyricLine;

/// Where a line sits relative to the playback position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePhase {
    Past,
    Current,
    Upcoming,
}

impl LinePhase {
    pub fn of(index: usize, current: usize) -> Self {
        match index.cmp(&current) {
            std::cmp::Ordering::Less => LinePhase::Past,
            std::cmp::Ordering::Equal => LinePhase::Current,
            std::cmp::Ordering::Greater => LinePhase::Upcoming,
        }
    }
}

/// Index of the last line whose timestamp is not after `position_ms`.
///
/// Returns 0 when no line qualifies, including for an empty slice; callers
/// check for emptiness before indexing.
pub fn current_index(lines: &[LyricLine], position_ms: i64) -> usize {
    u64::try_from(position_ms).map_or(0, |pos| index_at(lines, pos))
}

fn index_at(lines: &[LyricLine], position_ms: u64) -> usize {
    lines
        .partition_point(|l| l.time_ms <= position_ms)
        .saturating_sub(1)
}

/// Lyrics plus the playback position they are synchronized against.
#[derive(Debug, Clone, Default)]
pub struct SyncState {
    pub lines: Vec<LyricLine>,
    pub position_ms: u64,
}

impl SyncState {
    pub fn new(lines: Vec<LyricLine>) -> Self {
        Self {
            lines,
            position_ms: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn current_index(&self) -> usize {
        index_at(&self.lines, self.position_ms)
    }

    pub fn current_line(&self) -> Option<&LyricLine> {
        self.lines.get(self.current_index())
    }

    /// Lines around the current one: up to `before` earlier and `after` later.
    pub fn window(&self, before: usize, after: usize) -> Vec<(&LyricLine, LinePhase)> {
        if self.lines.is_empty() {
            return Vec::new();
        }
        let current = self.current_index();
        let start = current.saturating_sub(before);
        let end = current.saturating_add(after).saturating_add(1).min(self.lines.len());
        self.lines[start..end]
            .iter()
            .enumerate()
            .map(|(offset, line)| (line, LinePhase::of(start + offset, current)))
            .collect()
    }
}
