//! LRC format parser
//!
//! Parses synchronized lyrics in LRC format:
//! [mm:ss.xx] Lyrics line here
//!
//! Example:
//! [00:12.34] Hello world
//! [00:15.500] Another line
//!
//! Only the first timestamp tag of a line is read; anything after its closing
//! bracket (including further tags) is the line text.

use regex::Regex;
use std::sync::LazyLock;

static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d{2}):(\d{2})\.(\d{1,3})\](.*)").expect("timestamp pattern is valid")
});

/// A single line of lyrics with timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricLine {
    /// Offset from the start of the track in milliseconds
    pub time_ms: u64,
    /// The lyrics text, never empty
    pub text: String,
}

impl LyricLine {
    pub fn new(time_ms: u64, text: impl Into<String>) -> Self {
        Self {
            time_ms,
            text: text.into(),
        }
    }
}

/// Parse LRC formatted lyrics into a time-ordered line sequence.
///
/// Never fails: lines without a timestamp, lines whose text is blank and lines
/// with unreadable numbers are skipped one by one.
pub fn parse(content: &str) -> Vec<LyricLine> {
    let mut lines: Vec<LyricLine> = content.lines().filter_map(parse_line).collect();

    // Stable, so equal timestamps keep their source order.
    lines.sort_by_key(|l| l.time_ms);
    lines
}

fn parse_line(line: &str) -> Option<LyricLine> {
    let caps = TIMESTAMP.captures(line)?;

    let text = caps[4].trim();
    if text.is_empty() {
        return None;
    }

    let min: u64 = caps[1].parse().ok()?;
    let sec: u64 = caps[2].parse().ok()?;
    let ms = parse_fraction(&caps[3])?;

    Some(LyricLine::new(min * 60_000 + sec * 1000 + ms, text))
}

/// "5" -> 500, "50" -> 500, "500" -> 500
fn parse_fraction(s: &str) -> Option<u64> {
    let padded: String = s.chars().chain(std::iter::repeat('0')).take(3).collect();
    padded.parse().ok()
}

/// Render an offset as `mm:ss.xx`.
pub fn format_timestamp(time_ms: u64) -> String {
    let min = time_ms / 60_000;
    let sec = (time_ms % 60_000) / 1000;
    let centis = (time_ms % 1000) / 10;
    format!("{:02}:{:02}.{:02}", min, sec, centis)
}
