//! Line-scripted media source
//!
//! One command per line:
//!
//! ```text
//! track Song Title | Artist Name
//! pos 1500
//! wait 250
//! end
//! ```
//!
//! `pos` is in milliseconds, `wait` pauses the script. Blank lines and lines
//! starting with `#` are ignored. End of input counts as `end`.

use super::{MediaSource, Subscription};
use crate::app::events::{Event, MediaEvent};
use crate::lyrics::TrackQuery;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Emit(MediaEvent),
    Wait(Duration),
}

pub struct ScriptSource<R> {
    reader: R,
}

impl<R> ScriptSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl ScriptSource<tokio::io::BufReader<tokio::io::Stdin>> {
    pub fn stdin() -> Self {
        Self::new(tokio::io::BufReader::new(tokio::io::stdin()))
    }
}

impl<R> MediaSource for ScriptSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    async fn subscribe(self, event_tx: mpsc::Sender<Event>) -> anyhow::Result<Subscription> {
        let task = tokio::spawn(run_script(self.reader, event_tx));
        Ok(Subscription::new(task))
    }
}

async fn run_script<R: AsyncBufRead + Unpin>(reader: R, event_tx: mpsc::Sender<Event>) {
    let mut lines = reader.lines();
    let mut line_no = 0usize;
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("script read failed: {e}");
                break;
            }
        };
        line_no += 1;
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(Command::Wait(d))) => tokio::time::sleep(d).await,
            Ok(Some(Command::Emit(MediaEvent::Ended))) => break,
            Ok(Some(Command::Emit(me))) => {
                if event_tx.send(Event::Media(me)).await.is_err() {
                    return;
                }
            }
            Err(e) => tracing::warn!(line = line_no, "skipping script line: {e}"),
        }
    }
    let _ = event_tx.send(Event::Media(MediaEvent::Ended)).await;
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let cmd = match verb {
        "track" => {
            let (title, artist) = rest.split_once('|').unwrap_or((rest, ""));
            let title = title.trim();
            if title.is_empty() {
                return Err("track needs a title".into());
            }
            Command::Emit(MediaEvent::TrackChanged(TrackQuery::new(title, artist.trim())))
        }
        "pos" => Command::Emit(MediaEvent::Position {
            position_ms: parse_millis(rest)?,
        }),
        "wait" => Command::Wait(Duration::from_millis(parse_millis(rest)?)),
        "end" => Command::Emit(MediaEvent::Ended),
        other => return Err(format!("unknown command {other:?}")),
    };
    Ok(Some(cmd))
}

fn parse_millis(s: &str) -> Result<u64, String> {
    s.parse().map_err(|_| format!("expected milliseconds, got {s:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_command("track Song Title | Some Artist"),
            Ok(Some(Command::Emit(MediaEvent::TrackChanged(TrackQuery::new(
                "Song Title",
                "Some Artist"
            )))))
        );
        assert_eq!(
            parse_command("track Instrumental"),
            Ok(Some(Command::Emit(MediaEvent::TrackChanged(TrackQuery::new(
                "Instrumental",
                ""
            )))))
        );
        assert_eq!(
            parse_command("  pos 1500 "),
            Ok(Some(Command::Emit(MediaEvent::Position { position_ms: 1500 })))
        );
        assert_eq!(
            parse_command("wait 20"),
            Ok(Some(Command::Wait(Duration::from_millis(20))))
        );
        assert_eq!(parse_command("end"), Ok(Some(Command::Emit(MediaEvent::Ended))));
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("# comment"), Ok(None));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("pos -5").is_err());
        assert!(parse_command("pos").is_err());
        assert!(parse_command("track | Artist").is_err());
        assert!(parse_command("seek 10").is_err());
    }

    #[tokio::test]
    async fn test_script_stream() {
        let script: &[u8] = b"track A | B\nbogus\npos 10\n\npos 20\nend\npos 30\n";
        let (tx, mut rx) = mpsc::channel(16);
        let _sub = ScriptSource::new(script).subscribe(tx).await.unwrap();

        let mut got = Vec::new();
        while let Some(Event::Media(me)) = rx.recv().await {
            let done = me == MediaEvent::Ended;
            got.push(me);
            if done {
                break;
            }
        }
        assert_eq!(
            got,
            vec![
                MediaEvent::TrackChanged(TrackQuery::new("A", "B")),
                MediaEvent::Position { position_ms: 10 },
                MediaEvent::Position { position_ms: 20 },
                MediaEvent::Ended,
            ]
        );
    }

    #[tokio::test]
    async fn test_eof_ends() {
        let (tx, mut rx) = mpsc::channel(4);
        let _sub = ScriptSource::new(&b"pos 5"[..]).subscribe(tx).await.unwrap();
        assert!(matches!(
            rx.recv().await,
            Some(Event::Media(MediaEvent::Position { position_ms: 5 }))
        ));
        assert!(matches!(rx.recv().await, Some(Event::Media(MediaEvent::Ended))));
    }
}
