pub mod actions;
pub mod events;
pub mod state;

use crate::config::Config;
use crate::input;
use crate::lyrics::{parser, LyricFetcher, LyricSource, SyncState};
use crate::media::{MediaSource, Subscription};
use crate::tui::{self, TuiTerminal};
use actions::Action;
use anyhow::Context;
use events::{Event, LyricsEvent, MediaEvent};
use state::AppState;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct App<S> {
    cfg: Config,
    state: AppState,
    fetcher: Arc<LyricFetcher<S>>,
    fetch_task: Option<JoinHandle<()>>,
}

impl<S: LyricSource + 'static> App<S> {
    pub fn new(cfg: Config, fetcher: LyricFetcher<S>) -> Self {
        Self {
            cfg,
            state: AppState::new(),
            fetcher: Arc::new(fetcher),
            fetch_task: None,
        }
    }

    /// Interactive lyrics panel.
    pub async fn run(
        &mut self,
        terminal: &mut TuiTerminal,
        source: impl MediaSource,
    ) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<Event>(256);

        input::spawn_input_task(tx.clone());

        // Keep the panel up without a player; it just never gets events.
        let subscription: Option<Subscription> = match source.subscribe(tx.clone()).await {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!("media source unavailable: {e:#}");
                self.state.status = format!("Media source unavailable: {e:#}");
                None
            }
        };

        tui::draw(terminal, &self.cfg, &self.state)?;

        while let Some(ev) = rx.recv().await {
            match ev {
                Event::Input(input_ev) => {
                    if let Some(action) = input::map_input_to_action(input_ev) {
                        self.handle_action(action, &tx);
                    }
                }
                Event::Media(me) => {
                    self.handle_media(me, &tx);
                }
                Event::Lyrics(le) => {
                    self.handle_lyrics(le);
                }
            }

            if self.state.should_quit {
                break;
            }

            tui::draw(terminal, &self.cfg, &self.state)?;
        }

        if let Some(s) = subscription {
            s.unsubscribe();
        }
        self.shutdown();
        Ok(())
    }

    /// Headless mode: print the track and every new current line to `out`.
    pub async fn follow(&mut self, source: impl MediaSource, out: &mut impl Write) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<Event>(256);
        let subscription = source
            .subscribe(tx.clone())
            .await
            .context("subscribe to media source")?;

        let mut printed: Option<(u64, usize)> = None;
        while let Some(ev) = rx.recv().await {
            match ev {
                Event::Media(MediaEvent::Ended) => break,
                Event::Media(me) => {
                    if self.handle_media(me, &tx)
                        && let Some(track) = &self.state.track
                    {
                        writeln!(out, "♪ {}", track.label())?;
                    }
                }
                Event::Lyrics(le) => {
                    if self.handle_lyrics(le) && self.state.sync.is_empty() {
                        writeln!(out, "(no lyrics)")?;
                    }
                }
                Event::Input(_) => {}
            }

            if let Some(line) = self.state.sync.current_line() {
                let key = (self.state.generation, self.state.sync.current_index());
                if printed != Some(key) {
                    writeln!(out, "[{}] {}", parser::format_timestamp(line.time_ms), line.text)?;
                    out.flush()?;
                    printed = Some(key);
                }
            }
        }

        subscription.unsubscribe();
        self.shutdown();
        Ok(())
    }

    fn handle_action(&mut self, action: Action, tx: &mpsc::Sender<Event>) {
        match action {
            Action::Quit => self.state.should_quit = true,
            Action::Refetch => self.spawn_fetch(tx),
            Action::Resize => {}
        }
    }

    /// Returns true when the event switched to a new track.
    fn handle_media(&mut self, ev: MediaEvent, tx: &mpsc::Sender<Event>) -> bool {
        match ev {
            MediaEvent::TrackChanged(query) => {
                if self.state.track.as_ref() == Some(&query) {
                    return false;
                }
                tracing::info!(track = %query.label(), "track changed");
                self.state.status = format!("Playing {}", query.label());
                self.state.track = Some(query);
                self.state.sync = SyncState::default();
                self.spawn_fetch(tx);
                true
            }
            MediaEvent::Position { position_ms } => {
                self.state.sync.position_ms = position_ms;
                false
            }
            MediaEvent::Ended => {
                self.state.status = "Media source closed".into();
                false
            }
        }
    }

    /// Returns true when the result was for the latest fetch and got applied.
    fn handle_lyrics(&mut self, ev: LyricsEvent) -> bool {
        match ev {
            LyricsEvent::Loaded { generation, lines } => {
                if generation != self.state.generation {
                    tracing::debug!(generation, latest = self.state.generation, "dropping stale lyrics");
                    return false;
                }
                tracing::info!(count = lines.len(), "lyrics loaded");
                self.state.sync.lines = lines;
                self.state.lyrics_loading = false;
                self.fetch_task = None;
                true
            }
        }
    }

    fn spawn_fetch(&mut self, tx: &mpsc::Sender<Event>) {
        let Some(track) = self.state.track.clone() else {
            return;
        };

        // A superseded fetch would be discarded on arrival anyway.
        if let Some(task) = self.fetch_task.take() {
            task.abort();
        }

        self.state.generation += 1;
        self.state.lyrics_loading = true;
        self.state.sync.lines.clear();

        let generation = self.state.generation;
        let fetcher = Arc::clone(&self.fetcher);
        let tx = tx.clone();
        self.fetch_task = Some(tokio::spawn(async move {
            // A panicking fetch still reports back, as an empty result.
            let work = tokio::spawn(async move { fetcher.fetch_lyrics(&track.title, &track.artist).await });
            let _abort = AbortOnDrop(work.abort_handle());
            let lines = match work.await {
                Ok(lines) => lines,
                Err(e) => {
                    tracing::warn!("lyrics fetch task failed: {e}");
                    Vec::new()
                }
            };
            let _ = tx
                .send(Event::Lyrics(LyricsEvent::Loaded { generation, lines }))
                .await;
        }));
    }
}

/// Aborts the inner fetch when the outer task is aborted.
struct AbortOnDrop(tokio::task::AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl<S> App<S> {
    /// Abandon any in-flight fetch.
    fn shutdown(&mut self) {
        if let Some(task) = self.fetch_task.take() {
            task.abort();
        }
    }
}

impl<S> Drop for App<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::fetcher::tests::{FakeSource, SEARCH_ABC, Step};
    use crate::lyrics::{LyricLine, TrackQuery};
    use crate::media::ScriptSource;

    const LYRIC: &str = r#"{"code":0,"lyric":"[00:00.00]Line One\n[00:05.50]Line Two"}"#;

    fn app(search: Step, lyric: Step) -> App<FakeSource> {
        App::new(Config::default(), LyricFetcher::new(FakeSource::new(search, lyric)))
    }

    fn track(title: &str) -> MediaEvent {
        MediaEvent::TrackChanged(TrackQuery::new(title, "Artist"))
    }

    #[tokio::test]
    async fn test_stale_results_discarded() {
        let mut app = app(Step::Json(SEARCH_ABC), Step::Json(LYRIC));
        let (tx, _rx) = mpsc::channel(8);

        assert!(app.handle_media(track("First"), &tx));
        assert!(app.handle_media(track("Second"), &tx));
        assert_eq!(app.state.generation, 2);

        let stale = vec![LyricLine::new(0, "first track")];
        assert!(!app.handle_lyrics(LyricsEvent::Loaded { generation: 1, lines: stale }));
        assert!(app.state.sync.is_empty());
        assert!(app.state.lyrics_loading);

        let fresh = vec![LyricLine::new(0, "second track")];
        assert!(app.handle_lyrics(LyricsEvent::Loaded { generation: 2, lines: fresh.clone() }));
        assert_eq!(app.state.sync.lines, fresh);
        assert!(!app.state.lyrics_loading);
    }

    #[tokio::test]
    async fn test_same_track_does_not_refetch() {
        let mut app = app(Step::Json(SEARCH_ABC), Step::Json(LYRIC));
        let (tx, _rx) = mpsc::channel(8);

        assert!(app.handle_media(track("Song"), &tx));
        assert!(!app.handle_media(track("Song"), &tx));
        assert_eq!(app.state.generation, 1);
    }

    #[tokio::test]
    async fn test_fetch_result_flows_back() {
        let mut app = app(Step::Json(SEARCH_ABC), Step::Json(LYRIC));
        let (tx, mut rx) = mpsc::channel(8);

        app.handle_media(track("Song"), &tx);
        app.handle_media(MediaEvent::Position { position_ms: 6000 }, &tx);

        match rx.recv().await {
            Some(Event::Lyrics(le)) => assert!(app.handle_lyrics(le)),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(app.state.sync.current_index(), 1);
        assert_eq!(app.state.placeholder(), None);
    }

    #[tokio::test]
    async fn test_failed_fetch_and_refetch() {
        let mut app = app(Step::Timeout, Step::Timeout);
        let (tx, mut rx) = mpsc::channel(8);

        app.handle_action(Action::Refetch, &tx);
        assert_eq!(app.state.generation, 0, "no track, nothing to fetch");

        app.handle_media(track("Song"), &tx);
        let Some(Event::Lyrics(le)) = rx.recv().await else {
            panic!("expected lyrics event");
        };
        assert!(app.handle_lyrics(le));
        assert_eq!(app.state.placeholder(), Some("No lyrics"));

        app.handle_action(Action::Refetch, &tx);
        assert_eq!(app.state.generation, 2);
        assert!(app.state.lyrics_loading);
    }

    #[tokio::test]
    async fn test_panicking_fetch_reports_no_lyrics() {
        let mut app = app(Step::Panic, Step::Timeout);
        let (tx, mut rx) = mpsc::channel(8);

        app.handle_media(track("Song"), &tx);
        let Some(Event::Lyrics(le)) = rx.recv().await else {
            panic!("expected lyrics event");
        };
        assert!(app.handle_lyrics(le));
        assert!(!app.state.lyrics_loading);
        assert_eq!(app.state.placeholder(), Some("No lyrics"));
    }

    #[tokio::test]
    async fn test_follow_prints_lines_as_they_become_current() {
        let mut app = app(Step::Json(SEARCH_ABC), Step::Json(LYRIC));
        let script: &[u8] = b"track Song | Artist\nwait 100\npos 0\npos 2000\npos 6000\npos 6500\nend\n";

        let mut out = Vec::new();
        app.follow(ScriptSource::new(script), &mut out).await.unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "♪ Song - Artist\n[00:00.00] Line One\n[00:05.50] Line Two\n"
        );
    }

    #[tokio::test]
    async fn test_follow_reports_missing_lyrics() {
        let mut app = app(Step::Json(r#"{"code":0,"data":{"song":{"list":[]}}}"#), Step::Timeout);
        let script: &[u8] = b"track Nothing | Nobody\nwait 100\npos 1000\n";

        let mut out = Vec::new();
        app.follow(ScriptSource::new(script), &mut out).await.unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "♪ Nothing - Nobody\n(no lyrics)\n");
    }
}
