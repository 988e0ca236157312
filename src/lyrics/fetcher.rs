//! Search-then-retrieve lyric lookup.
//!
//! Lyrics are optional: `fetch_lyrics` never fails, it logs the reason and
//! returns an empty sequence. `try_fetch` exposes the reason for callers that
//! want it.

use super::qqmusic::{LyricResponse, SearchResponse};
use super::{LyricLine, TrackQuery, parser};
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("song not found (code {code})")]
    SongNotFound { code: i64 },
    #[error("lyric not found for {song_mid} (code {code})")]
    LyricNotFound { song_mid: String, code: i64 },
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(e)
        }
    }
}

/// Remote lyric service: a song search plus a lyric lookup by song id.
pub trait LyricSource: Send + Sync {
    fn search(&self, keyword: &str) -> impl Future<Output = Result<SearchResponse, FetchError>> + Send;

    fn lyric(&self, song_mid: &str) -> impl Future<Output = Result<LyricResponse, FetchError>> + Send;
}

#[derive(Debug, Clone)]
pub struct LyricFetcher<S> {
    source: S,
}

impl<S: LyricSource> LyricFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetch lyrics for a track; empty when none are available for any reason.
    pub async fn fetch_lyrics(&self, title: &str, artist: &str) -> Vec<LyricLine> {
        let query = TrackQuery::new(title, artist);
        match self.try_fetch(&query).await {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!(keyword = %query.keyword(), "no lyrics: {e}");
                Vec::new()
            }
        }
    }

    pub async fn try_fetch(&self, query: &TrackQuery) -> Result<Vec<LyricLine>, FetchError> {
        let keyword = query.keyword();
        tracing::debug!(%keyword, "searching lyrics");

        let search = self.source.search(&keyword).await?;
        let song = search
            .first_song()
            .filter(|s| !s.song_mid.is_empty())
            .ok_or(FetchError::SongNotFound { code: search.code })?;
        tracing::debug!(
            song = %song.song_name,
            singers = song.singers.len(),
            song_mid = %song.song_mid,
            "found song"
        );

        let lyric = self.source.lyric(&song.song_mid).await?;
        let text = lyric.text().ok_or_else(|| FetchError::LyricNotFound {
            song_mid: song.song_mid.clone(),
            code: lyric.code,
        })?;

        let lines = parser::parse(text);
        tracing::debug!(count = lines.len(), "parsed lyric lines");
        Ok(lines)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    pub(crate) enum Step {
        Json(&'static str),
        Timeout,
        Panic,
    }

    /// Canned source: replies to search and lyric calls in order.
    pub(crate) struct FakeSource {
        search: Mutex<Option<Step>>,
        lyric: Mutex<Option<Step>>,
        pub(crate) calls: Mutex<Vec<String>>,
    }

    impl FakeSource {
        pub(crate) fn new(search: Step, lyric: Step) -> Self {
            Self {
                search: Mutex::new(Some(search)),
                lyric: Mutex::new(Some(lyric)),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn reply<T: serde::de::DeserializeOwned>(slot: &Mutex<Option<Step>>) -> Result<T, FetchError> {
            match slot.lock().unwrap().take() {
                Some(Step::Json(body)) => Ok(serde_json::from_str(body)?),
                Some(Step::Timeout) | None => Err(FetchError::Timeout),
                Some(Step::Panic) => panic!("lyric source blew up"),
            }
        }
    }

    impl LyricSource for FakeSource {
        async fn search(&self, keyword: &str) -> Result<SearchResponse, FetchError> {
            self.calls.lock().unwrap().push(format!("search:{keyword}"));
            Self::reply(&self.search)
        }

        async fn lyric(&self, song_mid: &str) -> Result<LyricResponse, FetchError> {
            self.calls.lock().unwrap().push(format!("lyric:{song_mid}"));
            Self::reply(&self.lyric)
        }
    }

    pub(crate) const SEARCH_ABC: &str =
        r#"{"code":0,"data":{"song":{"list":[{"songid":7,"songmid":"abc","songname":"Song","singer":[{"name":"Artist"}]},{"songid":8,"songmid":"zzz","songname":"Other","singer":[]}]}}}"#;
    const LYRIC_OK: &str = r#"{"code":0,"lyric":"[ti:Song]\n[00:05.50]Line Two\n[00:00.00]Line One","trans":""}"#;

    #[tokio::test]
    async fn test_fetch_success() {
        let fetcher = LyricFetcher::new(FakeSource::new(Step::Json(SEARCH_ABC), Step::Json(LYRIC_OK)));
        let lines = fetcher.fetch_lyrics("Song", "Artist").await;
        assert_eq!(
            lines,
            vec![LyricLine::new(0, "Line One"), LyricLine::new(5500, "Line Two")]
        );
        assert_eq!(
            *fetcher.source.calls.lock().unwrap(),
            vec!["search:Song Artist".to_string(), "lyric:abc".to_string()]
        );
    }

    #[tokio::test]
    async fn test_search_failures() {
        for body in [
            r#"{"code":-1,"data":{"song":{"list":[{"songmid":"abc"}]}}}"#,
            r#"{"code":0,"data":{"song":{"list":[]}}}"#,
            r#"{"code":0,"data":null}"#,
            r#"{"code":0,"data":{"song":{"list":[{"songname":"No Id","singer":[]}]}}}"#,
        ] {
            let fetcher = LyricFetcher::new(FakeSource::new(Step::Json(body), Step::Json(LYRIC_OK)));
            let err = fetcher.try_fetch(&TrackQuery::new("a", "b")).await.unwrap_err();
            assert!(matches!(err, FetchError::SongNotFound { .. }), "{body}: {err:?}");
            // The lyric endpoint is never consulted.
            assert_eq!(fetcher.source.calls.lock().unwrap().len(), 1);
            assert!(fetcher.fetch_lyrics("a", "b").await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_lyric_failures() {
        for body in [
            r#"{"code":-1901,"lyric":"[00:01.00]x"}"#,
            r#"{"code":0,"lyric":""}"#,
            r#"{"code":0}"#,
        ] {
            let fetcher = LyricFetcher::new(FakeSource::new(Step::Json(SEARCH_ABC), Step::Json(body)));
            let err = fetcher.try_fetch(&TrackQuery::new("a", "b")).await.unwrap_err();
            assert!(
                matches!(&err, FetchError::LyricNotFound { song_mid, .. } if song_mid == "abc"),
                "{body}: {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_singer_without_name_still_fetches() {
        let search = r#"{"code":0,"data":{"song":{"list":[{"songid":1,"songmid":"abc","songname":"S","singer":[{"id":5}]}]}}}"#;
        let fetcher = LyricFetcher::new(FakeSource::new(Step::Json(search), Step::Json(LYRIC_OK)));
        let lines = fetcher.try_fetch(&TrackQuery::new("S", "")).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(fetcher.source.calls.lock().unwrap()[1], "lyric:abc");
    }

    #[tokio::test]
    async fn test_timeouts_are_swallowed() {
        let fetcher = LyricFetcher::new(FakeSource::new(Step::Timeout, Step::Json(LYRIC_OK)));
        assert!(fetcher.fetch_lyrics("Song", "Artist").await.is_empty());

        let fetcher = LyricFetcher::new(FakeSource::new(Step::Json(SEARCH_ABC), Step::Timeout));
        assert!(fetcher.fetch_lyrics("Song", "Artist").await.is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_lyric_is_empty_not_error() {
        let fetcher = LyricFetcher::new(FakeSource::new(
            Step::Json(SEARCH_ABC),
            Step::Json(r#"{"code":0,"lyric":"plain text without tags"}"#),
        ));
        let lines = fetcher.try_fetch(&TrackQuery::new("a", "b")).await.unwrap();
        assert!(lines.is_empty());
    }
}
