//! QQ Music lyrics API client
//!
//! Two endpoints are used: a song search that resolves a `songmid`, and a
//! lyric query returning raw LRC text. Both reject requests that do not carry
//! a y.qq.com referer and a desktop browser user agent.

use super::fetcher::{FetchError, LyricSource};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub code: i64,
    pub data: Option<SearchData>,
}

#[derive(Debug, Deserialize)]
pub struct SearchData {
    pub song: Option<SongList>,
}

#[derive(Debug, Deserialize)]
pub struct SongList {
    pub list: Option<Vec<Song>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Song {
    #[allow(dead_code)]
    #[serde(rename = "songid", default)]
    pub song_id: i64,
    #[serde(rename = "songmid", default)]
    pub song_mid: String,
    #[serde(rename = "songname", default)]
    pub song_name: String,
    #[serde(rename = "singer", default)]
    pub singers: Vec<Singer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Singer {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LyricResponse {
    #[serde(default)]
    pub code: i64,
    pub lyric: Option<String>,
    /// Translated lyrics, when the service has them
    #[allow(dead_code)]
    pub trans: Option<String>,
}

impl SearchResponse {
    /// First candidate of a successful search, if any.
    pub fn first_song(&self) -> Option<&Song> {
        if self.code != 0 {
            return None;
        }
        self.data
            .as_ref()?
            .song
            .as_ref()?
            .list
            .as_ref()?
            .first()
    }
}

impl LyricResponse {
    /// Lyric text of a successful response, if non-empty.
    pub fn text(&self) -> Option<&str> {
        if self.code != 0 {
            return None;
        }
        self.lyric.as_deref().filter(|s| !s.is_empty())
    }
}

/// QQ Music API client
#[derive(Debug, Clone)]
pub struct QqMusicClient {
    http: reqwest::Client,
    base_url: String,
}

impl QqMusicClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://c.y.qq.com";
    const REFERER: &'static str = "https://y.qq.com";
    const USER_AGENT: &'static str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

    pub fn new(
        base_url: &str,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = Self::client_builder(connect_timeout, read_timeout)
            .build()
            .context("build reqwest client")?;
        Ok(Self::with_http(base_url, http))
    }

    pub fn from_config(cfg: &crate::config::LyricsConfig) -> anyhow::Result<Self> {
        Self::new(
            &cfg.base_url,
            Duration::from_secs(cfg.connect_timeout_secs),
            Duration::from_secs(cfg.read_timeout_secs),
        )
    }

    fn client_builder(connect_timeout: Duration, read_timeout: Duration) -> reqwest::ClientBuilder {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, HeaderValue::from_static(Self::REFERER));
        headers.insert(USER_AGENT, HeaderValue::from_static(Self::USER_AGENT));

        reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(connect_timeout)
            .read_timeout(read_timeout)
    }

    fn with_http(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn search_url(&self, keyword: &str) -> String {
        format!(
            "{}/soso/fcgi-bin/client_search_cp?w={}&p=1&n=1&format=json",
            self.base_url,
            urlencoding::encode(keyword)
        )
    }

    pub fn lyric_url(&self, song_mid: &str) -> String {
        format!(
            "{}/lyric/fcgi-bin/fcg_query_lyric_new.fcg?songmid={}&format=json&nobase64=1",
            self.base_url,
            urlencoding::encode(song_mid)
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl LyricSource for QqMusicClient {
    async fn search(&self, keyword: &str) -> Result<SearchResponse, FetchError> {
        self.get_json(&self.search_url(keyword)).await
    }

    async fn lyric(&self, song_mid: &str) -> Result<LyricResponse, FetchError> {
        self.get_json(&self.lyric_url(song_mid)).await
    }
}
