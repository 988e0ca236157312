use super::Config;

pub const LYRICS_BASE_URL: &str = crate::lyrics::QqMusicClient::DEFAULT_BASE_URL;
pub const CONNECT_TIMEOUT_SECS: u64 = 10;
pub const READ_TIMEOUT_SECS: u64 = 10;
pub const MPV_SOCKET_NAME: &str = "mpvsocket";
pub const CONTEXT_LINES: usize = 3;

/// Config written on first run.
pub fn defaults() -> Config {
    Config::default()
}
