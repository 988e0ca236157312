use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod defaults;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    pub lyrics: LyricsConfig,
    pub media: MediaConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    /// Lyric service base URL (no trailing path).
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// mpv JSON IPC socket (`mpv --input-ipc-server=<path>`)
    pub mpv_socket: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Lines shown above and below the current lyric line
    pub context_lines: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// trace, debug, info, warn or error
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::LYRICS_BASE_URL.to_string(),
            connect_timeout_secs: defaults::CONNECT_TIMEOUT_SECS,
            read_timeout_secs: defaults::READ_TIMEOUT_SECS,
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            mpv_socket: std::env::temp_dir().join(defaults::MPV_SOCKET_NAME),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            context_lines: defaults::CONTEXT_LINES,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let proj = project_dirs();
        let data_dir = proj
            .as_ref()
            .map(|p| p.data_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("lyricdock"));
        Self { data_dir }
    }
}

impl LogConfig {
    pub fn level(&self) -> anyhow::Result<tracing::Level> {
        self.level
            .parse()
            .with_context(|| format!("invalid log level {:?}", self.level))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "lyricdock", "lyricdock")
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj = project_dirs().context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        let cfg = defaults::defaults();
        write_config(&path, &cfg)?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    parse(&raw).with_context(|| format!("parse {}", path.display()))
}

fn parse(raw: &str) -> anyhow::Result<Config> {
    let cfg = toml::from_str::<Config>(raw)?;
    cfg.log.level()?;
    Ok(cfg)
}

fn write_config(path: &Path, cfg: &Config) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let cfg = parse(
            r#"
[lyrics]
base_url = "http://127.0.0.1:8080"

[ui]
context_lines = 5
"#,
        )
        .unwrap();
        assert_eq!(cfg.lyrics.base_url, "http://127.0.0.1:8080");
        assert_eq!(cfg.lyrics.connect_timeout_secs, 10);
        assert_eq!(cfg.lyrics.read_timeout_secs, 10);
        assert_eq!(cfg.ui.context_lines, 5);
        assert_eq!(cfg.log.level().unwrap(), tracing::Level::INFO);
    }

    #[test]
    fn test_bad_log_level_rejected() {
        assert!(parse("[log]\nlevel = \"loud\"\n").is_err());
    }

    #[test]
    fn test_load_creates_default_file_then_reads_it() {
        let dir = std::env::temp_dir().join(format!("lyricdock-cfg-{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");
        let _ = fs::remove_dir_all(&dir);

        let cfg = load(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.lyrics.base_url, defaults::LYRICS_BASE_URL);

        let mut changed = cfg.clone();
        changed.ui.context_lines = 1;
        write_config(&path, &changed).unwrap();
        assert_eq!(load(Some(&path)).unwrap().ui.context_lines, 1);

        let _ = fs::remove_dir_all(&dir);
    }
}
