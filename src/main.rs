mod app;
mod config;
mod input;
mod lyrics;
mod media;
mod tui;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lyrics::{LyricFetcher, QqMusicClient};
use std::path::Path;

#[derive(Debug, Parser)]
#[command(name = "lyricdock", version, about = "Synchronized lyrics for whatever is playing")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Follow mpv and show the lyrics panel (default).
    Tui,
    /// Fetch lyrics for a track and print them (headless).
    Fetch { title: String, artist: String },
    /// Parse an LRC file and print its lines (headless).
    Parse { path: std::path::PathBuf },
    /// Print each lyric line as it becomes current (headless).
    Follow {
        /// Read `track`/`pos`/`wait`/`end` commands from stdin instead of mpv.
        #[arg(long)]
        script: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;
    let command = cli.command.unwrap_or(Command::Tui);

    // The panel owns the terminal, so its logs go to a file instead.
    let log_file = match command {
        Command::Tui => Some(cfg.paths.data_dir.join("lyricdock.log")),
        _ => None,
    };
    init_logging(cfg.log.level()?, log_file.as_deref())?;

    match command {
        Command::Tui => {
            let fetcher = make_fetcher(&cfg)?;
            let source = media::MpvSource::new(&cfg.media.mpv_socket);
            let mut terminal = tui::TerminalGuard::enter().context("init terminal")?;
            let mut app = app::App::new(cfg, fetcher);
            app.run(terminal.terminal_mut(), source).await?;
        }
        Command::Fetch { title, artist } => {
            let fetcher = make_fetcher(&cfg)?;
            let lines = fetcher.fetch_lyrics(&title, &artist).await;
            if lines.is_empty() {
                eprintln!("No lyrics found.");
            }
            print_lines(&lines);
        }
        Command::Parse { path } => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            print_lines(&lyrics::parser::parse(&raw));
        }
        Command::Follow { script } => {
            let fetcher = make_fetcher(&cfg)?;
            let socket = cfg.media.mpv_socket.clone();
            let mut app = app::App::new(cfg, fetcher);
            let mut stdout = std::io::stdout();
            if script {
                app.follow(media::ScriptSource::stdin(), &mut stdout).await?;
            } else {
                app.follow(media::MpvSource::new(socket), &mut stdout).await?;
            }
        }
    }

    Ok(())
}

fn init_logging(level: tracing::Level, file: Option<&Path>) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(level);

    match file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create dir {}", parent.display()))?;
            }
            let f = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(f))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn make_fetcher(cfg: &config::Config) -> anyhow::Result<LyricFetcher<QqMusicClient>> {
    let client = QqMusicClient::from_config(&cfg.lyrics)?;
    Ok(LyricFetcher::new(client))
}

fn print_lines(lines: &[lyrics::LyricLine]) {
    for l in lines {
        println!("[{}] {}", lyrics::parser::format_timestamp(l.time_ms), l.text);
    }
}
