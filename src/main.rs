mod config;
mod cues;
mod lyrics;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cues::{Cue, CueBuilder, CueList, CueTracker};
use lyrics::{HttpTransport, LyricsError, LyricsResolver, ProviderClient, Query};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "lyricue", version, about = "Resolve song lyrics into timed display cues")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log provider requests and retries.
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Look up lyrics and print the matched song.
    Resolve { query: String },
    /// Look up lyrics and print resolved song plus cues as JSON.
    Cues { query: String },
    /// Build cues from a local LRC or plain-text file and print them as JSON.
    Parse {
        path: PathBuf,
        /// Pace for files without timestamps.
        #[arg(long)]
        seconds_per_line: Option<f64>,
    },
    /// Follow cues against a wall clock, printing the active line and word.
    Play {
        /// Song query (ignored with --file).
        query: Option<String>,
        /// Read lyrics from a local file instead of the providers.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Playback position to start from, in seconds.
        #[arg(long, default_value_t = 0.0)]
        start: f64,
        /// Clock ticks per second.
        #[arg(long, default_value_t = 30)]
        fps: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let cfg = config::load(cli.config.as_deref()).context("load config")?;
    let builder = cfg.cue_builder();

    match cli.command {
        Command::Resolve { query } => {
            let query = parse_query(&query)?;
            let resolver = make_resolver(&cfg)?;
            let resolved = resolver.resolve(&query).await.map_err(user_error)?;
            println!(
                "Matched: {} - {}\n",
                resolved.matched_title, resolved.matched_artist
            );
            println!("{}", resolved.text);
        }
        Command::Cues { query } => {
            let query = parse_query(&query)?;
            let resolver = make_resolver(&cfg)?;
            let prepared = lyrics::prepare(&resolver, &builder, &query)
                .await
                .map_err(user_error)?;
            println!("{}", serde_json::to_string_pretty(&prepared)?);
        }
        Command::Parse {
            path,
            seconds_per_line,
        } => {
            let cues = cues_from_file(&path, &override_pace(builder, seconds_per_line))?;
            println!("{}", serde_json::to_string_pretty(&cues)?);
        }
        Command::Play {
            query,
            file,
            start,
            fps,
        } => {
            let cues = match (file, query) {
                (Some(path), _) => cues_from_file(&path, &builder)?,
                (None, Some(query)) => {
                    let query = parse_query(&query)?;
                    let resolver = make_resolver(&cfg)?;
                    let prepared = lyrics::prepare(&resolver, &builder, &query)
                        .await
                        .map_err(user_error)?;
                    println!(
                        "Matched: {} - {}",
                        prepared.resolved.matched_title, prepared.resolved.matched_artist
                    );
                    prepared.cues
                }
                (None, None) => anyhow::bail!("give a song query or --file"),
            };
            let tracker = CueTracker::new(cues, cfg.cues.before_first);
            play(&tracker, start, fps).await;
        }
    }

    Ok(())
}

fn parse_query(raw: &str) -> anyhow::Result<Query> {
    Query::new(raw).context("please enter the song name")
}

fn make_resolver(cfg: &config::Config) -> anyhow::Result<LyricsResolver<HttpTransport>> {
    let transport = HttpTransport::new(&cfg.providers.user_agent)?;
    Ok(LyricsResolver::new(
        ProviderClient::new(transport, cfg.retry_policy()),
        lyrics::lyricsovh::LyricsOvh::new(cfg.providers.lyrics_ovh_url.as_str()),
        lyrics::lrclib::Lrclib::new(cfg.providers.lrclib_url.as_str()),
    ))
}

fn user_error(err: LyricsError) -> anyhow::Error {
    match err {
        LyricsError::NotFound => anyhow::anyhow!("song not found: {err}"),
        LyricsError::NetworkTimeout | LyricsError::NetworkError => {
            anyhow::anyhow!("{err}, please try again in a moment")
        }
    }
}

fn override_pace(builder: CueBuilder, seconds_per_line: Option<f64>) -> CueBuilder {
    seconds_per_line.map_or(builder, CueBuilder::new)
}

/// Timed LRC when the file has timestamps, otherwise one cue per line.
fn cues_from_file(path: &Path, builder: &CueBuilder) -> anyhow::Result<CueList> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let synced = lyrics::parser::parse(&raw);
    let lines = cues::normalize_lines(&raw);
    if synced.is_empty() {
        tracing::info!(
            seconds_per_line = builder.seconds_per_line(),
            "no timestamps found, using fixed interval"
        );
    }
    Ok(builder.build(&lines, &synced))
}

async fn play(tracker: &CueTracker, start: f64, fps: u32) {
    if tracker.cues().is_empty() {
        println!("(no lyrics)");
        return;
    }
    let last_end = tracker.cues().iter().map(|c| c.end).fold(0.0, f64::max);

    let origin = tokio::time::Instant::now();
    let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / fps.clamp(1, 120) as f64));
    let mut shown = None;

    loop {
        ticker.tick().await;
        let now = start.max(0.0) + origin.elapsed().as_secs_f64();
        let state = tracker.state(now);

        let key = (state.active_cue, state.active_word);
        if shown != Some(key) {
            shown = Some(key);
            let line = tracker
                .active_cue(now)
                .map(|cue| render_line(cue, state.active_word))
                .unwrap_or_default();
            println!("{now:>8.2}  {line}");
        }

        if now >= last_end {
            break;
        }
    }
}

/// The cue text with the active word in brackets.
fn render_line(cue: &Cue, active_word: Option<usize>) -> String {
    cue.text
        .split_whitespace()
        .enumerate()
        .map(|(i, w)| {
            if Some(i) == active_word {
                format!("[{w}]")
            } else {
                w.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
