//! Lyrics lookup, parsing and cue preparation
//!
//! This module provides:
//! - A retrying JSON client shared by the providers
//! - lyrics.ovh (primary) and LRCLIB (fallback, synced lyrics) providers
//! - LRC format parser for synchronized lyrics
//! - [`prepare`], which turns a song query into display cues

pub mod client;
pub mod error;
pub mod lrclib;
pub mod lyricsovh;
pub mod parser;
pub mod query;
pub mod resolver;

pub use client::{HttpTransport, ProviderClient, RetryPolicy, Transport};
pub use error::LyricsError;
pub use query::Query;
pub use resolver::{LyricsResolver, ResolvedLyrics};

use crate::cues::{CueBuilder, CueList, normalize_lines};
use serde::Serialize;
use tracing::info;

/// Resolved lyrics with their display cues.
#[derive(Debug, Clone, Serialize)]
pub struct PreparedLyrics {
    #[serde(flatten)]
    pub resolved: ResolvedLyrics,
    pub synced: bool,
    pub cues: CueList,
}

/// Resolve lyrics for `query` and build cues for them.
///
/// Synced lyrics are used when LRCLIB has a timed version of the matched
/// song; otherwise lines are paced by the builder's fixed interval.
pub async fn prepare<T: Transport>(
    resolver: &LyricsResolver<T>,
    builder: &CueBuilder,
    query: &Query,
) -> Result<PreparedLyrics, LyricsError> {
    let resolved = resolver.resolve(query).await?;

    let synced_lines = match resolver.synced_lyrics(query, &resolved).await {
        Some(lrc) => parser::parse(&lrc),
        None => Vec::new(),
    };
    let lines = normalize_lines(&resolved.text);
    let cues = builder.build(&lines, &synced_lines);
    let synced = !synced_lines.is_empty();

    if synced {
        info!(cues = cues.len(), "using timestamped lyrics");
    } else {
        info!(
            cues = cues.len(),
            seconds_per_line = builder.seconds_per_line(),
            "timestamped lyrics unavailable, using fixed interval"
        );
    }

    Ok(PreparedLyrics {
        resolved,
        synced,
        cues,
    })
}
