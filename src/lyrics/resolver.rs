//! Two-provider lyrics resolution
//!
//! lyrics.ovh is tried first; LRCLIB is only contacted once the primary
//! lookup has failed. The two failures are folded into a single
//! [`LyricsError`] so callers can tell "not found anywhere" from
//! "unreachable".

use super::client::{ProviderClient, Transport};
use super::error::{FetchError, LyricsError};
use super::lrclib::{Lrclib, pick_preferred};
use super::lyricsovh::LyricsOvh;
use super::query::Query;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Lyrics text plus the song it was matched to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLyrics {
    pub text: String,
    pub matched_title: String,
    pub matched_artist: String,
}

/// Why one provider could not produce lyrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderFailure {
    Fetch(FetchError),
    NotFound(&'static str),
}

impl From<FetchError> for ProviderFailure {
    fn from(err: FetchError) -> Self {
        ProviderFailure::Fetch(err)
    }
}

impl std::fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderFailure::Fetch(err) => write!(f, "{err}"),
            ProviderFailure::NotFound(reason) => f.write_str(reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureClass {
    Timeout,
    NotFound,
    Network,
}

impl ProviderFailure {
    fn class(&self) -> FailureClass {
        match self {
            ProviderFailure::Fetch(FetchError::Timeout) => FailureClass::Timeout,
            // A reachable provider that answered with garbage had nothing usable.
            ProviderFailure::Fetch(FetchError::Decode(_)) | ProviderFailure::NotFound(_) => {
                FailureClass::NotFound
            }
            ProviderFailure::Fetch(_) => FailureClass::Network,
        }
    }
}

/// Fold the primary and fallback failures into one outcome.
pub fn unify(primary: &ProviderFailure, fallback: &ProviderFailure) -> LyricsError {
    match (primary.class(), fallback.class()) {
        (FailureClass::Timeout, FailureClass::Timeout) => LyricsError::NetworkTimeout,
        (FailureClass::NotFound, FailureClass::NotFound) => LyricsError::NotFound,
        _ => LyricsError::NetworkError,
    }
}

/// Exact case-insensitive title match wins, otherwise the provider's first hit.
pub fn select_candidate<'a, C>(
    candidates: &'a [C],
    query: &Query,
    title: impl Fn(&C) -> &str,
) -> Option<&'a C> {
    candidates
        .iter()
        .find(|c| query.matches(title(c)))
        .or_else(|| candidates.first())
}

#[derive(Debug, Clone)]
pub struct LyricsResolver<T> {
    client: ProviderClient<T>,
    primary: LyricsOvh,
    fallback: Lrclib,
}

impl<T: Transport> LyricsResolver<T> {
    pub fn new(client: ProviderClient<T>, primary: LyricsOvh, fallback: Lrclib) -> Self {
        Self {
            client,
            primary,
            fallback,
        }
    }

    pub async fn resolve(&self, query: &Query) -> Result<ResolvedLyrics, LyricsError> {
        let primary_err = match self.resolve_primary(query).await {
            Ok(resolved) => {
                info!(
                    provider = "lyrics.ovh",
                    title = %resolved.matched_title,
                    artist = %resolved.matched_artist,
                    "resolved lyrics"
                );
                return Ok(resolved);
            }
            Err(err) => err,
        };
        warn!(query = %query, error = %primary_err, "lyrics.ovh lookup failed, trying lrclib");

        let fallback_err = match self.resolve_fallback(query).await {
            Ok(resolved) => {
                info!(
                    provider = "lrclib",
                    title = %resolved.matched_title,
                    artist = %resolved.matched_artist,
                    "resolved lyrics"
                );
                return Ok(resolved);
            }
            Err(err) => err,
        };

        let err = unify(&primary_err, &fallback_err);
        warn!(
            query = %query,
            primary = %primary_err,
            fallback = %fallback_err,
            outcome = ?err,
            "lyrics lookup failed on both providers"
        );
        Err(err)
    }

    async fn resolve_primary(&self, query: &Query) -> Result<ResolvedLyrics, ProviderFailure> {
        let candidates = self.primary.search(&self.client, query.as_str()).await?;
        let chosen = select_candidate(&candidates, query, |c| c.title.as_str())
            .ok_or(ProviderFailure::NotFound("no search results"))?;
        if chosen.title.is_empty() || chosen.artist.is_empty() {
            return Err(ProviderFailure::NotFound("candidate has no title or artist"));
        }
        debug!(title = %chosen.title, artist = %chosen.artist, "lyrics.ovh candidate");

        let text = self
            .primary
            .lyrics(&self.client, &chosen.artist, &chosen.title)
            .await?;
        if text.is_empty() {
            return Err(ProviderFailure::NotFound("empty lyrics"));
        }

        Ok(ResolvedLyrics {
            text,
            matched_title: chosen.title.clone(),
            matched_artist: chosen.artist.clone(),
        })
    }

    async fn resolve_fallback(&self, query: &Query) -> Result<ResolvedLyrics, ProviderFailure> {
        let tracks = self.fallback.search(&self.client, query.as_str()).await?;
        let chosen = select_candidate(&tracks, query, |t| t.title())
            .ok_or(ProviderFailure::NotFound("no search results"))?;
        if chosen.title().is_empty() || chosen.artist().is_empty() {
            return Err(ProviderFailure::NotFound("candidate has no title or artist"));
        }
        let text = chosen
            .lyrics_text()
            .ok_or(ProviderFailure::NotFound("empty lyrics"))?;

        Ok(ResolvedLyrics {
            text: text.to_string(),
            matched_title: chosen.title().to_string(),
            matched_artist: chosen.artist().to_string(),
        })
    }

    /// LRC text for the resolved song, when LRCLIB has it.
    ///
    /// Never fails: lookup errors only mean fixed-interval cues.
    pub async fn synced_lyrics(&self, query: &Query, resolved: &ResolvedLyrics) -> Option<String> {
        let tracks = match self.fallback.search(&self.client, query.as_str()).await {
            Ok(tracks) => tracks,
            Err(err) => {
                warn!(query = %query, error = %err, "synced lyrics lookup failed");
                return None;
            }
        };
        let chosen = pick_preferred(
            &tracks,
            query,
            &resolved.matched_title,
            &resolved.matched_artist,
        )?;
        chosen.synced().map(str::to_string)
    }
}
