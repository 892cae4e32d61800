//! LRCLIB provider
//!
//! LRCLIB is a free lyrics API that provides synchronized (LRC format) lyrics.
//! API Documentation: https://lrclib.net/docs

use super::client::{ProviderClient, Transport};
use super::error::FetchError;
use super::query::{Query, eq_ignore_case};
use serde_json::Value;
use tracing::warn;

/// One LRCLIB search result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LrclibTrack {
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub plain_lyrics: Option<String>,
    pub synced_lyrics: Option<String>,
}

impl LrclibTrack {
    /// Read one search result; a field that is not a string counts as missing.
    fn from_json(item: &Value) -> Option<Self> {
        if !item.is_object() {
            return None;
        }
        let field = |key: &str| item[key].as_str().map(str::to_string);
        Some(Self {
            track_name: field("trackName"),
            artist_name: field("artistName"),
            plain_lyrics: field("plainLyrics"),
            synced_lyrics: field("syncedLyrics"),
        })
    }

    pub fn title(&self) -> &str {
        self.track_name.as_deref().unwrap_or_default().trim()
    }

    pub fn artist(&self) -> &str {
        self.artist_name.as_deref().unwrap_or_default().trim()
    }

    /// Plain lyrics, or the synced variant when only that is present.
    pub fn lyrics_text(&self) -> Option<&str> {
        non_blank(self.plain_lyrics.as_deref()).or_else(|| self.synced())
    }

    pub fn synced(&self) -> Option<&str> {
        non_blank(self.synced_lyrics.as_deref())
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// LRCLIB search client
#[derive(Debug, Clone)]
pub struct Lrclib {
    base_url: String,
}

impl Lrclib {
    pub const DEFAULT_BASE_URL: &'static str = "https://lrclib.net/api";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn search_url(&self, query: &str) -> String {
        format!("{}/search?q={}", self.base_url, urlencoding::encode(query))
    }

    /// Search for tracks; a non-array payload yields none.
    pub async fn search<T: Transport>(
        &self,
        client: &ProviderClient<T>,
        query: &str,
    ) -> Result<Vec<LrclibTrack>, FetchError> {
        let payload = client.fetch_json(&self.search_url(query)).await?;
        let Some(items) = payload.as_array() else {
            return Ok(Vec::new());
        };

        let tracks: Vec<LrclibTrack> = items.iter().filter_map(LrclibTrack::from_json).collect();
        if tracks.len() < items.len() {
            warn!(
                query,
                skipped = items.len() - tracks.len(),
                "lrclib returned malformed tracks"
            );
        }
        Ok(tracks)
    }
}

impl Default for Lrclib {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

/// Pick the result whose synced lyrics best fit an already resolved song.
///
/// Preference: title and artist both match, then title matches the resolved
/// title, then title matches the query, then the first result.
pub fn pick_preferred<'a>(
    tracks: &'a [LrclibTrack],
    query: &Query,
    title: &str,
    artist: &str,
) -> Option<&'a LrclibTrack> {
    let title = title.trim().to_lowercase();
    let artist = artist.trim().to_lowercase();

    if !title.is_empty()
        && !artist.is_empty()
        && let Some(hit) = tracks
            .iter()
            .find(|r| eq_ignore_case(&title, r.title()) && eq_ignore_case(&artist, r.artist()))
    {
        return Some(hit);
    }

    if !title.is_empty()
        && let Some(hit) = tracks.iter().find(|r| eq_ignore_case(&title, r.title()))
    {
        return Some(hit);
    }

    tracks
        .iter()
        .find(|r| query.matches(r.title()))
        .or_else(|| tracks.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::client::RetryPolicy;
    use crate::lyrics::client::testing::ScriptedTransport;

    fn track(title: &str, artist: &str, synced: Option<&str>) -> LrclibTrack {
        LrclibTrack {
            track_name: Some(title.into()),
            artist_name: Some(artist.into()),
            plain_lyrics: None,
            synced_lyrics: synced.map(Into::into),
        }
    }

    #[test]
    fn test_lyrics_text_prefers_plain() {
        let mut t = track("a", "b", Some("[00:01.00]x"));
        assert_eq!(t.lyrics_text(), Some("[00:01.00]x"));
        t.plain_lyrics = Some("  x \n".into());
        assert_eq!(t.lyrics_text(), Some("x"));
        t.plain_lyrics = Some("   ".into());
        t.synced_lyrics = None;
        assert_eq!(t.lyrics_text(), None);
    }

    #[test]
    fn test_pick_preferred_order() {
        let tracks = vec![
            track("Intro", "Someone", None),
            track("Song", "Cover Band", None),
            track("Song", "Original", None),
        ];
        let q = Query::new("intro").unwrap();

        let hit = pick_preferred(&tracks, &q, "song", "ORIGINAL").unwrap();
        assert_eq!(hit.artist(), "Original");

        let hit = pick_preferred(&tracks, &q, "Song", "Nobody").unwrap();
        assert_eq!(hit.artist(), "Cover Band");

        let hit = pick_preferred(&tracks, &q, "Missing", "").unwrap();
        assert_eq!(hit.title(), "Intro");

        let q = Query::new("nothing").unwrap();
        let hit = pick_preferred(&tracks, &q, " ", "").unwrap();
        assert_eq!(hit.title(), "Intro");

        assert!(pick_preferred(&[], &q, "Intro", "Someone").is_none());
    }

    #[tokio::test]
    async fn test_search_decodes_nulls() {
        let p = Lrclib::new("http://lrclib.test/api");
        let transport = ScriptedTransport::new();
        transport.push(
            &p.search_url("hello"),
            Ok(r#"[{"id":1,"trackName":"Hello","artistName":"Adele","albumName":null,"duration":295.0,"plainLyrics":"Hello","syncedLyrics":null}]"#),
        );
        let client = ProviderClient::new(transport, RetryPolicy::default());

        let tracks = p.search(&client, "hello").await.unwrap();

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title(), "Hello");
        assert_eq!(tracks[0].synced(), None);
        assert_eq!(p.search_url("a b"), "http://lrclib.test/api/search?q=a%20b");
    }

    #[tokio::test]
    async fn test_search_skips_malformed_tracks() {
        let p = Lrclib::new("http://lrclib.test/api");
        let transport = ScriptedTransport::new();
        transport.push(
            &p.search_url("hello"),
            Ok(r#"["oops",{"trackName":5,"artistName":"X"},{"trackName":"Hello","artistName":"Adele","plainLyrics":"Hello"}]"#),
        );
        let client = ProviderClient::new(transport, RetryPolicy::default());

        let tracks = p.search(&client, "hello").await.unwrap();

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].title(), "");
        assert_eq!(tracks[0].artist(), "X");
        assert_eq!(tracks[1].title(), "Hello");
        assert_eq!(tracks[1].lyrics_text(), Some("Hello"));
    }

    #[tokio::test]
    async fn test_search_non_array_is_empty() {
        let p = Lrclib::new("http://lrclib.test/api");
        let transport = ScriptedTransport::new();
        transport.push(&p.search_url("x"), Ok(r#"{"error":"nope"}"#));
        let client = ProviderClient::new(transport, RetryPolicy::default());

        assert!(p.search(&client, "x").await.unwrap().is_empty());
    }
}
