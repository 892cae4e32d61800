//! lyrics.ovh provider
//!
//! Primary lookup: a suggest endpoint for candidates, then a per-song lyrics
//! endpoint keyed by artist and title.

use super::client::{ProviderClient, Transport};
use super::error::FetchError;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct LyricsResponse {
    #[serde(default)]
    lyrics: Option<String>,
}

/// A search hit; either field may be blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    pub artist: String,
}

/// Read one suggestion; a field of the wrong shape is left blank.
fn to_candidate(item: &Value) -> Option<Candidate> {
    if !item.is_object() {
        return None;
    }
    let title = item["title"].as_str().unwrap_or("").trim().to_string();
    let artist = item["artist"]["name"]
        .as_str()
        .unwrap_or("")
        .trim()
        .to_string();
    Some(Candidate { title, artist })
}

#[derive(Debug, Clone)]
pub struct LyricsOvh {
    base_url: String,
}

impl LyricsOvh {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.lyrics.ovh";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn suggest_url(&self, query: &str) -> String {
        format!("{}/suggest/{}", self.base_url, urlencoding::encode(query))
    }

    pub fn lyrics_url(&self, artist: &str, title: &str) -> String {
        format!(
            "{}/v1/{}/{}",
            self.base_url,
            urlencoding::encode(artist),
            urlencoding::encode(title)
        )
    }

    /// Search candidates; a payload without a `data` array yields none.
    pub async fn search<T: Transport>(
        &self,
        client: &ProviderClient<T>,
        query: &str,
    ) -> Result<Vec<Candidate>, FetchError> {
        let payload = client.fetch_json(&self.suggest_url(query)).await?;
        let empty_vec: Vec<Value> = Vec::new();
        let items = payload["data"].as_array().unwrap_or(&empty_vec);

        let candidates: Vec<Candidate> = items.iter().filter_map(to_candidate).collect();
        if candidates.len() < items.len() {
            warn!(
                query,
                skipped = items.len() - candidates.len(),
                "lyrics.ovh returned malformed suggestions"
            );
        }
        Ok(candidates)
    }

    /// Trimmed lyrics text, empty when the provider has none.
    pub async fn lyrics<T: Transport>(
        &self,
        client: &ProviderClient<T>,
        artist: &str,
        title: &str,
    ) -> Result<String, FetchError> {
        let payload = client.fetch_json(&self.lyrics_url(artist, title)).await?;
        let lyrics = serde_json::from_value::<LyricsResponse>(payload)
            .ok()
            .and_then(|r| r.lyrics)
            .unwrap_or_default();
        Ok(lyrics.trim().to_string())
    }
}

impl Default for LyricsOvh {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}
