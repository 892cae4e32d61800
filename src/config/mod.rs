use crate::cues::{BeforeFirstCue, CueBuilder};
use crate::lyrics::RetryPolicy;
use crate::lyrics::lrclib::Lrclib;
use crate::lyrics::lyricsovh::LyricsOvh;
use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub providers: ProvidersConfig,
    pub network: NetworkConfig,
    pub cues: CuesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Primary provider base URL (lyrics.ovh API).
    pub lyrics_ovh_url: String,
    /// Fallback provider base URL (LRCLIB API), also used for synced lyrics.
    pub lrclib_url: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Tries per provider call, including the first
    pub max_attempts: u32,
    /// Retry `n` waits `n * backoff_base_ms`
    pub backoff_base_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CuesConfig {
    /// Pace used when no timestamped lyrics exist
    pub seconds_per_line: f64,
    /// "hold-last" or "blank"
    pub before_first: BeforeFirstCue,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            lyrics_ovh_url: LyricsOvh::DEFAULT_BASE_URL.to_string(),
            lrclib_url: Lrclib::DEFAULT_BASE_URL.to_string(),
            user_agent: format!("lyricue/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 12,
            max_attempts: 3,
            backoff_base_ms: 1200,
        }
    }
}

impl Default for CuesConfig {
    fn default() -> Self {
        Self {
            seconds_per_line: CueBuilder::DEFAULT_SECONDS_PER_LINE,
            before_first: BeforeFirstCue::HoldLast,
        }
    }
}

impl Config {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            timeout: Duration::from_secs(self.network.timeout_secs),
            max_attempts: self.network.max_attempts.max(1),
            backoff_base: Duration::from_millis(self.network.backoff_base_ms),
        }
    }

    pub fn cue_builder(&self) -> CueBuilder {
        CueBuilder::new(self.cues.seconds_per_line)
    }
}

pub fn save(cfg: &Config, override_path: Option<&Path>) -> anyhow::Result<()> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&path, raw).with_context(|| format!("write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(&path, fs::Permissions::from_mode(0o600));
    }
    Ok(())
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from("dev", "lyricue", "lyricue").context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

/// Load the config, writing the defaults first if the file does not exist.
pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        let cfg = Config::default();
        save(&cfg, Some(&path)).context("write default config")?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg = toml::from_str::<Config>(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
