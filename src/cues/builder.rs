//! Display windows for lyric lines
//!
//! Synced lyrics keep their timestamps and get an end derived from the next
//! line. Plain lyrics are laid out at a fixed pace per line.

use crate::lyrics::parser::LrcLine;
use serde::Serialize;
use tracing::warn;

/// Shortest window a synced line is shown for, in seconds.
const MIN_WINDOW: f64 = 0.15;
/// Gap left before the next synced line starts.
const LEAD_GAP: f64 = 0.05;
/// Minimum display time of the last synced line.
const MIN_TAIL: f64 = 2.0;

/// One line shown from `start` (inclusive) to `end` (exclusive), in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cue {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Cues ordered by `start`. Ends are non-decreasing too, which the tracker
/// relies on for its binary search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CueList(Vec<Cue>);

impl CueList {
    pub fn as_slice(&self) -> &[Cue] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Cue> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cue> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a CueList {
    type Item = &'a Cue;
    type IntoIter = std::slice::Iter<'a, Cue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueBuilder {
    seconds_per_line: f64,
}

impl CueBuilder {
    pub const DEFAULT_SECONDS_PER_LINE: f64 = 2.8;

    pub fn new(seconds_per_line: f64) -> Self {
        let seconds_per_line = if seconds_per_line.is_finite() && seconds_per_line > 0.0 {
            seconds_per_line
        } else {
            warn!(
                seconds_per_line,
                "invalid seconds per line, using {}",
                Self::DEFAULT_SECONDS_PER_LINE
            );
            Self::DEFAULT_SECONDS_PER_LINE
        };
        Self { seconds_per_line }
    }

    pub fn seconds_per_line(&self) -> f64 {
        self.seconds_per_line
    }

    /// Build from synced lines when there are any, else from plain lines.
    pub fn build(&self, lines: &[String], synced: &[LrcLine]) -> CueList {
        if synced.is_empty() {
            self.build_fixed(lines)
        } else {
            self.build_synced(synced)
        }
    }

    fn build_synced(&self, synced: &[LrcLine]) -> CueList {
        let cues = synced
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let start = line.seconds();
                let end = match synced.get(i + 1) {
                    Some(next) => (start + MIN_WINDOW).max(next.seconds() - LEAD_GAP),
                    None => start + MIN_TAIL.max(self.seconds_per_line),
                };
                Cue {
                    start: round_ms(start),
                    end: round_ms(end),
                    text: line.text.clone(),
                }
            })
            .collect();
        CueList(cues)
    }

    fn build_fixed(&self, lines: &[String]) -> CueList {
        let cues = lines
            .iter()
            .enumerate()
            .map(|(i, text)| Cue {
                start: round_ms(i as f64 * self.seconds_per_line),
                end: round_ms((i + 1) as f64 * self.seconds_per_line),
                text: text.clone(),
            })
            .collect();
        CueList(cues)
    }
}

impl Default for CueBuilder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SECONDS_PER_LINE)
    }
}

/// Trimmed, non-empty display lines of a lyrics body.
pub fn normalize_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|l| l.replace('\r', "").trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

fn round_ms(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}
