//! LRC format parser
//!
//! Parses synchronized lyrics in LRC format:
//! [mm:ss.xx] Lyrics line here
//!
//! Example:
//! [00:12.34] Hello world
//! [00:15.00][01:02.5] Repeated line
//!
//! Fractions are always read as three digits, right-padded: `.5` is 500ms,
//! `.12` is 120ms and `.123` is 123ms. Lines that do not start with a
//! timestamp, metadata tags like `[ti:Title]` and timestamps without text are
//! skipped. Only brackets at the very start of a line are timestamps; once
//! text begins, a later `[00:02]` is part of that text.

use std::collections::HashSet;

/// A single line of lyrics with timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LrcLine {
    /// Timestamp in milliseconds from start
    pub time_ms: u64,
    /// The lyrics text
    pub text: String,
}

impl LrcLine {
    pub fn new(time_ms: u64, text: String) -> Self {
        Self { time_ms, text }
    }

    pub fn seconds(&self) -> f64 {
        self.time_ms as f64 / 1000.0
    }
}

/// Parse LRC text into lines ordered by time, with exact repeats removed.
pub fn parse(content: &str) -> Vec<LrcLine> {
    let mut lines = Vec::new();

    for line in content.split('\n') {
        let line = line.replace('\r', "");
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((timestamps, text)) = parse_timed_line(line) {
            lines.extend(
                timestamps
                    .into_iter()
                    .map(|ms| LrcLine::new(ms, text.to_string())),
            );
        }
    }

    // Stable, so lines sharing a timestamp keep their file order.
    lines.sort_by_key(|l| l.time_ms);
    let mut seen = HashSet::new();
    lines.retain(|l| seen.insert((l.time_ms, l.text.clone())));
    lines
}

/// Split `[00:12.34][00:15.00]Lyrics` into its leading timestamps and text.
fn parse_timed_line(line: &str) -> Option<(Vec<u64>, &str)> {
    let mut timestamps = Vec::new();
    let mut rest = line;

    while let Some(after_open) = rest.strip_prefix('[') {
        let Some(end) = after_open.find(']') else {
            break;
        };
        let Some(ms) = parse_timestamp(&after_open[..end]) else {
            break;
        };
        timestamps.push(ms);
        rest = &after_open[end + 1..];
    }

    let text = rest.trim();
    if timestamps.is_empty() || text.is_empty() {
        return None;
    }
    Some((timestamps, text))
}

/// Parse timestamp string like "00:12.34" or "1:05" to milliseconds
fn parse_timestamp(s: &str) -> Option<u64> {
    let (min, rest) = s.split_once(':')?;
    let (sec, frac) = match rest.split_once('.') {
        Some((sec, frac)) => (sec, Some(frac)),
        None => (rest, None),
    };

    if !(1..=2).contains(&min.len()) || sec.len() != 2 {
        return None;
    }
    let min = digits(min)?;
    let sec = digits(sec)?;
    let ms = match frac {
        None => 0,
        Some(f) => match f.len() {
            1 => digits(f)? * 100,
            2 => digits(f)? * 10,
            3 => digits(f)?,
            _ => return None,
        },
    };

    Some(min * 60 * 1000 + sec * 1000 + ms)
}

fn digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
