//! Active cue and word lookup for a playback clock
//!
//! The tracker is stateless per call: every tick searches the cue list from
//! scratch, so seeking backwards needs no special handling.

use super::builder::{Cue, CueList};
use serde::{Deserialize, Serialize};

/// Longest fraction of a cue's window used for word progress.
const MAX_PROGRESS: f64 = 0.999;
/// Windows shorter than this are stretched when dividing words.
const MIN_WORD_WINDOW: f64 = 0.15;

/// What to show for a time before the first cue starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BeforeFirstCue {
    /// Same as any other unmatched time: hold the last cue.
    #[default]
    HoldLast,
    /// Show nothing until the first cue starts.
    Blank,
}

/// Active cue and word for one clock reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaybackState {
    pub time: f64,
    pub active_cue: Option<usize>,
    pub active_word: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct CueTracker {
    cues: CueList,
    before_first: BeforeFirstCue,
}

impl CueTracker {
    pub fn new(cues: CueList, before_first: BeforeFirstCue) -> Self {
        Self { cues, before_first }
    }

    pub fn cues(&self) -> &CueList {
        &self.cues
    }

    /// Index of the first cue with `start <= time < end`.
    ///
    /// When no window contains `time` the last cue is held, except before
    /// the first cue under [`BeforeFirstCue::Blank`].
    pub fn active_cue_index(&self, time: f64) -> Option<usize> {
        let cues = self.cues.as_slice();
        if cues.is_empty() {
            return None;
        }

        let started = cues.partition_point(|c| c.start <= time);
        let first_open = cues.partition_point(|c| c.end <= time);
        if first_open < started {
            return Some(first_open);
        }

        if started == 0 && self.before_first == BeforeFirstCue::Blank {
            return None;
        }
        Some(cues.len() - 1)
    }

    pub fn active_cue(&self, time: f64) -> Option<&Cue> {
        self.active_cue_index(time).and_then(|i| self.cues.get(i))
    }

    /// Word to highlight in `cue` at `time`; the window is split evenly
    /// between the whitespace-separated words.
    pub fn active_word(cue: &Cue, time: f64) -> Option<usize> {
        let words = cue.text.split_whitespace().count();
        if words == 0 {
            return None;
        }

        let window = (cue.end - cue.start).max(MIN_WORD_WINDOW);
        let progress = ((time - cue.start) / window).clamp(0.0, MAX_PROGRESS);
        let index = (progress * words as f64).floor() as usize;
        Some(index.min(words - 1))
    }

    pub fn state(&self, time: f64) -> PlaybackState {
        let active_cue = self.active_cue_index(time);
        let active_word = active_cue
            .and_then(|i| self.cues.get(i))
            .and_then(|cue| Self::active_word(cue, time));
        PlaybackState {
            time,
            active_cue,
            active_word,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cues::builder::CueBuilder;
    use crate::lyrics::parser::LrcLine;

    fn cue(start: f64, end: f64, text: &str) -> Cue {
        Cue {
            start,
            end,
            text: text.to_string(),
        }
    }

    /// Windows [2, 4.95), [5, 6.95), [7, 9.8)
    fn synced_tracker(before_first: BeforeFirstCue) -> CueTracker {
        let lines = vec![
            LrcLine::new(2_000, "first line".into()),
            LrcLine::new(5_000, "second line".into()),
            LrcLine::new(7_000, "third line here".into()),
        ];
        CueTracker::new(CueBuilder::new(2.8).build(&[], &lines), before_first)
    }

    #[test]
    fn test_time_inside_window() {
        let tracker = synced_tracker(BeforeFirstCue::HoldLast);
        assert_eq!(tracker.active_cue_index(2.0), Some(0));
        assert_eq!(tracker.active_cue_index(4.9), Some(0));
        assert_eq!(tracker.active_cue_index(5.0), Some(1));
        assert_eq!(tracker.active_cue_index(9.79), Some(2));
        assert_eq!(tracker.active_cue(6.0).unwrap().text, "second line");
    }

    #[test]
    fn test_unmatched_time_holds_last_cue() {
        let tracker = synced_tracker(BeforeFirstCue::HoldLast);
        // Past the final window.
        assert_eq!(tracker.active_cue_index(9.8), Some(2));
        assert_eq!(tracker.active_cue_index(500.0), Some(2));
        // Inside the gap between two windows.
        assert_eq!(tracker.active_cue_index(4.97), Some(2));
        // Before the first cue: the default policy also holds the last cue.
        assert_eq!(tracker.active_cue_index(0.0), Some(2));
        assert_eq!(tracker.active_cue_index(1.99), Some(2));
    }

    #[test]
    fn test_blank_before_first_cue() {
        let tracker = synced_tracker(BeforeFirstCue::Blank);
        assert_eq!(tracker.active_cue_index(0.0), None);
        assert_eq!(tracker.active_cue_index(1.99), None);
        assert_eq!(tracker.active_cue_index(2.0), Some(0));
        // Gaps and the tail still hold the last cue.
        assert_eq!(tracker.active_cue_index(4.97), Some(2));
        assert_eq!(tracker.active_cue_index(100.0), Some(2));
    }

    #[test]
    fn test_seek_backwards() {
        let tracker = synced_tracker(BeforeFirstCue::HoldLast);
        let times = [8.0, 2.5, 6.0, 3.0];
        let found: Vec<_> = times.iter().map(|t| tracker.active_cue_index(*t)).collect();
        assert_eq!(found, vec![Some(2), Some(0), Some(1), Some(0)]);
    }

    #[test]
    fn test_first_window_wins_on_overlap() {
        // Lines 100ms apart get overlapping minimum windows.
        let lines = vec![
            LrcLine::new(1_000, "a".into()),
            LrcLine::new(1_100, "b".into()),
            LrcLine::new(3_000, "c".into()),
        ];
        let tracker = CueTracker::new(
            CueBuilder::new(2.8).build(&[], &lines),
            BeforeFirstCue::HoldLast,
        );
        assert_eq!(tracker.active_cue_index(1.12), Some(0));
        assert_eq!(tracker.active_cue_index(1.15), Some(1));
    }

    #[test]
    fn test_empty_list() {
        let tracker = CueTracker::new(CueList::default(), BeforeFirstCue::HoldLast);
        assert_eq!(tracker.active_cue(1.0), None);
        assert_eq!(
            tracker.state(1.0),
            PlaybackState {
                time: 1.0,
                active_cue: None,
                active_word: None
            }
        );
    }

    #[test]
    fn test_active_word_uniform_division() {
        let c = cue(10.0, 13.0, "one two three");
        assert_eq!(CueTracker::active_word(&c, 10.0), Some(0));
        assert_eq!(CueTracker::active_word(&c, 11.1), Some(1));
        assert_eq!(CueTracker::active_word(&c, 12.9), Some(2));
    }

    #[test]
    fn test_active_word_clamps() {
        let c = cue(10.0, 13.0, "one two three");
        assert_eq!(CueTracker::active_word(&c, 5.0), Some(0));
        assert_eq!(CueTracker::active_word(&c, 13.0), Some(2));
        assert_eq!(CueTracker::active_word(&c, 99.0), Some(2));
    }

    #[test]
    fn test_active_word_short_window() {
        // A 50ms window is stretched to 150ms.
        let c = cue(1.0, 1.05, "a b c");
        assert_eq!(CueTracker::active_word(&c, 1.04), Some(0));
        assert_eq!(CueTracker::active_word(&c, 1.06), Some(1));
    }

    #[test]
    fn test_active_word_blank_text() {
        assert_eq!(CueTracker::active_word(&cue(0.0, 1.0, "   "), 0.5), None);
    }

    #[test]
    fn test_state_combines_cue_and_word() {
        let tracker = synced_tracker(BeforeFirstCue::HoldLast);
        let state = tracker.state(8.0);
        assert_eq!(state.active_cue, Some(2));
        // (8.0 - 7.0) / 2.8 * 3 words = 1.07
        assert_eq!(state.active_word, Some(1));
    }
}
