//! Cue construction and playback-time lookup

pub mod builder;
pub mod tracker;

pub use builder::{Cue, CueBuilder, CueList, normalize_lines};
pub use tracker::{BeforeFirstCue, CueTracker};
