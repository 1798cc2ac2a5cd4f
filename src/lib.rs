// src/lib.rs
//! GPX Timelapse Library
//!
//! Replays recorded GPS tracks at an accelerated pace. A [`Segmenter`]
//! releases each track's points in time-paced batches, and a [`Player`]
//! drains tracks in order while tracking moving distance and pace.

pub mod config;
pub mod display;
pub mod error;
pub mod player;
pub mod playlist;
pub mod timelapse;
pub mod track;

// Re-export main types for convenience
pub use error::{Result, TimelapseError};
pub use player::{run_playback, Player};
pub use playlist::Playlist;
pub use timelapse::{create_segmenter, PlaybackSummary, Segmenter, StopSignal};
pub use track::{distance_feet, RawPoint, Track, TrackPoint};
