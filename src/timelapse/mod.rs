// src/timelapse/mod.rs
//! Timelapse scheduling and pace statistics

pub mod segmenter;
pub mod stats;
pub mod stop;

pub use segmenter::{create_segmenter, Segmenter, SegmenterState};
pub use stats::{format_seconds, Pace, PlaybackStats, PlaybackSummary, SegmentStats};
pub use stop::StopSignal;
