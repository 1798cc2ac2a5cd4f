// src/display/mod.rs
//! Rendering and statistics display collaborators

pub mod path;
pub mod plain;
pub mod terminal;

use crate::{
    error::Result,
    timelapse::PlaybackSummary,
    track::{Track, TrackPoint},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub use path::{Extent, PathRecorder};
pub use plain::PlainDisplay;
pub use terminal::TerminalDisplay;

/// Receives released batches and draws them onto one shared path.
///
/// `append` returning is the acknowledgment that drawing has finished; the
/// player will not request another batch until then.
#[async_trait]
pub trait PathRenderer: Send {
    async fn begin_track(&mut self, _track: &Track) -> Result<()> {
        Ok(())
    }

    async fn append(&mut self, batch: &[TrackPoint]) -> Result<()>;
}

/// Receives running statistics after each batch and the final summary.
pub trait StatsDisplay {
    fn show_segment(&mut self, snapshot: &SegmentSnapshot) -> Result<()>;

    fn show_summary(&mut self, summary: &PlaybackSummary) -> Result<()>;
}

/// Statistics shown after a batch has been drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentSnapshot {
    pub track_title: String,
    pub track_number: usize, // 1-based
    pub track_count: usize,
    pub date: String,
    pub time_of_day: String,
    pub pace_label: String,
    pub cumulative_miles: f64,
    pub points_drawn: usize,
    pub playback_time: DateTime<Utc>,
}

impl SegmentSnapshot {
    pub fn date_and_time(playback_time: DateTime<Utc>) -> (String, String) {
        (
            playback_time.format("%Y-%m-%d").to_string(),
            playback_time.format("%H:%M:%S").to_string(),
        )
    }
}

/// Which statistics display the CLI drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Terminal,
    Plain,
}

impl DisplayMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "terminal" => Some(DisplayMode::Terminal),
            "plain" => Some(DisplayMode::Plain),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Terminal => "terminal",
            DisplayMode::Plain => "plain",
        }
    }
}

/// Use the redrawing terminal panel only when stdout is a terminal.
pub fn should_use_terminal() -> bool {
    use std::io::IsTerminal;
    std::io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_display_mode_parse() {
        assert_eq!(DisplayMode::parse("terminal"), Some(DisplayMode::Terminal));
        assert_eq!(DisplayMode::parse("PLAIN"), Some(DisplayMode::Plain));
        assert_eq!(DisplayMode::parse("gui"), None);
        assert_eq!(DisplayMode::Plain.as_str(), "plain");
    }

    #[test]
    fn test_date_and_time() {
        let t = Utc.with_ymd_and_hms(2023, 3, 4, 7, 5, 9).unwrap();
        let (date, time) = SegmentSnapshot::date_and_time(t);
        assert_eq!(date, "2023-03-04");
        assert_eq!(time, "07:05:09");
    }
}
