// src/timelapse/stats.rs
//! Distance, pace and elapsed-time aggregation during playback

use crate::track::{TrackPoint, FEET_PER_MILE};
use serde::{Deserialize, Serialize};

/// Paces at or above this many minutes per mile count as walking and are
/// left out of the moving totals. Filters out stretches where the device
/// kept recording while stationary.
pub const WALKING_MINUTES_PER_MILE: f64 = 15.0;

/// Truncate (floor) to two decimal places.
pub fn truncate_hundredths(value: f64) -> f64 {
    (value * 100.0).floor() / 100.0
}

/// Minutes per mile for `feet` covered in `elapsed_seconds`, truncated.
pub fn minutes_per_mile(feet: f64, elapsed_seconds: f64) -> f64 {
    truncate_hundredths(FEET_PER_MILE / (60.0 * feet / elapsed_seconds))
}

/// Feet to miles, truncated.
pub fn truncated_miles(feet: f64) -> f64 {
    truncate_hundredths(feet / FEET_PER_MILE)
}

/// Format seconds as `H:MM:SS`, dropping any fractional second.
pub fn format_seconds(seconds: f64) -> String {
    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{}:{:02}:{:02}", hours, minutes, secs)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Moving,
    Walking,
}

impl Pace {
    pub fn classify(minutes_per_mile: f64) -> Self {
        if minutes_per_mile < WALKING_MINUTES_PER_MILE {
            Pace::Moving
        } else {
            Pace::Walking
        }
    }
}

/// Figures for one released batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentStats {
    pub feet: f64,
    pub elapsed_seconds: f64,
    pub minutes_per_mile: f64,
    pub pace: Pace,
}

impl SegmentStats {
    /// Derive stats from a batch. Returns `None` for fewer than two points.
    pub fn from_batch(batch: &[TrackPoint]) -> Option<Self> {
        if batch.len() < 2 {
            return None;
        }

        let feet: f64 = batch.windows(2).map(|w| w[1].distance_to(&w[0])).sum();
        let first = batch[0].timestamp;
        let last = batch[batch.len() - 1].timestamp;
        let elapsed_seconds = last.signed_duration_since(first).num_milliseconds() as f64 / 1000.0;

        Some(Self::new(feet, elapsed_seconds))
    }

    pub fn new(feet: f64, elapsed_seconds: f64) -> Self {
        let minutes_per_mile = minutes_per_mile(feet, elapsed_seconds);
        Self {
            feet,
            elapsed_seconds,
            minutes_per_mile,
            pace: Pace::classify(minutes_per_mile),
        }
    }

    pub fn is_moving(&self) -> bool {
        self.pace == Pace::Moving
    }

    /// Label shown next to the running totals.
    pub fn pace_label(&self) -> String {
        match self.pace {
            Pace::Moving => format!("{:.2} min/mi", self.minutes_per_mile),
            Pace::Walking => "walking".to_string(),
        }
    }
}

/// Moving totals for the track currently being drained.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackTally {
    pub moving_feet: f64,
    pub moving_seconds: f64,
    pub walking_segments: usize,
    pub points: usize,
}

impl TrackTally {
    pub fn record(&mut self, segment: &SegmentStats, points: usize) {
        self.points += points;
        if segment.is_moving() {
            self.moving_feet += segment.feet;
            self.moving_seconds += segment.elapsed_seconds;
        } else {
            self.walking_segments += 1;
        }
    }
}

/// Run-wide moving totals, owned by the player for one playback run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaybackStats {
    pub total_moving_seconds: f64,
    pub total_moving_feet: f64,
    pub tracks_completed: usize,
    pub total_points: usize,
}

impl PlaybackStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fold a finished track into the run totals.
    pub fn complete_track(&mut self, tally: &TrackTally) {
        self.total_moving_feet += tally.moving_feet;
        self.total_moving_seconds += tally.moving_seconds;
        self.total_points += tally.points;
        self.tracks_completed += 1;
    }

    /// Moving miles so far, including the in-progress track's tally.
    pub fn cumulative_miles(&self, current: &TrackTally) -> f64 {
        truncated_miles(self.total_moving_feet + current.moving_feet)
    }

    /// Run summary. With no moving distance or time the pace is reported as 0.
    pub fn summary(&self) -> PlaybackSummary {
        let miles = self.total_moving_feet / FEET_PER_MILE;
        let pace = if self.total_moving_feet > 0.0 && self.total_moving_seconds > 0.0 {
            minutes_per_mile(self.total_moving_feet, self.total_moving_seconds)
        } else {
            0.0
        };
        PlaybackSummary {
            total_miles: truncate_hundredths(miles),
            total_tracks: self.tracks_completed,
            total_time: format_seconds(self.total_moving_seconds),
            avg_miles_per_track: truncate_hundredths(miles / self.tracks_completed as f64),
            minutes_per_mile: pace,
            total_points: self.total_points,
            total_moving_feet: self.total_moving_feet,
            total_moving_seconds: self.total_moving_seconds,
        }
    }
}

/// End-of-run report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSummary {
    pub total_miles: f64,
    pub total_tracks: usize,
    pub total_time: String,
    pub avg_miles_per_track: f64,
    pub minutes_per_mile: f64,
    pub total_points: usize,
    pub total_moving_feet: f64,
    pub total_moving_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::{RawPoint, Track};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(3661.0), "1:01:01");
        assert_eq!(format_seconds(0.0), "0:00:00");
        assert_eq!(format_seconds(59.9), "0:00:59");
        assert_eq!(format_seconds(36000.0), "10:00:00");
    }

    #[test]
    fn test_truncate_not_round() {
        assert_eq!(truncate_hundredths(9.999), 9.99);
        assert_eq!(truncate_hundredths(1.005), 1.0);
        assert_eq!(truncate_hundredths(2.0), 2.0);
    }

    #[test]
    fn test_ten_minute_mile_is_moving() {
        let stats = SegmentStats::new(5280.0, 600.0);
        assert_eq!(stats.minutes_per_mile, 10.0);
        assert_eq!(stats.pace, Pace::Moving);
        assert_eq!(stats.pace_label(), "10.00 min/mi");
    }

    #[test]
    fn test_twenty_minute_mile_is_walking() {
        let stats = SegmentStats::new(5280.0, 1200.0);
        assert_eq!(stats.minutes_per_mile, 20.0);
        assert_eq!(stats.pace, Pace::Walking);
        assert_eq!(stats.pace_label(), "walking");

        let mut tally = TrackTally::default();
        tally.record(&stats, 2);
        assert_eq!(tally.moving_feet, 0.0);
        assert_eq!(tally.moving_seconds, 0.0);
        assert_eq!(tally.walking_segments, 1);
    }

    #[test]
    fn test_fifteen_minute_mile_is_walking() {
        let stats = SegmentStats::new(5280.0, 900.0);
        assert_eq!(stats.minutes_per_mile, 15.0);
        assert_eq!(stats.pace, Pace::Walking);
    }

    #[test]
    fn test_stationary_segment_is_walking() {
        let stats = SegmentStats::new(0.0, 30.0);
        assert_eq!(stats.pace, Pace::Walking);
    }

    #[test]
    fn test_from_batch() {
        let t0 = Utc.with_ymd_and_hms(2023, 3, 4, 7, 30, 0).unwrap();
        // Roughly a quarter mile east along the equator in 90 seconds
        let track = Track::new(
            "t",
            vec![
                RawPoint::new(0.0, 0.0, 0.0, t0),
                RawPoint::new(0.0, 0.002, 0.0, t0 + Duration::seconds(45)),
                RawPoint::new(0.0, 0.0036, 0.0, t0 + Duration::seconds(90)),
            ],
        )
        .unwrap();

        let stats = SegmentStats::from_batch(track.points()).unwrap();
        assert_eq!(stats.feet, track.total_feet());
        assert_eq!(stats.elapsed_seconds, 90.0);
        assert!(stats.minutes_per_mile > 5.0 && stats.minutes_per_mile < 7.0);
        assert!(stats.is_moving());

        assert!(SegmentStats::from_batch(&track.points()[..1]).is_none());
    }

    #[test]
    fn test_two_track_summary() {
        let mut stats = PlaybackStats::new();
        for _ in 0..2 {
            let mut tally = TrackTally::default();
            tally.record(&SegmentStats::new(2640.0, 300.0), 5);
            tally.record(&SegmentStats::new(2640.0, 300.0), 5);
            stats.complete_track(&tally);
        }

        let summary = stats.summary();
        assert_eq!(summary.total_miles, 2.0);
        assert_eq!(summary.total_tracks, 2);
        assert_eq!(summary.avg_miles_per_track, 1.0);
        assert_eq!(summary.minutes_per_mile, 10.0);
        assert_eq!(summary.total_time, "0:20:00");
        assert_eq!(summary.total_points, 20);
    }

    #[test]
    fn test_all_walking_summary_has_zero_pace() {
        let mut stats = PlaybackStats::new();
        let mut tally = TrackTally::default();
        tally.record(&SegmentStats::new(300.0, 600.0), 4);
        stats.complete_track(&tally);

        let summary = stats.summary();
        assert_eq!(summary.minutes_per_mile, 0.0);
        assert_eq!(summary.total_miles, 0.0);
        assert_eq!(summary.total_time, "0:00:00");
        assert_eq!(
            serde_json::to_value(&summary).unwrap()["minutes_per_mile"],
            serde_json::json!(0.0)
        );
    }

    #[test]
    fn test_cumulative_miles_skips_walking() {
        let mut stats = PlaybackStats::new();
        let mut first = TrackTally::default();
        first.record(&SegmentStats::new(5280.0, 600.0), 10);
        stats.complete_track(&first);

        let mut current = TrackTally::default();
        current.record(&SegmentStats::new(2640.0, 300.0), 4);
        current.record(&SegmentStats::new(5280.0, 3600.0), 4);
        assert_eq!(stats.cumulative_miles(&current), 1.5);

        stats.reset();
        assert_eq!(stats, PlaybackStats::default());
    }
}
