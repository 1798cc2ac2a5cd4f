// src/display/plain.rs
//! Line-oriented display for pipes and logs

use super::{SegmentSnapshot, StatsDisplay};
use crate::{error::Result, timelapse::PlaybackSummary};
use std::io::{self, Stdout, Write};

pub struct PlainDisplay<W: Write = Stdout> {
    out: W,
    last_track: Option<usize>,
}

impl PlainDisplay<Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for PlainDisplay<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> PlainDisplay<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            last_track: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StatsDisplay for PlainDisplay<W> {
    fn show_segment(&mut self, snapshot: &SegmentSnapshot) -> Result<()> {
        if self.last_track != Some(snapshot.track_number) {
            writeln!(
                self.out,
                "== {} ({}/{})",
                snapshot.track_title, snapshot.track_number, snapshot.track_count
            )?;
            self.last_track = Some(snapshot.track_number);
        }

        writeln!(
            self.out,
            "{} {}  {:>14}  {:>7.2} mi  {} pts",
            snapshot.date,
            snapshot.time_of_day,
            snapshot.pace_label,
            snapshot.cumulative_miles,
            snapshot.points_drawn
        )?;
        Ok(())
    }

    fn show_summary(&mut self, summary: &PlaybackSummary) -> Result<()> {
        writeln!(self.out, "Total miles: {:.2}", summary.total_miles)?;
        writeln!(self.out, "Total tracks: {}", summary.total_tracks)?;
        writeln!(self.out, "Total time: {}", summary.total_time)?;
        writeln!(self.out, "Average distance: {:.2} mi", summary.avg_miles_per_track)?;
        writeln!(self.out, "Average pace: {:.2} min/mi", summary.minutes_per_mile)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_header_once_per_track() {
        let mut display = PlainDisplay::with_writer(Vec::new());
        let mut snapshot = SegmentSnapshot {
            track_title: "Morning".to_string(),
            track_number: 1,
            track_count: 1,
            date: "2023-03-04".to_string(),
            time_of_day: "07:30:20".to_string(),
            pace_label: "walking".to_string(),
            cumulative_miles: 0.0,
            points_drawn: 2,
            playback_time: Utc.with_ymd_and_hms(2023, 3, 4, 7, 30, 20).unwrap(),
        };
        display.show_segment(&snapshot).unwrap();
        snapshot.points_drawn = 4;
        snapshot.pace_label = "8.12 min/mi".to_string();
        display.show_segment(&snapshot).unwrap();

        let text = String::from_utf8(display.into_inner()).unwrap();
        assert_eq!(text.matches("== Morning (1/1)").count(), 1);
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("8.12 min/mi"));
    }

    #[test]
    fn test_summary_lines() {
        let mut display = PlainDisplay::with_writer(Vec::new());
        display
            .show_summary(&PlaybackSummary {
                total_miles: 3.41,
                total_tracks: 2,
                total_time: "0:41:07".to_string(),
                avg_miles_per_track: 1.7,
                minutes_per_mile: 12.05,
                total_points: 300,
                total_moving_feet: 18004.8,
                total_moving_seconds: 2467.0,
            })
            .unwrap();

        let text = String::from_utf8(display.into_inner()).unwrap();
        assert!(text.contains("Total miles: 3.41"));
        assert!(text.contains("Total time: 0:41:07"));
        assert!(text.contains("Average distance: 1.70 mi"));
        assert!(text.contains("Average pace: 12.05 min/mi"));
    }
}
