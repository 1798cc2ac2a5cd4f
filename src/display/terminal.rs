// src/display/terminal.rs
//! Terminal panel showing playback progress

use super::{SegmentSnapshot, StatsDisplay};
use crate::{error::Result, timelapse::PlaybackSummary};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType, DisableLineWrap, EnableLineWrap},
};
use std::io::{self, Stdout, Write};

/// Redraws a coloured panel after every batch.
pub struct TerminalDisplay<W: Write = Stdout> {
    out: W,
    speed_multiplier: f64,
    active: bool,
}

impl TerminalDisplay<Stdout> {
    pub fn new(speed_multiplier: f64) -> Self {
        Self::with_writer(io::stdout(), speed_multiplier)
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn with_writer(out: W, speed_multiplier: f64) -> Self {
        Self {
            out,
            speed_multiplier,
            active: false,
        }
    }

    pub fn into_inner(mut self) -> W
    where
        W: Default,
    {
        self.active = false;
        std::mem::take(&mut self.out)
    }

    fn enter(&mut self) -> Result<()> {
        if !self.active {
            execute!(self.out, Hide, DisableLineWrap)?;
            self.active = true;
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.active {
            execute!(self.out, Show, EnableLineWrap)?;
            self.active = false;
        }
        Ok(())
    }

    fn render_header(&mut self) -> Result<()> {
        execute!(
            self.out,
            SetForegroundColor(Color::Green),
            Print("=".repeat(60)),
            Print("\n"),
            Print(format!("GPX Timelapse - replaying at {}x", self.speed_multiplier)),
            Print("\n"),
            Print("=".repeat(60)),
            Print("\n"),
            ResetColor
        )?;
        Ok(())
    }

    fn render_footer(&mut self, hint: &str) -> Result<()> {
        execute!(
            self.out,
            SetForegroundColor(Color::Green),
            Print("=".repeat(60)),
            Print("\n"),
            Print(hint),
            Print("\n"),
            ResetColor
        )?;
        Ok(())
    }

    fn render_track_section(&mut self, snapshot: &SegmentSnapshot) -> Result<()> {
        execute!(
            self.out,
            SetForegroundColor(Color::Yellow),
            Print("TRACK:\n"),
            ResetColor,
            Print(format!(
                "  {} ({} of {})\n",
                snapshot.track_title, snapshot.track_number, snapshot.track_count
            )),
            Print(format!("  Date:      {:>12}\n", snapshot.date)),
            Print(format!("  Time:      {:>12}\n\n", snapshot.time_of_day))
        )?;
        Ok(())
    }

    fn render_progress_section(&mut self, snapshot: &SegmentSnapshot) -> Result<()> {
        let pace_color = if snapshot.pace_label == "walking" {
            Color::DarkGrey
        } else {
            Color::Cyan
        };

        execute!(
            self.out,
            SetForegroundColor(Color::Cyan),
            Print("PROGRESS:\n"),
            ResetColor,
            Print("  Pace:      "),
            SetForegroundColor(pace_color),
            Print(format!("{:>12}\n", snapshot.pace_label)),
            ResetColor,
            Print(format!("  Distance:  {:>12.2} mi\n", snapshot.cumulative_miles)),
            Print(format!("  Points:    {:>12}\n\n", snapshot.points_drawn))
        )?;
        Ok(())
    }

    fn render_summary_section(&mut self, summary: &PlaybackSummary) -> Result<()> {
        execute!(
            self.out,
            SetForegroundColor(Color::Magenta),
            Print("SUMMARY:\n"),
            ResetColor,
            Print(format!("  Total miles:     {:>10.2}\n", summary.total_miles)),
            Print(format!("  Total tracks:    {:>10}\n", summary.total_tracks)),
            Print(format!("  Total time:      {:>10}\n", summary.total_time)),
            Print(format!("  Avg miles/track: {:>10.2}\n", summary.avg_miles_per_track)),
            Print(format!("  Avg pace:        {:>10.2} min/mi\n\n", summary.minutes_per_mile))
        )?;
        Ok(())
    }
}

impl<W: Write> StatsDisplay for TerminalDisplay<W> {
    fn show_segment(&mut self, snapshot: &SegmentSnapshot) -> Result<()> {
        self.enter()?;
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;

        self.render_header()?;
        self.render_track_section(snapshot)?;
        self.render_progress_section(snapshot)?;
        self.render_footer("Press Ctrl+C to stop")?;

        self.out.flush()?;
        Ok(())
    }

    fn show_summary(&mut self, summary: &PlaybackSummary) -> Result<()> {
        self.enter()?;
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;

        self.render_header()?;
        self.render_summary_section(summary)?;
        self.render_footer("Playback complete")?;

        self.leave()?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Drop for TerminalDisplay<W> {
    fn drop(&mut self) {
        let _ = self.leave();
        let _ = self.out.flush();
    }
}
