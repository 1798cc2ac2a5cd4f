// src/timelapse/segmenter.rs
//! Time-paced batching of track points
//!
//! A [`Segmenter`] walks one track against a virtual playback clock that runs
//! `speed_multiplier` times faster than the wall clock. Each call to
//! [`Segmenter::next_segment`] releases every point whose recorded timestamp
//! the playback clock has passed. A batch never holds a single point while
//! more points exist, and a lone trailing point is folded into the batch
//! before it; in both cases the segmenter sleeps until the playback clock
//! reaches that point.

use super::stop::StopSignal;
use crate::{
    error::{Result, TimelapseError},
    track::{point::validate_points, TrackPoint},
};
use chrono::{DateTime, Duration as PlaybackDuration, Utc};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmenterState {
    NotStarted,
    Running,
    Exhausted,
}

pub struct Segmenter<'a> {
    points: &'a [TrackPoint],
    speed_multiplier: f64,
    next_index: usize,
    playback_clock: DateTime<Utc>,
    wall_clock_reference: Instant,
    state: SegmenterState,
}

/// Build a segmenter over `points` replayed at `speed_multiplier`.
pub fn create_segmenter(points: &[TrackPoint], speed_multiplier: f64) -> Result<Segmenter<'_>> {
    Segmenter::new(points, speed_multiplier)
}

impl<'a> Segmenter<'a> {
    pub fn new(points: &'a [TrackPoint], speed_multiplier: f64) -> Result<Self> {
        validate_speed(speed_multiplier)?;
        validate_points("segmenter input", points)?;

        Ok(Self {
            points,
            speed_multiplier,
            next_index: 0,
            playback_clock: points[0].timestamp,
            wall_clock_reference: Instant::now(),
            state: SegmenterState::NotStarted,
        })
    }

    /// Anchor the playback clock to the first point at the current instant.
    /// Only the first call has any effect.
    pub fn synchronize(&mut self) {
        if self.state == SegmenterState::NotStarted {
            self.state = SegmenterState::Running;
            self.wall_clock_reference = Instant::now();
            self.playback_clock = self.points[0].timestamp;
        }
    }

    /// Produce the next batch of points, or `None` once the track is drained.
    ///
    /// May sleep to honour the no-singleton rule. If `stop` fires while
    /// sleeping, returns `SuspensionAborted` and delivers nothing; the points
    /// scanned during the aborted call stay unconsumed.
    pub async fn next_segment(&mut self, stop: &StopSignal) -> Result<Option<Vec<TrackPoint>>> {
        self.synchronize();

        if self.state == SegmenterState::Exhausted || self.next_index + 1 >= self.points.len() {
            self.state = SegmenterState::Exhausted;
            return Ok(None);
        }

        let now = Instant::now();
        let real_elapsed = now.saturating_duration_since(self.wall_clock_reference);
        self.playback_clock = self.playback_clock + self.to_playback(real_elapsed);
        self.wall_clock_reference = now;

        let len = self.points.len();
        let mut index = self.next_index;
        let mut batch = Vec::new();

        while index < len && self.points[index].timestamp <= self.playback_clock {
            batch.push(self.points[index]);
            index += 1;
        }

        // Fold in upcoming points until the batch has two, and never leave
        // exactly one point behind.
        while index < len && (batch.len() < 2 || len - index == 1) {
            let next = self.points[index];
            self.advance_to(next.timestamp, stop).await?;
            batch.push(next);
            index += 1;
        }

        self.next_index = index;
        Ok(Some(batch))
    }

    /// Current position on the recording's timeline.
    ///
    /// While running this projects the playback clock forward by the real
    /// time since the last synchronization, capped at the final point.
    pub fn current_playback_time(&self) -> DateTime<Utc> {
        if self.state != SegmenterState::Running {
            return self.playback_clock;
        }

        let since = Instant::now().saturating_duration_since(self.wall_clock_reference);
        let projected = self.playback_clock + self.to_playback(since);
        projected.min(self.points[self.points.len() - 1].timestamp)
    }

    pub fn state(&self) -> SegmenterState {
        self.state
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == SegmenterState::Exhausted
    }

    /// Points not yet released in a batch.
    pub fn remaining(&self) -> usize {
        self.points.len() - self.next_index
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    /// Sleep until the playback clock reaches `target`, then move both clocks
    /// forward by exactly that amount.
    async fn advance_to(&mut self, target: DateTime<Utc>, stop: &StopSignal) -> Result<()> {
        let gap = target.signed_duration_since(self.playback_clock);
        let delay = self.to_real(gap);

        tracing::debug!(
            "Waiting {:?} for point at {} (playback clock {})",
            delay,
            target.to_rfc3339(),
            self.playback_clock.to_rfc3339()
        );
        stop.sleep(delay).await?;

        self.playback_clock = self.playback_clock.max(target);
        self.wall_clock_reference += delay;
        Ok(())
    }

    fn to_playback(&self, real: Duration) -> PlaybackDuration {
        let nanos = real.as_nanos() as f64 * self.speed_multiplier;
        PlaybackDuration::nanoseconds(nanos as i64)
    }

    fn to_real(&self, playback: PlaybackDuration) -> Duration {
        let seconds = playback.to_std().unwrap_or_default().as_secs_f64() / self.speed_multiplier;
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
    }
}

pub(crate) fn validate_speed(speed_multiplier: f64) -> Result<()> {
    if speed_multiplier.is_finite() && speed_multiplier > 0.0 {
        Ok(())
    } else {
        Err(TimelapseError::Configuration(format!(
            "speed multiplier must be a positive number, got {}",
            speed_multiplier
        )))
    }
}
