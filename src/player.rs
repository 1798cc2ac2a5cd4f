// src/player.rs
//! Sequential playback of one or more tracks

use crate::{
    display::{PathRenderer, SegmentSnapshot, StatsDisplay},
    error::{Result, TimelapseError},
    timelapse::{
        segmenter::validate_speed,
        stats::{PlaybackStats, TrackTally},
        PlaybackSummary, SegmentStats, Segmenter, StopSignal,
    },
    track::{Track, TrackPoint},
};

/// Drains tracks in order through their segmenters, forwarding each batch to
/// the renderer and the running statistics to the display.
pub struct Player {
    speed_multiplier: f64,
    stop: StopSignal,
}

impl Player {
    pub fn new(speed_multiplier: f64) -> Result<Self> {
        Self::with_stop_signal(speed_multiplier, StopSignal::new())
    }

    /// Create a player that aborts when `stop` fires.
    pub fn with_stop_signal(speed_multiplier: f64, stop: StopSignal) -> Result<Self> {
        validate_speed(speed_multiplier)?;
        Ok(Self {
            speed_multiplier,
            stop,
        })
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    /// A handle that stops this player when fired.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Play every track in order and return the run summary.
    ///
    /// On `SuspensionAborted` no summary is shown; whatever the display last
    /// showed stays as it is.
    pub async fn run<R, D>(
        &self,
        tracks: &[Track],
        renderer: &mut R,
        display: &mut D,
    ) -> Result<PlaybackSummary>
    where
        R: PathRenderer + ?Sized,
        D: StatsDisplay + ?Sized,
    {
        if tracks.is_empty() {
            return Err(TimelapseError::invalid_input("no tracks to play"));
        }

        let mut stats = PlaybackStats::new();
        let mut offset_feet = 0.0;

        for (index, track) in tracks.iter().enumerate() {
            if self.stop.is_stopped() {
                return Err(TimelapseError::SuspensionAborted);
            }

            tracing::info!(
                "Playing track {}/{}: '{}' ({} points)",
                index + 1,
                tracks.len(),
                track.title(),
                track.len()
            );

            let mut segmenter = Segmenter::new(track.points(), self.speed_multiplier)?;
            segmenter.synchronize();
            renderer.begin_track(track).await?;

            let mut tally = TrackTally::default();
            // Last point of the previous batch, so each segment starts where
            // the one before it ended and the segments cover the whole track.
            let mut carried: Option<TrackPoint> = None;
            while let Some(batch) = segmenter.next_segment(&self.stop).await? {
                let span: Vec<TrackPoint> = carried.iter().chain(batch.iter()).copied().collect();
                carried = batch.last().copied();
                let Some(segment) = SegmentStats::from_batch(&span) else {
                    continue;
                };
                tally.record(&segment, batch.len());

                if !segment.is_moving() {
                    tracing::debug!(
                        "Walking segment excluded: {:.1} ft over {:.0} s ({} min/mi)",
                        segment.feet,
                        segment.elapsed_seconds,
                        segment.minutes_per_mile
                    );
                }

                let rebased: Vec<TrackPoint> =
                    batch.iter().map(|p| p.rebased(offset_feet)).collect();
                renderer.append(&rebased).await?;

                if self.stop.is_stopped() {
                    tracing::info!("Playback stopped during '{}'", track.title());
                    return Err(TimelapseError::SuspensionAborted);
                }

                let last = batch[batch.len() - 1].timestamp;
                let (date, time_of_day) = SegmentSnapshot::date_and_time(last);
                display.show_segment(&SegmentSnapshot {
                    track_title: track.title().to_string(),
                    track_number: index + 1,
                    track_count: tracks.len(),
                    date,
                    time_of_day,
                    pace_label: segment.pace_label(),
                    cumulative_miles: stats.cumulative_miles(&tally),
                    points_drawn: stats.total_points + tally.points,
                    playback_time: last,
                })?;
            }

            tracing::info!(
                "Finished '{}': {:.2} moving mi in {:.0} s, {} walking segment(s)",
                track.title(),
                tally.moving_feet / crate::track::FEET_PER_MILE,
                tally.moving_seconds,
                tally.walking_segments
            );
            stats.complete_track(&tally);
            offset_feet += track.total_feet();
        }

        let summary = stats.summary();
        display.show_summary(&summary)?;
        Ok(summary)
    }
}

/// Play `tracks` at `speed_multiplier` with no external stop control.
pub async fn run_playback<R, D>(
    tracks: &[Track],
    speed_multiplier: f64,
    renderer: &mut R,
    display: &mut D,
) -> Result<PlaybackSummary>
where
    R: PathRenderer + ?Sized,
    D: StatsDisplay + ?Sized,
{
    Player::new(speed_multiplier)?
        .run(tracks, renderer, display)
        .await
}
