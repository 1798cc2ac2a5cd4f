// src/track/point.rs
//! Track point and track data structures

use super::distance::{distance_feet, FEET_PER_MILE};
use crate::error::{Result, TimelapseError};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One fix as handed over by a point-sequence source, before annotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,       // meters
    pub timestamp: DateTime<Utc>,
}

impl RawPoint {
    pub fn new(latitude: f64, longitude: f64, elevation: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
            timestamp,
        }
    }
}

/// A single GPS fix with distances derived at load time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,              // meters
    pub timestamp: DateTime<Utc>,
    pub distance_from_previous: f64, // feet, 0 for the first point
    pub cumulative_distance: f64,    // feet since the start of the track (or run)
}

impl TrackPoint {
    /// Distance in feet from `other` to this point.
    pub fn distance_to(&self, other: &TrackPoint) -> f64 {
        distance_feet(self.latitude, self.longitude, other.latitude, other.longitude)
    }

    /// Copy of this point with its cumulative distance counted from an
    /// earlier origin, `offset_feet` before the start of its own track.
    pub fn rebased(&self, offset_feet: f64) -> Self {
        Self {
            cumulative_distance: self.cumulative_distance + offset_feet,
            ..*self
        }
    }
}

/// A titled, time-ordered sequence of track points.
///
/// Only constructible through [`Track::new`], so every `Track` has at least
/// one point and non-decreasing timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    title: String,
    points: Vec<TrackPoint>,
}

impl Track {
    /// Validate raw points and annotate per-point and cumulative distance.
    pub fn new(title: impl Into<String>, raw: Vec<RawPoint>) -> Result<Self> {
        let title = title.into();
        validate_points(&title, &raw)?;

        let mut points = Vec::with_capacity(raw.len());
        let mut cumulative = 0.0;
        let mut previous: Option<&RawPoint> = None;

        for p in &raw {
            let step = match previous {
                Some(prev) => distance_feet(p.latitude, p.longitude, prev.latitude, prev.longitude),
                None => 0.0,
            };
            cumulative += step;
            points.push(TrackPoint {
                latitude: p.latitude,
                longitude: p.longitude,
                elevation: p.elevation,
                timestamp: p.timestamp,
                distance_from_previous: step,
                cumulative_distance: cumulative,
            });
            previous = Some(p);
        }

        Ok(Self { title, points })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the track holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total recorded distance in feet, walking stretches included.
    pub fn total_feet(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.cumulative_distance)
    }

    pub fn total_miles(&self) -> f64 {
        self.total_feet() / FEET_PER_MILE
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.points[0].timestamp
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.points[self.points.len() - 1].timestamp
    }

    /// Wall time covered by the recording.
    pub fn recorded_duration(&self) -> Duration {
        self.end_time().signed_duration_since(self.start_time())
    }
}

/// Check that a point sequence can be scheduled: non-empty, and every
/// timestamp at or after the one before it.
pub fn validate_points<P: Timestamped>(title: &str, points: &[P]) -> Result<()> {
    if points.is_empty() {
        return Err(TimelapseError::invalid_input(format!(
            "track '{}' has no points",
            title
        )));
    }

    for (i, pair) in points.windows(2).enumerate() {
        if pair[1].timestamp() < pair[0].timestamp() {
            return Err(TimelapseError::invalid_input(format!(
                "track '{}': point {} ({}) is earlier than point {} ({})",
                title,
                i + 1,
                pair[1].timestamp().to_rfc3339(),
                i,
                pair[0].timestamp().to_rfc3339()
            )));
        }
    }

    Ok(())
}

/// Anything carrying a recording instant.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

impl Timestamped for RawPoint {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Timestamped for TrackPoint {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
