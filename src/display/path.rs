// src/display/path.rs
//! In-memory path renderer

use super::PathRenderer;
use crate::{
    error::Result,
    track::{Track, TrackPoint},
};
use async_trait::async_trait;
use std::time::Duration;

/// Lat/lon bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Extent {
    fn around(point: &TrackPoint) -> Self {
        Self {
            min_lat: point.latitude,
            max_lat: point.latitude,
            min_lon: point.longitude,
            max_lon: point.longitude,
        }
    }

    fn include(&mut self, point: &TrackPoint) {
        self.min_lat = self.min_lat.min(point.latitude);
        self.max_lat = self.max_lat.max(point.latitude);
        self.min_lon = self.min_lon.min(point.longitude);
        self.max_lon = self.max_lon.max(point.longitude);
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    /// Scale width and height by `factor` around the centre.
    pub fn expand(&self, factor: f64) -> Self {
        let (lat, lon) = self.center();
        let half_lat = (self.max_lat - self.min_lat) / 2.0 * factor;
        let half_lon = (self.max_lon - self.min_lon) / 2.0 * factor;
        Self {
            min_lat: lat - half_lat,
            max_lat: lat + half_lat,
            min_lon: lon - half_lon,
            max_lon: lon + half_lon,
        }
    }
}

/// Keeps the drawn path and the extent a map view would zoom to.
pub struct PathRecorder {
    path: Vec<TrackPoint>,
    track_starts: Vec<usize>,
    extent: Option<Extent>,
    draw_delay: Duration,
}

impl PathRecorder {
    /// Factor the view extent is widened by around the drawn path.
    pub const VIEW_EXPANSION: f64 = 3.0;

    pub fn new() -> Self {
        Self::with_draw_delay(Duration::ZERO)
    }

    /// Simulate a redraw taking `draw_delay` per batch.
    pub fn with_draw_delay(draw_delay: Duration) -> Self {
        Self {
            path: Vec::new(),
            track_starts: Vec::new(),
            extent: None,
            draw_delay,
        }
    }

    pub fn path(&self) -> &[TrackPoint] {
        &self.path
    }

    /// Index into `path` where each track began.
    pub fn track_starts(&self) -> &[usize] {
        &self.track_starts
    }

    pub fn extent(&self) -> Option<Extent> {
        self.extent
    }

    /// The path extent widened by [`Self::VIEW_EXPANSION`] around its centre.
    pub fn view_extent(&self) -> Option<Extent> {
        self.extent.map(|e| e.expand(Self::VIEW_EXPANSION))
    }

    pub fn clear(&mut self) {
        self.path.clear();
        self.track_starts.clear();
        self.extent = None;
    }
}

impl Default for PathRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PathRenderer for PathRecorder {
    async fn begin_track(&mut self, track: &Track) -> Result<()> {
        tracing::debug!("Starting path for '{}' at index {}", track.title(), self.path.len());
        self.track_starts.push(self.path.len());
        Ok(())
    }

    async fn append(&mut self, batch: &[TrackPoint]) -> Result<()> {
        for point in batch {
            match self.extent.as_mut() {
                Some(extent) => extent.include(point),
                None => self.extent = Some(Extent::around(point)),
            }
        }
        self.path.extend_from_slice(batch);

        if !self.draw_delay.is_zero() {
            tokio::time::sleep(self.draw_delay).await;
        }
        Ok(())
    }
}
