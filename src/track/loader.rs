// src/track/loader.rs
//! GPX file loading
//!
//! XML handling is left to the `gpx` crate; this module only maps its
//! waypoints onto raw points and builds a validated [`Track`].

use super::point::{RawPoint, Track};
use crate::error::{Result, TimelapseError};
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Load every `trkpt` in a GPX file as a single track.
pub fn load_gpx_file(path: &Path) -> Result<Track> {
    let file = File::open(path).map_err(|e| {
        TimelapseError::Other(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let fallback_title = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    tracing::debug!("Loading GPX track from {}", path.display());
    parse_gpx(BufReader::new(file), &fallback_title)
}

/// Parse GPX data from any reader.
///
/// Points from all tracks and segments are concatenated in document order.
/// The title is the first track's `<name>`, or `fallback_title` when absent.
pub fn parse_gpx<R: Read>(reader: R, fallback_title: &str) -> Result<Track> {
    let gpx = gpx::read(reader)?;

    let title = gpx
        .tracks
        .iter()
        .find_map(|t| t.name.clone())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| fallback_title.to_string());

    let mut raw = Vec::new();
    for track in &gpx.tracks {
        for segment in &track.segments {
            for waypoint in &segment.points {
                raw.push(to_raw_point(&title, raw.len(), waypoint)?);
            }
        }
    }

    let track = Track::new(title, raw)?;
    tracing::info!(
        "Loaded track '{}': {} points, {:.2} mi recorded",
        track.title(),
        track.len(),
        track.total_miles()
    );
    Ok(track)
}

fn to_raw_point(title: &str, index: usize, waypoint: &gpx::Waypoint) -> Result<RawPoint> {
    let point = waypoint.point();

    let time = waypoint.time.as_ref().ok_or_else(|| {
        TimelapseError::invalid_input(format!(
            "track '{}': point {} has no <time>",
            title, index
        ))
    })?;
    let timestamp = parse_time(&time.format()?)?;

    Ok(RawPoint::new(
        point.y(),
        point.x(),
        waypoint.elevation.unwrap_or(0.0),
        timestamp,
    ))
}

fn parse_time(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| TimelapseError::Parse(format!("Invalid GPX time '{}': {}", text, e)))
}
