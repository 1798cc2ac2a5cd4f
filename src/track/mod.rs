// src/track/mod.rs
//! Track data: points, distances and GPX loading

pub mod distance;
pub mod loader;
pub mod point;

pub use distance::{distance_feet, FEET_PER_MILE};
pub use loader::{load_gpx_file, parse_gpx};
pub use point::{RawPoint, Track, TrackPoint};
