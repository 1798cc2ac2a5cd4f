// src/track/distance.rs
//! Great-circle distance between GPS fixes

/// Mean Earth radius used by the haversine formula, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Feet per kilometre.
pub const FEET_PER_KM: f64 = 3280.8398950131;

/// Feet per statute mile.
pub const FEET_PER_MILE: f64 = 5280.0;

/// Haversine distance between two lat/lon pairs (degrees), in feet.
///
/// Pure and deterministic: the same inputs always produce the same bits, so
/// callers may sum many results and compare totals exactly. NaN inputs
/// propagate to a NaN result.
pub fn distance_feet(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let half_lat = (d_lat / 2.0).sin();
    let half_lon = (d_lon / 2.0).sin();

    let a = half_lat * half_lat
        + lat1.to_radians().cos() * lat2.to_radians().cos() * half_lon * half_lon;
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c * FEET_PER_KM
}
