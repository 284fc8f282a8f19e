//! Geographic calculations

use crate::types::Location;

/// Earth radius in miles
const EARTH_RADIUS_MI: f64 = 3959.0;

/// Road distance coefficient (straight line to road)
const ROAD_COEFFICIENT: f64 = 1.3;

/// Calculate Haversine distance between two points in miles
pub fn haversine_miles(from: &Location, to: &Location) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lng - from.lng).to_radians();

    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_MI * c
}

/// Estimate road distance from straight-line distance
pub fn road_distance_miles(from: &Location, to: &Location) -> f64 {
    haversine_miles(from, to) * ROAD_COEFFICIENT
}

/// Linear interpolation between two points.
///
/// `fraction` is expected in `[0, 1]`; coordinates are rounded to six
/// decimals and the name is left empty. Stop placement along a leg is
/// illustrative, not navigational, so a straight line suffices.
pub fn interpolate(start: &Location, end: &Location, fraction: f64) -> Location {
    let lat = start.lat + (end.lat - start.lat) * fraction;
    let lng = start.lng + (end.lng - start.lng) * fraction;
    Location {
        lat: round6(lat),
        lng: round6(lng),
        name: String::new(),
    }
}

fn round6(v: f64) -> f64 {
    (v * 1_000_000.0).round() / 1_000_000.0
}
