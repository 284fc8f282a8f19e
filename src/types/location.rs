//! Location and route leg types

use serde::{Deserialize, Serialize};

/// A geographic point with an optional display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub name: String,
}

impl Location {
    pub fn new(lat: f64, lng: f64, name: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            name: name.into(),
        }
    }
}

/// What a leg is driven for; determines the on-duty work at its end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegType {
    DriveToPickup,
    DriveToDropoff,
}

/// A directed route between two resolved points, as produced by the
/// routing service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteLeg {
    pub start: Location,
    pub end: Location,
    pub distance_miles: f64,
    pub leg_type: LegType,
}
