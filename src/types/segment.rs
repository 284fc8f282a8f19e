//! Duty segments, the planner's output intervals

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Location;

/// Federal duty status as recorded on an ELD log sheet.
///
/// `on_duty` is accepted on deserialization as a legacy alias of
/// `on_duty_not_driving`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyStatus {
    OffDuty,
    SleeperBerth,
    Driving,
    #[serde(alias = "on_duty")]
    OnDutyNotDriving,
}

impl DutyStatus {
    /// Map a free-form status string to a canonical duty status.
    /// Unknown strings collapse to off-duty.
    pub fn from_input(s: &str) -> Self {
        match s {
            "off_duty" => Self::OffDuty,
            "sleeper_berth" => Self::SleeperBerth,
            "driving" => Self::Driving,
            "on_duty_not_driving" | "on_duty" => Self::OnDutyNotDriving,
            _ => Self::OffDuty,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OffDuty => "off_duty",
            Self::SleeperBerth => "sleeper_berth",
            Self::Driving => "driving",
            Self::OnDutyNotDriving => "on_duty_not_driving",
        }
    }
}

/// Kind of activity a segment represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Drive,
    Break,
    Rest,
    Fuel,
    Pickup,
    Dropoff,
}

impl SegmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drive => "drive",
            Self::Break => "break",
            Self::Rest => "rest",
            Self::Fuel => "fuel",
            Self::Pickup => "pickup",
            Self::Dropoff => "dropoff",
        }
    }

    /// Whether this kind shows up in the response's stop list
    pub fn is_stop(&self) -> bool {
        !matches!(self, Self::Drive)
    }
}

/// A single homogeneous time interval of one duty activity.
///
/// Segments are emitted in order and chain by value: the end of one segment
/// is the start of the next within a leg.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub duty_status: DutyStatus,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub start_location: Location,
    pub end_location: Location,
    pub distance_miles: f64,
    pub reason: String,
}

impl Segment {
    pub fn duration_hours(&self) -> f64 {
        (self.end - self.start).num_seconds() as f64 / 3600.0
    }
}
