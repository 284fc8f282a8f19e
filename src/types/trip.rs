//! Trip plan response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DutyStatus, Location, Segment, SegmentKind};
use crate::services::eld::DailyLog;

/// A segment as serialized in the plan response.
///
/// Instants are RFC 3339; distance is rounded to 0.1 mi and duration to
/// 0.01 h.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSegment {
    pub segment_type: SegmentKind,
    pub duty_status: DutyStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub start_location: Location,
    pub end_location: Location,
    pub distance_miles: f64,
    pub duration_hours: f64,
    pub reason: String,
}

impl From<&Segment> for ApiSegment {
    fn from(seg: &Segment) -> Self {
        Self {
            segment_type: seg.kind,
            duty_status: seg.duty_status,
            start_time: seg.start,
            end_time: seg.end,
            start_location: seg.start_location.clone(),
            end_location: seg.end_location.clone(),
            distance_miles: round1(seg.distance_miles),
            duration_hours: round2(seg.duration_hours()),
            reason: seg.reason.clone(),
        }
    }
}

/// A stop (any non-drive segment) in the plan response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopInfo {
    #[serde(rename = "type")]
    pub stop_type: SegmentKind,
    pub location: Location,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_hours: f64,
    pub reason: String,
}

impl From<&Segment> for StopInfo {
    fn from(seg: &Segment) -> Self {
        Self {
            stop_type: seg.kind,
            location: seg.start_location.clone(),
            start_time: seg.start,
            end_time: seg.end,
            duration_hours: round2(seg.duration_hours()),
            reason: seg.reason.clone(),
        }
    }
}

/// Headline numbers for the whole trip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripSummary {
    pub total_miles: f64,
    pub total_driving_hours: f64,
    pub total_trip_hours: f64,
    pub number_of_stops: usize,
    pub number_of_days: usize,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// The three resolved trip locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripLocations {
    pub current: Location,
    pub pickup: Location,
    pub dropoff: Location,
}

/// Route polylines for map display, GeoJSON `[lng, lat]` order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteGeometrySet {
    pub to_pickup: Vec<[f64; 2]>,
    pub to_dropoff: Vec<[f64; 2]>,
}

/// Full payload of a successful `haulplan.trip.plan` reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTripResponse {
    pub trip_summary: TripSummary,
    pub locations: TripLocations,
    pub route_geometry: RouteGeometrySet,
    pub segments: Vec<ApiSegment>,
    pub stops: Vec<StopInfo>,
    pub eld_logs: Vec<DailyLog>,
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn api_segment_rounds_distance_and_duration() {
        let loc = Location::new(39.1, -94.6, "Kansas City");
        let seg = Segment {
            kind: SegmentKind::Drive,
            duty_status: DutyStatus::Driving,
            start: Utc.with_ymd_and_hms(2025, 1, 1, 6, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 1, 1, 9, 38, 0).unwrap(),
            start_location: loc.clone(),
            end_location: loc,
            distance_miles: 199.9583,
            reason: "Driving".to_string(),
        };

        let api = ApiSegment::from(&seg);
        assert_eq!(api.distance_miles, 200.0);
        // 3h38m = 3.6333... → 3.63
        assert_eq!(api.duration_hours, 3.63);
    }

    #[test]
    fn stop_info_uses_start_location_and_kind() {
        let loc = Location::new(35.0, -101.0, "");
        let seg = Segment {
            kind: SegmentKind::Fuel,
            duty_status: DutyStatus::OnDutyNotDriving,
            start: Utc.with_ymd_and_hms(2025, 1, 2, 12, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 1, 2, 12, 30, 0).unwrap(),
            start_location: loc.clone(),
            end_location: loc.clone(),
            distance_miles: 0.0,
            reason: "Fuel stop".to_string(),
        };

        let stop = StopInfo::from(&seg);
        assert_eq!(stop.stop_type, SegmentKind::Fuel);
        assert_eq!(stop.location, loc);
        assert_eq!(stop.duration_hours, 0.5);
    }
}
