//! Trip plan orchestration.
//!
//! Resolves the three trip locations, fetches the two route legs, runs the
//! HOS planner and the ELD projector, and assembles the full plan response.

use std::sync::Arc;

use anyhow::Result;
use thiserror::Error;
use tracing::info;

use crate::services::eld::generate_daily_logs;
use crate::services::geocoding::Geocoder;
use crate::services::routing::RoutingService;
use crate::services::trip_planner::{plan_trip, PlanError};
use crate::types::{
    ApiSegment, LegType, Location, PlanTripRequest, PlanTripResponse, RouteGeometrySet, RouteLeg,
    SegmentKind, StopInfo, TripLocations, TripSummary,
};

/// Longest accepted free-text address
const MAX_ADDRESS_LEN: usize = 500;

#[derive(Debug, Error)]
pub enum TripBuildError {
    #[error("{0}")]
    Validation(String),
    #[error("Could not resolve location: {0}")]
    LocationNotFound(String),
    #[error("Routing failed: {0}")]
    Routing(#[source] anyhow::Error),
    #[error(transparent)]
    Planning(#[from] PlanError),
}

/// Builds trip plans from resolved or free-text locations
pub struct TripBuilder {
    geocoder: Arc<dyn Geocoder>,
    routing: Arc<dyn RoutingService>,
}

impl TripBuilder {
    pub fn new(geocoder: Arc<dyn Geocoder>, routing: Arc<dyn RoutingService>) -> Self {
        Self { geocoder, routing }
    }

    pub async fn build(&self, request: &PlanTripRequest) -> Result<PlanTripResponse, TripBuildError> {
        validate(request)?;

        let current = self
            .resolve(&request.current_location, request.current_location_coords.as_ref())
            .await?;
        let pickup = self
            .resolve(&request.pickup_location, request.pickup_location_coords.as_ref())
            .await?;
        let dropoff = self
            .resolve(&request.dropoff_location, request.dropoff_location_coords.as_ref())
            .await?;

        let to_pickup = self
            .routing
            .route(&current, &pickup)
            .await
            .map_err(TripBuildError::Routing)?;
        let to_dropoff = self
            .routing
            .route(&pickup, &dropoff)
            .await
            .map_err(TripBuildError::Routing)?;

        let legs = [
            RouteLeg {
                start: current.clone(),
                end: pickup.clone(),
                distance_miles: to_pickup.distance_miles,
                leg_type: LegType::DriveToPickup,
            },
            RouteLeg {
                start: pickup.clone(),
                end: dropoff.clone(),
                distance_miles: to_dropoff.distance_miles,
                leg_type: LegType::DriveToDropoff,
            },
        ];

        let segments = plan_trip(&legs, request.current_cycle_used, request.start_time)?;
        let eld_logs = generate_daily_logs(&segments, None);

        let stops: Vec<StopInfo> = segments
            .iter()
            .filter(|s| s.kind.is_stop())
            .map(StopInfo::from)
            .collect();

        let total_miles: f64 = segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Drive)
            .map(|s| s.distance_miles)
            .sum();
        let total_driving_hours: f64 = segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Drive)
            .map(|s| s.duration_hours())
            .sum();
        let total_trip_hours = match (segments.first(), segments.last()) {
            (Some(first), Some(last)) => (last.end - first.start).num_seconds() as f64 / 3600.0,
            _ => 0.0,
        };

        info!(
            miles = total_miles,
            days = eld_logs.len(),
            stops = stops.len(),
            "trip plan assembled"
        );

        Ok(PlanTripResponse {
            trip_summary: TripSummary {
                total_miles: round1(total_miles),
                total_driving_hours: round2(total_driving_hours),
                total_trip_hours: round2(total_trip_hours),
                number_of_stops: stops.len(),
                number_of_days: eld_logs.len(),
                start_time: segments.first().map(|s| s.start),
                end_time: segments.last().map(|s| s.end),
            },
            locations: TripLocations {
                current,
                pickup,
                dropoff,
            },
            route_geometry: RouteGeometrySet {
                to_pickup: to_pickup.geometry,
                to_dropoff: to_dropoff.geometry,
            },
            segments: segments.iter().map(ApiSegment::from).collect(),
            stops,
            eld_logs,
        })
    }

    /// Use the supplied coordinates when present, geocode otherwise.
    /// Either way the location ends up with a non-empty display name.
    async fn resolve(
        &self,
        query: &str,
        coords: Option<&Location>,
    ) -> Result<Location, TripBuildError> {
        if let Some(coords) = coords {
            let mut location = coords.clone();
            if location.name.is_empty() {
                location.name = query.to_string();
            }
            return Ok(location);
        }

        let resolved = self
            .geocoder
            .geocode(query)
            .await
            .map_err(|e| TripBuildError::LocationNotFound(format!("{query} ({e})")))?;

        match resolved {
            Some(mut location) => {
                if location.name.is_empty() {
                    location.name = query.to_string();
                }
                Ok(location)
            }
            None => Err(TripBuildError::LocationNotFound(query.to_string())),
        }
    }
}

fn validate(request: &PlanTripRequest) -> Result<(), TripBuildError> {
    let fields = [
        ("current_location", &request.current_location, &request.current_location_coords),
        ("pickup_location", &request.pickup_location, &request.pickup_location_coords),
        ("dropoff_location", &request.dropoff_location, &request.dropoff_location_coords),
    ];
    for (name, text, coords) in fields {
        if text.len() > MAX_ADDRESS_LEN {
            return Err(TripBuildError::Validation(format!(
                "{name} exceeds {MAX_ADDRESS_LEN} characters"
            )));
        }
        if text.trim().is_empty() && coords.is_none() {
            return Err(TripBuildError::Validation(format!("{name} is required")));
        }
    }

    let cycle = request.current_cycle_used;
    if !cycle.is_finite() || !(0.0..=70.0).contains(&cycle) {
        return Err(TripBuildError::Validation(format!(
            "current_cycle_used must be within 0..=70 hours, got {cycle}"
        )));
    }

    Ok(())
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::geocoding::MockGeocoder;
    use crate::services::routing::HaversineRouting;
    use chrono::{TimeZone, Utc};

    fn builder() -> TripBuilder {
        TripBuilder::new(
            Arc::new(MockGeocoder::new()),
            Arc::new(HaversineRouting::new()),
        )
    }

    fn request() -> PlanTripRequest {
        PlanTripRequest {
            current_location: "Chicago, IL".to_string(),
            pickup_location: "St. Louis, MO".to_string(),
            dropoff_location: "Dallas, TX".to_string(),
            current_location_coords: None,
            pickup_location_coords: None,
            dropoff_location_coords: None,
            current_cycle_used: 0.0,
            start_time: Some(Utc.with_ymd_and_hms(2025, 1, 1, 6, 0, 0).unwrap()),
        }
    }

    #[tokio::test]
    async fn builds_a_consistent_plan_end_to_end() {
        let response = builder().build(&request()).await.unwrap();

        assert!(!response.segments.is_empty());
        assert_eq!(response.trip_summary.number_of_days, response.eld_logs.len());
        assert_eq!(response.trip_summary.number_of_stops, response.stops.len());

        // Summary mileage matches the drive segments.
        let drive_miles: f64 = response
            .segments
            .iter()
            .filter(|s| s.segment_type == SegmentKind::Drive)
            .map(|s| s.distance_miles)
            .sum();
        assert!((response.trip_summary.total_miles - drive_miles).abs() < 0.5);

        // The first segment starts at the requested instant.
        assert_eq!(
            response.trip_summary.start_time,
            request().start_time
        );

        // Pickup and dropoff both appear as stops, in order.
        let kinds: Vec<SegmentKind> = response.stops.iter().map(|s| s.stop_type).collect();
        assert!(kinds.contains(&SegmentKind::Pickup));
        assert!(kinds.contains(&SegmentKind::Dropoff));

        // Geometry is present for both legs.
        assert!(!response.route_geometry.to_pickup.is_empty());
        assert!(!response.route_geometry.to_dropoff.is_empty());
    }

    #[tokio::test]
    async fn coords_bypass_geocoding_and_backfill_names() {
        let mut req = request();
        req.pickup_location_coords = Some(Location::new(38.627, -90.1994, ""));

        let response = builder().build(&req).await.unwrap();
        assert_eq!(response.locations.pickup.lat, 38.627);
        assert_eq!(response.locations.pickup.name, "St. Louis, MO");
    }

    #[tokio::test]
    async fn empty_address_is_a_validation_error() {
        let mut req = request();
        req.pickup_location = "  ".to_string();

        let err = builder().build(&req).await.unwrap_err();
        assert!(matches!(err, TripBuildError::Validation(_)));
    }

    #[tokio::test]
    async fn empty_address_with_coords_is_accepted() {
        let mut req = request();
        req.pickup_location = String::new();
        req.pickup_location_coords = Some(Location::new(38.627, -90.1994, "St. Louis"));

        assert!(builder().build(&req).await.is_ok());
    }

    #[tokio::test]
    async fn overlong_address_is_a_validation_error() {
        let mut req = request();
        req.dropoff_location = "x".repeat(501);

        let err = builder().build(&req).await.unwrap_err();
        assert!(matches!(err, TripBuildError::Validation(_)));
    }

    #[tokio::test]
    async fn cycle_out_of_range_is_a_validation_error() {
        let mut req = request();
        req.current_cycle_used = 70.5;

        let err = builder().build(&req).await.unwrap_err();
        assert!(matches!(err, TripBuildError::Validation(_)));
    }

    #[tokio::test]
    async fn plan_is_deterministic_for_fixed_inputs() {
        let a = builder().build(&request()).await.unwrap();
        let b = builder().build(&request()).await.unwrap();
        assert_eq!(a.trip_summary.total_miles, b.trip_summary.total_miles);
        assert_eq!(a.segments.len(), b.segments.len());
        assert_eq!(a.eld_logs, b.eld_logs);
    }
}
