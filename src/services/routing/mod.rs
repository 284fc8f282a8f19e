//! Routing service for leg distance/duration estimates and polylines
//!
//! Three tiers: OSRM when reachable, OpenRouteService when an API key is
//! configured, and a straight-line estimator as the last resort.

mod ors;
mod osrm;

pub use ors::{OrsClient, OrsConfig};
pub use osrm::{OsrmClient, OsrmConfig};

use anyhow::Result;
use async_trait::async_trait;

use crate::services::geo::{haversine_miles, interpolate};
use crate::types::Location;

pub(crate) const METERS_PER_MILE: f64 = 1609.344;

/// A routed leg between two points.
///
/// Geometry is GeoJSON-ordered `[lng, lat]` pairs. The duration is the
/// provider's estimate and is informational only; the planner converts
/// distance to wheel time at its own fixed speed.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RouteEstimate {
    pub distance_miles: f64,
    pub duration_hours: f64,
    pub geometry: Vec<[f64; 2]>,
}

/// Routing service trait for abstraction (OSRM, straight-line, etc.)
#[async_trait]
pub trait RoutingService: Send + Sync {
    /// Estimate the driving route from one point to another
    async fn route(&self, from: &Location, to: &Location) -> Result<RouteEstimate>;

    /// Get service name for logging
    fn name(&self) -> &'static str;
}

/// Straight-line routing estimator.
///
/// Haversine distance scaled by a road coefficient, at highway truck
/// speed, with an interpolated straight-line polyline. Always available;
/// this is the fallback when no OSRM server is reachable, and the default
/// in tests.
pub struct HaversineRouting {
    /// Straight-line to road distance coefficient (default: 1.3)
    road_coefficient: f64,
    /// Average speed in mph for the duration estimate (default: 55)
    average_speed_mph: f64,
}

/// Points in the generated straight-line polyline
const FALLBACK_GEOMETRY_STEPS: usize = 50;

impl Default for HaversineRouting {
    fn default() -> Self {
        Self {
            road_coefficient: 1.3,
            average_speed_mph: 55.0,
        }
    }
}

impl HaversineRouting {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(road_coefficient: f64, average_speed_mph: f64) -> Self {
        Self {
            road_coefficient,
            average_speed_mph,
        }
    }
}

#[async_trait]
impl RoutingService for HaversineRouting {
    async fn route(&self, from: &Location, to: &Location) -> Result<RouteEstimate> {
        let road_miles = haversine_miles(from, to) * self.road_coefficient;
        let duration_hours = road_miles / self.average_speed_mph;

        let geometry = (0..=FALLBACK_GEOMETRY_STEPS)
            .map(|i| {
                let fraction = i as f64 / FALLBACK_GEOMETRY_STEPS as f64;
                let point = interpolate(from, to, fraction);
                [point.lng, point.lat]
            })
            .collect();

        Ok(RouteEstimate {
            distance_miles: round1(road_miles),
            duration_hours: round2(duration_hours),
            geometry,
        })
    }

    fn name(&self) -> &'static str {
        "haversine"
    }
}

/// Create routing service with automatic detection and fallback.
///
/// Tries OSRM first, then OpenRouteService when an API key is configured,
/// and settles on the straight-line estimator when neither answers its
/// health probe.
pub async fn create_routing_service_with_fallback(
    osrm_url: Option<String>,
    ors_config: Option<OrsConfig>,
) -> Box<dyn RoutingService> {
    use tracing::{info, warn};

    if let Some(url) = osrm_url {
        match osrm::check_osrm_health(&url).await {
            Ok(()) => {
                info!("OSRM routing service available at {}", url);
                return Box::new(OsrmClient::new(OsrmConfig::new(url)));
            }
            Err(e) => {
                warn!("OSRM not available at {}: {}. Trying the next routing tier.", url, e);
            }
        }
    }

    if let Some(config) = ors_config {
        match ors::check_ors_health(&config.base_url).await {
            Ok(()) => {
                info!("ORS routing service available at {}", config.base_url);
                return Box::new(OrsClient::new(config));
            }
            Err(e) => {
                warn!(
                    "ORS not available at {}: {}. Falling back to straight-line routing.",
                    config.base_url, e
                );
            }
        }
    }

    info!("Using straight-line routing (no routing backend configured or reachable)");
    Box::new(HaversineRouting::new())
}

pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
