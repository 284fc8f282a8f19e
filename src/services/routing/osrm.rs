//! OSRM routing client
//!
//! OSRM HTTP API documentation:
//! https://project-osrm.org/docs/v5.24.0/api/

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{round1, round2, RouteEstimate, RoutingService, METERS_PER_MILE};
use crate::types::Location;

/// OSRM client configuration
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL of the OSRM server (e.g., "https://router.project-osrm.org")
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl OsrmConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Meters
    distance: f64,
    /// Seconds
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    /// [lng, lat] pairs
    coordinates: Vec<[f64; 2]>,
}

/// OSRM routing client
pub struct OsrmClient {
    client: Client,
    config: OsrmConfig,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    fn route_url(&self, from: &Location, to: &Location) -> String {
        format!(
            "{}/route/v1/driving/{},{};{},{}?overview=simplified&geometries=geojson",
            self.config.base_url.trim_end_matches('/'),
            from.lng,
            from.lat,
            to.lng,
            to.lat
        )
    }
}

#[async_trait]
impl RoutingService for OsrmClient {
    async fn route(&self, from: &Location, to: &Location) -> Result<RouteEstimate> {
        let url = self.route_url(from, to);
        debug!("Requesting route from OSRM: {} -> {}", from.name, to.name);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send request to OSRM")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OSRM returned error {}: {}", status, body);
        }

        let parsed: OsrmResponse = response
            .json()
            .await
            .context("Failed to parse OSRM response")?;

        if parsed.code != "Ok" {
            anyhow::bail!("OSRM returned code {}", parsed.code);
        }
        let route = parsed
            .routes
            .into_iter()
            .next()
            .context("OSRM returned no route")?;

        Ok(RouteEstimate {
            distance_miles: round1(route.distance / METERS_PER_MILE),
            duration_hours: round2(route.duration / 3600.0),
            geometry: route.geometry.coordinates,
        })
    }

    fn name(&self) -> &'static str {
        "osrm"
    }
}

/// Check that an OSRM server answers a trivial nearest-road query
pub async fn check_osrm_health(base_url: &str) -> Result<()> {
    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()?;

    let url = format!(
        "{}/nearest/v1/driving/-87.6298,41.8781",
        base_url.trim_end_matches('/')
    );
    let response = client.get(&url).send().await?;

    if response.status().is_success() {
        Ok(())
    } else {
        anyhow::bail!("OSRM returned status {}", response.status())
    }
}
