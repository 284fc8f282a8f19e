//! OpenRouteService routing client
//!
//! ORS directions API documentation:
//! https://openrouteservice.org/dev/#/api-docs/v2/directions

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{round1, round2, RouteEstimate, RoutingService, METERS_PER_MILE};
use crate::types::Location;

/// ORS client configuration
#[derive(Debug, Clone)]
pub struct OrsConfig {
    /// Base URL of the ORS server (e.g., "https://api.openrouteservice.org")
    pub base_url: String,
    /// API key sent in the Authorization header
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl OrsConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Serialize)]
struct OrsRequest {
    /// [lng, lat] pairs, start then end
    coordinates: [[f64; 2]; 2],
}

#[derive(Debug, Deserialize)]
struct OrsResponse {
    #[serde(default)]
    features: Vec<OrsFeature>,
}

#[derive(Debug, Deserialize)]
struct OrsFeature {
    properties: OrsProperties,
    geometry: OrsGeometry,
}

#[derive(Debug, Deserialize)]
struct OrsProperties {
    summary: OrsSummary,
}

#[derive(Debug, Deserialize)]
struct OrsSummary {
    /// Meters
    distance: f64,
    /// Seconds
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OrsGeometry {
    /// [lng, lat] pairs
    coordinates: Vec<[f64; 2]>,
}

/// OpenRouteService routing client, using the heavy-goods-vehicle profile
pub struct OrsClient {
    client: Client,
    config: OrsConfig,
}

impl OrsClient {
    pub fn new(config: OrsConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    fn directions_url(&self) -> String {
        format!(
            "{}/v2/directions/driving-hgv/geojson",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl RoutingService for OrsClient {
    async fn route(&self, from: &Location, to: &Location) -> Result<RouteEstimate> {
        let request = OrsRequest {
            coordinates: [[from.lng, from.lat], [to.lng, to.lat]],
        };
        debug!("Requesting route from ORS: {} -> {}", from.name, to.name);

        let response = self
            .client
            .post(self.directions_url())
            .header("Authorization", self.config.api_key.as_str())
            .json(&request)
            .send()
            .await
            .context("Failed to send request to ORS")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("ORS returned error {}: {}", status, body);
        }

        let parsed: OrsResponse = response
            .json()
            .await
            .context("Failed to parse ORS response")?;

        let feature = parsed
            .features
            .into_iter()
            .next()
            .context("ORS returned no route")?;

        Ok(RouteEstimate {
            distance_miles: round1(feature.properties.summary.distance / METERS_PER_MILE),
            duration_hours: round2(feature.properties.summary.duration / 3600.0),
            geometry: feature.geometry.coordinates,
        })
    }

    fn name(&self) -> &'static str {
        "ors"
    }
}

/// Check that an ORS server answers its health endpoint
pub async fn check_ors_health(base_url: &str) -> Result<()> {
    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()?;

    let url = format!("{}/health", base_url.trim_end_matches('/'));
    let response = client.get(&url).send().await?;

    if response.status().is_success() {
        Ok(())
    } else {
        anyhow::bail!("ORS returned status {}", response.status())
    }
}
