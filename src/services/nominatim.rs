//! Nominatim geocoding client

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::types::Location;

/// Nominatim API response row
#[derive(Debug, Deserialize)]
pub struct NominatimResult {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}

/// Nominatim geocoding client
pub struct NominatimClient {
    base_url: String,
    client: reqwest::Client,
}

impl NominatimClient {
    /// Create a new client
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("HaulPlan/1.0 (https://haulplan.app)")
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Geocode a free-text address to its best match
    pub async fn search_one(&self, query: &str) -> Result<Option<Location>> {
        let results = self.search(query, 1).await?;
        Ok(results.into_iter().next())
    }

    /// Search with up to `limit` results, US addresses only
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Location>> {
        let url = format!(
            "{}/search?q={}&format=json&countrycodes=us&limit={}",
            self.base_url,
            urlencoding::encode(query),
            limit
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send geocoding request")?;

        if !response.status().is_success() {
            anyhow::bail!("Nominatim returned status {}", response.status());
        }

        let results: Vec<NominatimResult> = response
            .json()
            .await
            .context("Failed to parse geocoding response")?;

        let mut locations = Vec::with_capacity(results.len());
        for result in results {
            let lat: f64 = result.lat.parse().context("Invalid latitude")?;
            let lng: f64 = result.lon.parse().context("Invalid longitude")?;
            locations.push(Location {
                lat,
                lng,
                name: result.display_name,
            });
        }

        Ok(locations)
    }
}
