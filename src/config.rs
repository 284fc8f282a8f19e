//! Configuration management

use anyhow::Result;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// NATS server URL
    pub nats_url: String,

    /// Nominatim API URL (for geocoding)
    pub nominatim_url: String,

    /// OSRM routing engine URL (optional, first routing tier)
    pub osrm_url: Option<String>,

    /// OpenRouteService API key (optional, second routing tier; without it
    /// routing falls back to straight-line estimation when OSRM is down)
    pub ors_api_key: Option<String>,

    /// OpenRouteService base URL
    pub ors_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let nats_url = std::env::var("NATS_URL")
            .unwrap_or_else(|_| "nats://localhost:4222".to_string());

        let nominatim_url = std::env::var("NOMINATIM_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string());

        let osrm_url = std::env::var("OSRM_URL").ok();

        let ors_api_key = std::env::var("ORS_API_KEY").ok();

        let ors_url = std::env::var("ORS_URL")
            .unwrap_or_else(|_| "https://api.openrouteservice.org".to_string());

        Ok(Self {
            nats_url,
            nominatim_url,
            osrm_url,
            ors_api_key,
            ors_url,
        })
    }

    /// ORS routing configuration, when an API key is present
    pub fn ors_config(&self) -> Option<crate::services::routing::OrsConfig> {
        self.ors_api_key
            .as_ref()
            .map(|key| crate::services::routing::OrsConfig::new(&self.ors_url, key))
    }
}
