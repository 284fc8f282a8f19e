//! Geocoding abstraction layer
//!
//! Two implementations:
//! - MockGeocoder for tests (deterministic, no network)
//! - NominatimGeocoder for production (public or self-hosted Nominatim)
//!
//! Selection via the GEOCODER_BACKEND env variable ("mock" / "nominatim").

use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::services::nominatim::NominatimClient;
use crate::types::Location;

/// Geocoder trait - abstraction over all geocoding backends
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Geocode a free-text address. Returns None when nothing matches.
    async fn geocode(&self, query: &str) -> Result<Option<Location>>;

    /// Up to five suggestions for a partial address
    async fn autocomplete(&self, query: &str) -> Result<Vec<Location>>;

    /// Name of this backend, for logging
    fn name(&self) -> &'static str;
}

// ==========================================================================
// CircuitBreaker
// ==========================================================================

/// Circuit breaker to prevent hammering a failing backend
pub struct CircuitBreaker {
    state: Mutex<BreakerState>,
    threshold: u32,
    recovery: Duration,
}

#[derive(Default)]
struct BreakerState {
    failure_count: u32,
    last_failure: Option<Instant>,
}

impl CircuitBreaker {
    pub fn new(threshold: u32, recovery: Duration) -> Self {
        Self {
            state: Mutex::new(BreakerState::default()),
            threshold,
            recovery,
        }
    }

    /// Whether calls should currently be rejected
    pub fn is_open(&self) -> bool {
        let state = self.state.lock();
        if state.failure_count < self.threshold {
            return false;
        }
        match state.last_failure {
            // Recovery window elapsed: allow a retry (half-open)
            Some(last) => last.elapsed() < self.recovery,
            None => false,
        }
    }

    pub fn record_failure(&self) {
        let mut state = self.state.lock();
        state.failure_count += 1;
        state.last_failure = Some(Instant::now());
    }

    pub fn record_success(&self) {
        let mut state = self.state.lock();
        state.failure_count = 0;
        state.last_failure = None;
    }
}

// ==========================================================================
// MockGeocoder
// ==========================================================================

/// Mock geocoder for testing - returns deterministic fake coordinates
pub struct MockGeocoder;

impl MockGeocoder {
    pub fn new() -> Self {
        Self
    }

    /// Derive coordinates from the query hash, kept inside the
    /// continental US with a margin away from the borders
    fn hash_to_location(query: &str) -> Location {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        query.hash(&mut hasher);
        let hash = hasher.finish();

        const LAT_MIN: f64 = 30.0;
        const LAT_MAX: f64 = 45.0;
        const LNG_MIN: f64 = -115.0;
        const LNG_MAX: f64 = -80.0;

        let lat_normalized = ((hash >> 32) as f64) / (u32::MAX as f64);
        let lng_normalized = ((hash & 0xFFFF_FFFF) as f64) / (u32::MAX as f64);

        Location {
            lat: LAT_MIN + lat_normalized * (LAT_MAX - LAT_MIN),
            lng: LNG_MIN + lng_normalized * (LNG_MAX - LNG_MIN),
            name: format!("{}, USA", query),
        }
    }
}

impl Default for MockGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Location>> {
        if query.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(Self::hash_to_location(query.trim())))
    }

    async fn autocomplete(&self, query: &str) -> Result<Vec<Location>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        // Three stable variants of the same query
        Ok((1..=3)
            .map(|i| {
                let mut loc = Self::hash_to_location(&format!("{query}#{i}"));
                loc.name = format!("{query} {i}, USA");
                loc
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

// ==========================================================================
// NominatimGeocoder
// ==========================================================================

/// Default circuit breaker threshold (3 failures)
const DEFAULT_BREAKER_THRESHOLD: u32 = 3;

/// Default circuit breaker recovery time (5 minutes)
const DEFAULT_BREAKER_RECOVERY_SECS: u64 = 300;

const AUTOCOMPLETE_LIMIT: usize = 5;

/// Nominatim geocoder with circuit breaker protection
pub struct NominatimGeocoder {
    client: NominatimClient,
    /// pub(crate) for testing
    pub(crate) circuit_breaker: CircuitBreaker,
}

impl NominatimGeocoder {
    pub fn new(base_url: &str) -> Self {
        Self::with_config(
            base_url,
            DEFAULT_BREAKER_THRESHOLD,
            Duration::from_secs(DEFAULT_BREAKER_RECOVERY_SECS),
        )
    }

    pub fn with_config(base_url: &str, breaker_threshold: u32, breaker_recovery: Duration) -> Self {
        Self {
            client: NominatimClient::new(base_url),
            circuit_breaker: CircuitBreaker::new(breaker_threshold, breaker_recovery),
        }
    }

    async fn guarded<T>(
        &self,
        call: impl std::future::Future<Output = Result<T>>,
    ) -> Result<T> {
        if self.circuit_breaker.is_open() {
            tracing::warn!("Circuit breaker is open, rejecting geocoding request");
            anyhow::bail!("Geocoding service temporarily unavailable (circuit breaker open)");
        }
        match call.await {
            Ok(value) => {
                self.circuit_breaker.record_success();
                Ok(value)
            }
            Err(e) => {
                self.circuit_breaker.record_failure();
                tracing::error!("Geocoding request failed: {}", e);
                Err(e)
            }
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Location>> {
        self.guarded(self.client.search_one(query)).await
    }

    async fn autocomplete(&self, query: &str) -> Result<Vec<Location>> {
        self.guarded(self.client.search(query, AUTOCOMPLETE_LIMIT)).await
    }

    fn name(&self) -> &'static str {
        "nominatim"
    }
}

// ==========================================================================
// Factory
// ==========================================================================

/// Create a geocoder based on the GEOCODER_BACKEND environment variable
/// ("mock" or "nominatim"; unknown values fall back to mock).
pub fn create_geocoder(nominatim_url: &str) -> Box<dyn Geocoder> {
    let backend = std::env::var("GEOCODER_BACKEND").unwrap_or_else(|_| "nominatim".to_string());

    match backend.as_str() {
        "mock" => {
            tracing::info!("Using MockGeocoder");
            Box::new(MockGeocoder::new())
        }
        "nominatim" => {
            tracing::info!("Using NominatimGeocoder at {}", nominatim_url);
            Box::new(NominatimGeocoder::new(nominatim_url))
        }
        other => {
            tracing::warn!("Unknown GEOCODER_BACKEND '{}', using mock", other);
            Box::new(MockGeocoder::new())
        }
    }
}

// ==========================================================================
// Tests
// ==========================================================================
