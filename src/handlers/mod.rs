//! NATS message handlers

pub mod geocode;
pub mod ping;
pub mod trip;

use std::sync::Arc;

use anyhow::Result;
use async_nats::Client;
use tracing::{error, info};

use crate::config::Config;
use crate::services::geocoding::{create_geocoder, Geocoder};
use crate::services::routing::{create_routing_service_with_fallback, RoutingService};
use crate::services::trip_builder::TripBuilder;

/// Start all message handlers
pub async fn start_handlers(client: Client, config: &Config) -> Result<()> {
    info!("Starting message handlers...");

    let geocoder: Arc<dyn Geocoder> = Arc::from(create_geocoder(&config.nominatim_url));
    info!("Geocoder initialized: {}", geocoder.name());

    let routing: Arc<dyn RoutingService> = Arc::from(
        create_routing_service_with_fallback(config.osrm_url.clone(), config.ors_config()).await,
    );
    info!("Routing service initialized: {}", routing.name());

    let builder = Arc::new(TripBuilder::new(Arc::clone(&geocoder), routing));

    let ping_sub = client.subscribe("haulplan.ping").await?;
    let trip_plan_sub = client.subscribe("haulplan.trip.plan").await?;
    let autocomplete_sub = client.subscribe("haulplan.geocode.autocomplete").await?;
    info!("Subscribed to NATS subjects");

    let client_ping = client.clone();
    let ping_handle = tokio::spawn(async move {
        ping::handle_ping(client_ping, ping_sub).await
    });

    let client_trip = client.clone();
    let trip_handle = tokio::spawn(async move {
        trip::handle_plan(client_trip, trip_plan_sub, builder).await
    });

    let client_autocomplete = client.clone();
    let geocoder_autocomplete = Arc::clone(&geocoder);
    let autocomplete_handle = tokio::spawn(async move {
        geocode::handle_autocomplete(client_autocomplete, autocomplete_sub, geocoder_autocomplete)
            .await
    });

    info!("All handlers started");

    // Handlers run until the NATS connection closes.
    let (ping_result, trip_result, autocomplete_result) =
        tokio::join!(ping_handle, trip_handle, autocomplete_handle);
    for result in [ping_result, trip_result, autocomplete_result] {
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("Handler exited with error: {}", e),
            Err(e) => error!("Handler task panicked: {}", e),
        }
    }

    Ok(())
}
