//! HaulPlan Worker - Backend service for HOS trip planning
//!
//! This worker connects to NATS and handles trip planning and geocoding
//! requests from the frontend.

mod cli;
mod config;
mod handlers;
mod services;
mod types;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    dotenvy::dotenv().ok();

    let config = config::Config::from_env()?;

    match cli.command {
        Some(cli::Command::Plan {
            current,
            pickup,
            dropoff,
            cycle_used,
        }) => plan_once(config, current, pickup, dropoff, cycle_used).await,
        Some(cli::Command::Serve) | None => run_server(config).await,
    }
}

async fn run_server(config: config::Config) -> Result<()> {
    let logs_dir = std::env::var("LOGS_DIR").unwrap_or_else(|_| "../logs".to_string());
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &logs_dir, "worker.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,haulplan_worker=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    info!("Starting HaulPlan Worker...");
    info!("Configuration loaded");

    let nats_client = async_nats::connect(&config.nats_url).await?;
    info!("Connected to NATS at {}", config.nats_url);

    handlers::start_handlers(nats_client, &config).await
}

/// One-shot planning from the command line, bypassing NATS
async fn plan_once(
    config: config::Config,
    current: String,
    pickup: String,
    dropoff: String,
    cycle_used: f64,
) -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let geocoder = Arc::from(services::geocoding::create_geocoder(&config.nominatim_url));
    let routing = Arc::from(
        services::routing::create_routing_service_with_fallback(
            config.osrm_url.clone(),
            config.ors_config(),
        )
        .await,
    );
    let builder = services::trip_builder::TripBuilder::new(geocoder, routing);

    let request = types::PlanTripRequest {
        current_location: current,
        pickup_location: pickup,
        dropoff_location: dropoff,
        current_location_coords: None,
        pickup_location_coords: None,
        dropoff_location_coords: None,
        current_cycle_used: cycle_used,
        start_time: None,
    };

    let response = builder.build(&request).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
