//! Trip planning handler

use std::sync::Arc;

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use tracing::{error, info};
use uuid::Uuid;

use crate::services::trip_builder::{TripBuildError, TripBuilder};
use crate::types::{ErrorResponse, PlanTripRequest, Request, SuccessResponse};

/// Handle `haulplan.trip.plan` requests
pub async fn handle_plan(
    client: Client,
    mut subscriber: Subscriber,
    builder: Arc<TripBuilder>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => continue,
        };

        let request: Request<PlanTripRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse trip plan request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        match builder.build(&request.payload).await {
            Ok(response) => {
                info!(
                    request_id = %request.id,
                    days = response.trip_summary.number_of_days,
                    "trip planned"
                );
                let success = SuccessResponse::new(request.id, response);
                let _ = client.publish(reply, serde_json::to_vec(&success)?.into()).await;
            }
            Err(e) => {
                error!(request_id = %request.id, "Trip planning failed: {}", e);
                let error = ErrorResponse::new(request.id, error_code(&e), e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

fn error_code(err: &TripBuildError) -> &'static str {
    match err {
        TripBuildError::Validation(_) => "VALIDATION_ERROR",
        TripBuildError::LocationNotFound(_) => "INVALID_LOCATION",
        TripBuildError::Routing(_) | TripBuildError::Planning(_) => "PLAN_ERROR",
    }
}
