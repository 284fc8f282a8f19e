//! Geocoding autocomplete handler

use std::sync::Arc;

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use tracing::{error, warn};
use uuid::Uuid;

use crate::services::geocoding::Geocoder;
use crate::types::{AutocompleteQuery, ErrorResponse, Location, Request, SuccessResponse};

/// Queries shorter than this return no suggestions
const MIN_QUERY_LEN: usize = 3;

/// Handle `haulplan.geocode.autocomplete` requests.
///
/// Always replies with a (possibly empty) suggestion list. A failing
/// geocoding backend degrades to no suggestions, never to an error.
pub async fn handle_autocomplete(
    client: Client,
    mut subscriber: Subscriber,
    geocoder: Arc<dyn Geocoder>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => continue,
        };

        let request: Request<AutocompleteQuery> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse autocomplete request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let query = request.payload.query.trim().to_string();
        let suggestions: Vec<Location> = if query.len() < MIN_QUERY_LEN {
            Vec::new()
        } else {
            match geocoder.autocomplete(&query).await {
                Ok(results) => results,
                Err(e) => {
                    warn!("Autocomplete backend failed for '{}': {}", query, e);
                    Vec::new()
                }
            }
        };

        let success = SuccessResponse::new(request.id, suggestions);
        let _ = client.publish(reply, serde_json::to_vec(&success)?.into()).await;
    }

    Ok(())
}
