//! Server-Sent Events (SSE) utilities

use crate::events::DeskEvent;
use crate::models::OwnerId;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, warn};

/// SSE stream of one owner's events
///
/// Events belonging to other owners are dropped. Lagged receivers skip the
/// missed events and keep streaming.
pub fn owner_event_stream(
    rx: broadcast::Receiver<DeskEvent>,
    owner: OwnerId,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!(owner = %owner, "New SSE client connected");

    let stream = BroadcastStream::new(rx).filter_map(move |result| {
        let owner = owner.clone();
        async move {
            match result {
                Ok(event) if event.owner_id() == &owner => match serde_json::to_string(&event) {
                    Ok(json) => Some(Ok(Event::default().event(event.event_type()).data(json))),
                    Err(e) => {
                        warn!("Failed to serialize event: {}", e);
                        None
                    }
                },
                Ok(_) => None,
                Err(e) => {
                    warn!("SSE stream error: {:?}", e);
                    None
                }
            }
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
