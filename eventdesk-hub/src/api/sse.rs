//! Server-Sent Events for live dashboard updates

use crate::api::auth::CurrentOwner;
use crate::AppState;
use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;

/// GET /events - the caller's events as they happen
pub async fn event_stream(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    eventdesk_common::sse::owner_event_stream(state.event_bus.subscribe(), owner)
}
