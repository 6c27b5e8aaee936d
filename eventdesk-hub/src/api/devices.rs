//! Device bridge endpoints: temperature and lighting

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use eventdesk_common::models::{LightingChannel, LightingState, TemperatureReading};
use eventdesk_common::Error;

use crate::api::auth::CurrentOwner;
use crate::error::ApiResult;
use crate::AppState;

/// GET /api/devices/temperature
pub async fn get_temperature(
    State(state): State<AppState>,
    CurrentOwner(_owner): CurrentOwner,
) -> ApiResult<Json<TemperatureReading>> {
    let reading = state.bridge.read_temperature().await.map_err(Error::from)?;
    Ok(Json(reading))
}

/// GET /api/devices/lighting
pub async fn get_lighting(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
) -> Json<LightingState> {
    Json(state.lighting.current(&owner).await)
}

/// PUT /api/devices/lighting
pub async fn set_lighting(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Json(next): Json<LightingState>,
) -> ApiResult<Json<LightingState>> {
    let applied = state
        .lighting
        .set(state.bridge.as_ref(), &owner, next)
        .await?;
    Ok(Json(applied))
}

/// POST /api/devices/lighting/:channel/toggle
pub async fn toggle_channel(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Path(channel): Path<String>,
) -> ApiResult<Json<LightingState>> {
    let channel: LightingChannel = channel.parse()?;
    let applied = state
        .lighting
        .toggle(state.bridge.as_ref(), &owner, channel)
        .await?;
    Ok(Json(applied))
}

pub fn device_routes() -> Router<AppState> {
    Router::new()
        .route("/api/devices/temperature", get(get_temperature))
        .route("/api/devices/lighting", get(get_lighting).put(set_lighting))
        .route("/api/devices/lighting/:channel/toggle", post(toggle_channel))
}
