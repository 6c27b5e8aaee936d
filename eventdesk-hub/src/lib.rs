//! eventdesk-hub library
//!
//! Event admin backend: expenses, roster and rota, RFID tag registry, live
//! attendance scanning and device bridge control, served as a JSON API.

use axum::Router;
use chrono::{DateTime, FixedOffset, Utc};
use eventdesk_common::events::EventBus;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

pub mod api;
pub mod db;
pub mod error;
pub mod services;

use services::{DeviceBridge, ExclusiveBridge, IdentityGate, LightingController, ScanRegistry};

/// Event bus capacity; slow SSE clients beyond this lag and skip events
pub const EVENT_BUS_CAPACITY: usize = 256;

/// Runtime settings derived from configuration
#[derive(Debug, Clone, Copy)]
pub struct HubSettings {
    pub poll_interval: Duration,
    pub utc_offset: FixedOffset,
}

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Live updates for SSE clients
    pub event_bus: EventBus,
    pub bridge: Arc<dyn DeviceBridge>,
    pub identity: Arc<dyn IdentityGate>,
    /// One scan session per owner
    pub scans: Arc<ScanRegistry>,
    pub lighting: Arc<LightingController>,
    pub settings: HubSettings,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        bridge: Arc<dyn DeviceBridge>,
        identity: Arc<dyn IdentityGate>,
        settings: HubSettings,
    ) -> Self {
        let event_bus = EventBus::new(EVENT_BUS_CAPACITY);
        let bridge: Arc<dyn DeviceBridge> = Arc::new(ExclusiveBridge::new(bridge));
        let scans = Arc::new(ScanRegistry::new(
            db.clone(),
            event_bus.clone(),
            bridge.clone(),
            settings.poll_interval,
        ));

        Self {
            db,
            event_bus,
            bridge,
            identity,
            scans,
            lighting: Arc::new(LightingController::new()),
            settings,
            startup_time: eventdesk_common::time::now(),
        }
    }

    /// Stop background work; called once the server has drained
    pub async fn shutdown(&self) {
        self.scans.stop_all().await;
    }
}

/// Build application router
///
/// `/health` is public; everything else needs an owner.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;

    Router::new()
        .route("/events", get(api::event_stream))
        .merge(api::expense_routes())
        .merge(api::team_routes())
        .merge(api::rota_routes())
        .merge(api::tag_routes())
        .merge(api::attendance_routes())
        .merge(api::notification_routes())
        .merge(api::device_routes())
        .merge(api::dashboard_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
