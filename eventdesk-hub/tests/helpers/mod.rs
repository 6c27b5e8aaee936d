//! Shared fixtures for eventdesk-hub integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use eventdesk_common::models::{LightingState, TagId, TemperatureReading};
use eventdesk_common::{time, OwnerId};
use eventdesk_hub::services::{BridgeError, DeviceBridge, HeaderIdentityGate};
use eventdesk_hub::{AppState, HubSettings};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub const OWNER: &str = "owner-1";
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// One scripted answer to a scan poll
#[derive(Debug, Clone)]
pub enum ScanStep {
    Tag(&'static str),
    Nothing,
    NetworkError,
    /// Answer with the tag after a delay
    Slow(Duration, &'static str),
    /// Answer with the tag only once `release` is notified
    Held(&'static str),
}

/// In-process device bridge answering polls from a script
///
/// Once the script runs out every poll reports an empty reader.
#[derive(Default)]
pub struct ScriptedBridge {
    script: Mutex<VecDeque<ScanStep>>,
    polls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    pub release: Notify,
    reject_colors: AtomicBool,
    colors: Mutex<Vec<LightingState>>,
    temperature: Mutex<Option<f64>>,
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ScriptedBridge {
    pub fn new(steps: Vec<ScanStep>) -> Arc<Self> {
        let bridge = Self::default();
        *bridge.script.lock().unwrap() = steps.into();
        *bridge.temperature.lock().unwrap() = Some(21.5);
        Arc::new(bridge)
    }

    pub fn push(&self, step: ScanStep) {
        self.script.lock().unwrap().push_back(step);
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn reject_colors(&self, reject: bool) {
        self.reject_colors.store(reject, Ordering::SeqCst);
    }

    pub fn colors_sent(&self) -> Vec<LightingState> {
        self.colors.lock().unwrap().clone()
    }

    /// `None` makes the thermometer report an error payload
    pub fn set_temperature(&self, celsius: Option<f64>) {
        *self.temperature.lock().unwrap() = celsius;
    }
}

#[async_trait]
impl DeviceBridge for ScriptedBridge {
    async fn scan_tag(&self) -> Result<Option<TagId>, BridgeError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(ScanStep::Tag(tag)) => Ok(TagId::normalize(tag)),
            Some(ScanStep::Nothing) | None => Ok(None),
            Some(ScanStep::NetworkError) => {
                Err(BridgeError::Network("connection refused".to_string()))
            }
            Some(ScanStep::Slow(delay, tag)) => {
                tokio::time::sleep(delay).await;
                Ok(TagId::normalize(tag))
            }
            Some(ScanStep::Held(tag)) => {
                self.release.notified().await;
                Ok(TagId::normalize(tag))
            }
        }
    }

    async fn read_temperature(&self) -> Result<TemperatureReading, BridgeError> {
        match *self.temperature.lock().unwrap() {
            Some(celsius) => Ok(TemperatureReading::new(celsius)),
            None => Err(BridgeError::Reported("sensor offline".to_string())),
        }
    }

    async fn set_color(&self, state: LightingState) -> Result<(), BridgeError> {
        if self.reject_colors.load(Ordering::SeqCst) {
            return Err(BridgeError::Status(500));
        }
        self.colors.lock().unwrap().push(state);
        Ok(())
    }
}

pub fn owner() -> OwnerId {
    OwnerId::parse(OWNER).unwrap()
}

/// App state over a fresh in-memory database
pub async fn test_state(bridge: Arc<ScriptedBridge>) -> AppState {
    test_state_polling_every(bridge, POLL_INTERVAL).await
}

pub async fn test_state_polling_every(
    bridge: Arc<ScriptedBridge>,
    poll_interval: Duration,
) -> AppState {
    let db = eventdesk_common::db::open_in_memory()
        .await
        .expect("Should open in-memory database");

    AppState::new(
        db,
        bridge,
        Arc::new(HeaderIdentityGate::new(None)),
        HubSettings {
            poll_interval,
            utc_offset: time::fixed_offset(0).unwrap(),
        },
    )
}

/// Request carrying the test owner's identity header
pub fn owner_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-owner-id", OWNER);

    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Extract JSON body from response
pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Wait until the owner's session feed holds `count` entries
pub async fn wait_for_entries(state: &AppState, owner: &OwnerId, count: usize) -> bool {
    for _ in 0..300 {
        if state.scans.status(owner).await.entries.len() >= count {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// Wait until the bridge has answered at least `count` polls
pub async fn wait_for_polls(bridge: &ScriptedBridge, count: usize) -> bool {
    for _ in 0..300 {
        if bridge.polls() >= count && bridge.in_flight() == 0 {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// Wait until a poll is in progress
pub async fn wait_for_in_flight(bridge: &ScriptedBridge) -> bool {
    for _ in 0..300 {
        if bridge.in_flight() > 0 {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    false
}
