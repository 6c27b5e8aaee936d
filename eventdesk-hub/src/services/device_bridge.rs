//! Device bridge client
//!
//! The bridge is a small HTTP service on the local network that fronts the
//! RFID reader, the RGB lighting and the thermometer:
//!
//! - `GET /scan_rfid` -> `{"rfid_uid": "..."}` or `{"error": "..."}`
//! - `GET /temperature` -> `{"temperature": 21.5}` or `{"error": "..."}`
//! - `POST /set_color` with `{"red": 0|1, "green": 0|1, "blue": 0|1}`
//!
//! The bridge handles one request at a time. The hub wraps whichever client
//! it uses in [`ExclusiveBridge`] so scan sessions of different owners,
//! scan-to-assign and device control never overlap.

use async_trait::async_trait;
use eventdesk_common::models::{LightingState, TagId, TemperatureReading};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

/// Bridge client errors
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Bridge returned status {0}")]
    Status(u16),

    /// The bridge answered with an `{"error": ...}` payload
    #[error("Bridge reported: {0}")]
    Reported(String),

    #[error("Malformed payload: {0}")]
    Payload(String),
}

impl BridgeError {
    /// True when the bridge could not be reached at all
    pub fn is_network(&self) -> bool {
        matches!(self, BridgeError::Network(_))
    }
}

impl From<BridgeError> for eventdesk_common::Error {
    fn from(err: BridgeError) -> Self {
        eventdesk_common::Error::DeviceUnavailable(err.to_string())
    }
}

/// Narrow contract the hub needs from the bridge
#[async_trait]
pub trait DeviceBridge: Send + Sync {
    /// Tag currently under the reader, `None` when the reader saw nothing
    async fn scan_tag(&self) -> Result<Option<TagId>, BridgeError>;

    async fn read_temperature(&self) -> Result<TemperatureReading, BridgeError>;

    async fn set_color(&self, state: LightingState) -> Result<(), BridgeError>;
}

#[derive(Debug, Deserialize)]
struct ScanResponse {
    rfid_uid: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TemperatureResponse {
    temperature: Option<f64>,
    error: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
struct ColorCommand {
    red: u8,
    green: u8,
    blue: u8,
}

impl From<LightingState> for ColorCommand {
    fn from(state: LightingState) -> Self {
        Self {
            red: u8::from(state.red),
            green: u8::from(state.green),
            blue: u8::from(state.blue),
        }
    }
}

/// reqwest-backed bridge client
pub struct HttpDeviceBridge {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpDeviceBridge {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, BridgeError> {
        let http_client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| BridgeError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, BridgeError> {
        let url = self.url(path);
        debug!(url = %url, "Querying device bridge");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| BridgeError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BridgeError::Network(e.to_string()))?;

        // Error payloads often arrive with a non-2xx status; prefer their message.
        match serde_json::from_str::<T>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(BridgeError::Status(status.as_u16())),
            Err(e) => Err(BridgeError::Payload(e.to_string())),
        }
    }
}

#[async_trait]
impl DeviceBridge for HttpDeviceBridge {
    async fn scan_tag(&self) -> Result<Option<TagId>, BridgeError> {
        let payload: ScanResponse = self.get_json("scan_rfid").await?;
        interpret_scan(payload)
    }

    async fn read_temperature(&self) -> Result<TemperatureReading, BridgeError> {
        let payload: TemperatureResponse = self.get_json("temperature").await?;
        interpret_temperature(payload)
    }

    async fn set_color(&self, state: LightingState) -> Result<(), BridgeError> {
        let url = self.url("set_color");
        let command = ColorCommand::from(state);
        debug!(url = %url, ?command, "Sending lighting command");

        let response = self
            .http_client
            .post(&url)
            .json(&command)
            .send()
            .await
            .map_err(|e| BridgeError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BridgeError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Serializes every call to the wrapped bridge
pub struct ExclusiveBridge {
    inner: Arc<dyn DeviceBridge>,
    turn: Mutex<()>,
}

impl ExclusiveBridge {
    pub fn new(inner: Arc<dyn DeviceBridge>) -> Self {
        Self {
            inner,
            turn: Mutex::new(()),
        }
    }
}

#[async_trait]
impl DeviceBridge for ExclusiveBridge {
    async fn scan_tag(&self) -> Result<Option<TagId>, BridgeError> {
        let _turn = self.turn.lock().await;
        self.inner.scan_tag().await
    }

    async fn read_temperature(&self) -> Result<TemperatureReading, BridgeError> {
        let _turn = self.turn.lock().await;
        self.inner.read_temperature().await
    }

    async fn set_color(&self, state: LightingState) -> Result<(), BridgeError> {
        let _turn = self.turn.lock().await;
        self.inner.set_color(state).await
    }
}

fn interpret_scan(payload: ScanResponse) -> Result<Option<TagId>, BridgeError> {
    if let Some(uid) = payload.rfid_uid {
        return Ok(TagId::normalize(&uid));
    }
    match payload.error {
        Some(message) => Err(BridgeError::Reported(message)),
        None => Ok(None),
    }
}

fn interpret_temperature(payload: TemperatureResponse) -> Result<TemperatureReading, BridgeError> {
    if let Some(message) = payload.error {
        return Err(BridgeError::Reported(message));
    }
    match payload.temperature {
        Some(celsius) if celsius.is_finite() => Ok(TemperatureReading::new(celsius)),
        Some(other) => Err(BridgeError::Payload(format!("temperature {} is not finite", other))),
        None => Err(BridgeError::Payload("missing temperature".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventdesk_common::models::TemperatureBand;

    fn scan(json: &str) -> Result<Option<TagId>, BridgeError> {
        interpret_scan(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_scan_payloads() {
        assert_eq!(
            scan(r#"{"rfid_uid": " 04A1B2 "}"#).unwrap(),
            Some(TagId::parse("04A1B2").unwrap())
        );
        assert_eq!(scan(r#"{"rfid_uid": "  "}"#).unwrap(), None);
        assert_eq!(scan("{}").unwrap(), None);
        assert!(matches!(
            scan(r#"{"error": "No card detected"}"#),
            Err(BridgeError::Reported(_))
        ));
    }

    #[test]
    fn test_temperature_payloads() {
        let reading =
            interpret_temperature(serde_json::from_str(r#"{"temperature": 30.5}"#).unwrap())
                .unwrap();
        assert_eq!(reading.band, TemperatureBand::Hot);

        let failed =
            interpret_temperature(serde_json::from_str(r#"{"error": "sensor offline"}"#).unwrap());
        assert!(matches!(failed, Err(BridgeError::Reported(m)) if m == "sensor offline"));
    }

    #[test]
    fn test_color_command_uses_bits() {
        let command = ColorCommand::from(LightingState {
            red: true,
            green: false,
            blue: true,
        });
        assert_eq!(
            serde_json::to_value(&command).unwrap(),
            serde_json::json!({"red": 1, "green": 0, "blue": 1})
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let bridge =
            HttpDeviceBridge::new("http://192.168.1.84:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(bridge.url("scan_rfid"), "http://192.168.1.84:5000/scan_rfid");
    }

    /// Counts overlapping scans; each takes a few milliseconds
    #[derive(Default)]
    struct CountingBridge {
        active: std::sync::atomic::AtomicUsize,
        peak: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl DeviceBridge for CountingBridge {
        async fn scan_tag(&self) -> Result<Option<TagId>, BridgeError> {
            use std::sync::atomic::Ordering;
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(None)
        }

        async fn read_temperature(&self) -> Result<TemperatureReading, BridgeError> {
            Ok(TemperatureReading::new(20.0))
        }

        async fn set_color(&self, _state: LightingState) -> Result<(), BridgeError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_exclusive_bridge_serializes_scans() {
        let counting = Arc::new(CountingBridge::default());
        let bridge = Arc::new(ExclusiveBridge::new(counting.clone()));

        let scans: Vec<_> = (0..4)
            .map(|_| {
                let bridge = bridge.clone();
                tokio::spawn(async move { bridge.scan_tag().await })
            })
            .collect();
        for scan in scans {
            assert_eq!(scan.await.unwrap().unwrap(), None);
        }

        assert_eq!(counting.peak.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn test_bridge_error_maps_to_device_unavailable() {
        let err: eventdesk_common::Error = BridgeError::Status(500).into();
        assert!(matches!(err, eventdesk_common::Error::DeviceUnavailable(_)));
    }
}
