//! Per-owner lighting state
//!
//! The remembered state only changes after the bridge accepted the command,
//! so a failed command leaves it as it was.

use crate::services::device_bridge::DeviceBridge;
use eventdesk_common::models::{LightingChannel, LightingState};
use eventdesk_common::{OwnerId, Result};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Default)]
pub struct LightingController {
    states: Mutex<HashMap<OwnerId, LightingState>>,
}

impl LightingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn current(&self, owner: &OwnerId) -> LightingState {
        let states = self.states.lock().await;
        states.get(owner).copied().unwrap_or_default()
    }

    pub async fn set(
        &self,
        bridge: &dyn DeviceBridge,
        owner: &OwnerId,
        next: LightingState,
    ) -> Result<LightingState> {
        let mut states = self.states.lock().await;
        bridge.set_color(next).await?;
        states.insert(owner.clone(), next);
        info!(owner = %owner, red = next.red, green = next.green, blue = next.blue, "Lighting updated");
        Ok(next)
    }

    pub async fn toggle(
        &self,
        bridge: &dyn DeviceBridge,
        owner: &OwnerId,
        channel: LightingChannel,
    ) -> Result<LightingState> {
        let mut states = self.states.lock().await;
        let next = states.get(owner).copied().unwrap_or_default().toggled(channel);
        bridge.set_color(next).await?;
        states.insert(owner.clone(), next);
        info!(owner = %owner, ?channel, "Lighting channel toggled");
        Ok(next)
    }
}
