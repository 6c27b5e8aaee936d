//! Lighting and temperature values exchanged with the device bridge

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// On/off state of the three lighting channels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightingState {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
}

/// One lighting channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightingChannel {
    Red,
    Green,
    Blue,
}

impl FromStr for LightingChannel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "red" => Ok(LightingChannel::Red),
            "green" => Ok(LightingChannel::Green),
            "blue" => Ok(LightingChannel::Blue),
            other => Err(Error::Validation(format!("unknown lighting channel: {}", other))),
        }
    }
}

impl LightingState {
    /// State with one channel flipped
    pub fn toggled(self, channel: LightingChannel) -> Self {
        let mut next = self;
        match channel {
            LightingChannel::Red => next.red = !next.red,
            LightingChannel::Green => next.green = !next.green,
            LightingChannel::Blue => next.blue = !next.blue,
        }
        next
    }
}

/// Comfort band of a temperature reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureBand {
    /// At or below 0 °C
    Cold,
    /// Above 0 °C up to 25 °C
    Mild,
    /// Above 25 °C
    Hot,
}

/// Temperature reported by the bridge, in °C
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub celsius: f64,
    pub band: TemperatureBand,
}

impl TemperatureReading {
    pub fn new(celsius: f64) -> Self {
        let band = if celsius <= 0.0 {
            TemperatureBand::Cold
        } else if celsius <= 25.0 {
            TemperatureBand::Mild
        } else {
            TemperatureBand::Hot
        };
        Self { celsius, band }
    }
}
