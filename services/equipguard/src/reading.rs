//! Synthetic sensor readings

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const TEMPERATURE_BASE: f64 = 50.0;
pub const TEMPERATURE_SPREAD: f64 = 20.0;
pub const TEMPERATURE_SPIKE: f64 = 40.0;
pub const SPIKE_PROBABILITY: f64 = 0.1;
pub const VIBRATION_BASE: f64 = 10.0;
pub const VIBRATION_SPREAD: f64 = 5.0;
pub const VOLTAGE_BASE: f64 = 220.0;
pub const VOLTAGE_SPREAD: f64 = 2.0;

/// One sensor sample, serialized the way the prediction service expects it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Reading {
    pub temperature: f64,
    pub vibration: f64,
    pub voltage: f64,
}

impl Reading {
    /// Draw a reading from `rng`.
    ///
    /// Temperature is uniform in `[50, 70)`, shifted by +40 on a 10% spike.
    /// Vibration is uniform in `[10, 15)` and voltage in `[220, 222)`.
    pub fn synthesize<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut temperature =
            rng.gen_range(TEMPERATURE_BASE..TEMPERATURE_BASE + TEMPERATURE_SPREAD);
        if rng.gen_bool(SPIKE_PROBABILITY) {
            temperature += TEMPERATURE_SPIKE;
        }
        let vibration = rng.gen_range(VIBRATION_BASE..VIBRATION_BASE + VIBRATION_SPREAD);
        let voltage = rng.gen_range(VOLTAGE_BASE..VOLTAGE_BASE + VOLTAGE_SPREAD);

        Self {
            temperature,
            vibration,
            voltage,
        }
    }

    /// True when the temperature came from the spike branch
    pub fn is_spike(&self) -> bool {
        self.temperature >= TEMPERATURE_BASE + TEMPERATURE_SPIKE
    }
}
