// Copyright (c) 2026 greenguard
// Licensed under the MIT License. See LICENSE file in the project root.

//! Demo sensor source - synthesized greenhouse readings
//!
//! Random-walks a plausible greenhouse climate for running without hardware.
//! Occasionally emits a NaN temperature/humidity read to exercise the
//! overlay's stale-value fallback, the way a flaky DHT22 would.

use anyhow::Result;
use async_trait::async_trait;
use rand::prelude::*;
use rand_distr::Normal;

use super::{RawSensorFrame, SensorSource};

/// Probability of a failed (NaN) temperature or humidity read per sample.
const DROPOUT_PROBABILITY: f64 = 0.02;
/// Probability of the motion detector tripping per sample.
const MOTION_PROBABILITY: f64 = 0.05;

/// Synthesizes raw frames for demo mode.
pub struct DemoSensors {
    rng: StdRng,
    temperature: f64,
    humidity: f64,
    light_level: f64,
}

impl DemoSensors {
    /// New generator seeded from entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// New generator with a caller-supplied RNG, for reproducible output.
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            temperature: 22.0,
            humidity: 55.0,
            light_level: 2500.0,
        }
    }

    fn step(&mut self) -> RawSensorFrame {
        let temp_noise = Normal::new(0.0, 0.15).unwrap();
        let hum_noise = Normal::new(0.0, 0.6).unwrap();
        let light_noise = Normal::new(0.0, 40.0).unwrap();

        self.temperature = (self.temperature + self.rng.sample(temp_noise)).clamp(5.0, 45.0);
        self.humidity = (self.humidity + self.rng.sample(hum_noise)).clamp(10.0, 95.0);
        self.light_level = (self.light_level + self.rng.sample(light_noise)).clamp(0.0, 4095.0);

        let temperature = if self.rng.gen::<f64>() < DROPOUT_PROBABILITY {
            f64::NAN
        } else {
            self.temperature
        };
        let humidity = if self.rng.gen::<f64>() < DROPOUT_PROBABILITY {
            f64::NAN
        } else {
            self.humidity
        };

        RawSensorFrame {
            temperature,
            humidity,
            light_level: self.light_level as i32,
            motion: self.rng.gen::<f64>() < MOTION_PROBABILITY,
        }
    }
}

impl Default for DemoSensors {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SensorSource for DemoSensors {
    async fn sample(&mut self) -> Result<RawSensorFrame> {
        Ok(self.step())
    }
}
