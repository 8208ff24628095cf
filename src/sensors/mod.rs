//! Sensor module - raw acquisition seam and the simulation overlay

mod demo;
mod overlay;

pub use demo::DemoSensors;
pub use overlay::acquire;

use async_trait::async_trait;
use anyhow::Result;

/// One raw sample from the sensor bus, before overlay processing.
///
/// Failed analog reads are reported as NaN sentinels, never as errors; the
/// overlay falls back to the previous committed value per field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSensorFrame {
    /// Temperature, °C, NaN when the read failed.
    pub temperature: f64,
    /// Relative humidity, %RH, NaN when the read failed.
    pub humidity: f64,
    /// Raw light level.
    pub light_level: i32,
    /// Motion detector state.
    pub motion: bool,
}

/// Source of raw sensor frames. Hardware drivers and the demo generator sit
/// behind this seam; the decision engine never sees the difference.
#[async_trait]
pub trait SensorSource: Send {
    /// Sample all channels once.
    async fn sample(&mut self) -> Result<RawSensorFrame>;
}
