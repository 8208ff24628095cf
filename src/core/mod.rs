//! Core module - decision engine state types and orchestration

mod controller;
mod engine;
mod event_bus;

pub use controller::{Controller, TickOutcome};
pub use engine::Engine;
pub use event_bus::{Event, EventBus, EventType};

use serde::{Deserialize, Serialize};

use crate::error::ControlError;

/// One committed reading of the greenhouse environment.
///
/// Produced once per tick by the sensor overlay and immutable for the rest
/// of the tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    /// Air temperature in °C.
    pub temperature: f64,
    /// Relative humidity in %RH.
    pub humidity: f64,
    /// Raw light level (LDR units, 0-50000).
    pub light_level: i32,
    /// Motion detector state, always read live.
    pub motion: bool,
}

impl Default for SensorSnapshot {
    fn default() -> Self {
        Self {
            temperature: 20.0,
            humidity: 50.0,
            light_level: 2000,
            motion: false,
        }
    }
}

/// Physical bound for simulated temperature, °C.
pub const TEMP_RANGE: (f64, f64) = (0.0, 50.0);
/// Physical bound for simulated humidity, %RH.
pub const HUM_RANGE: (f64, f64) = (0.0, 100.0);
/// Physical bound for simulated light level.
pub const LIGHT_RANGE: (i32, i32) = (0, 50_000);

/// Control thresholds, mutable only through a validated settings update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Below this temperature the heater engages.
    pub temp_min: f64,
    /// Above this temperature the roof vent opens.
    pub temp_max: f64,
    /// Below this humidity irrigation triggers.
    pub hum_min: f64,
    /// Below this light level it counts as dark.
    pub light_threshold: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            temp_min: 18.0,
            temp_max: 28.0,
            hum_min: 40.0,
            light_threshold: 2000,
        }
    }
}

impl Settings {
    /// Validate the cross-field invariants: `temp_min < temp_max` and
    /// non-negative thresholds.
    pub fn validate(&self) -> Result<(), ControlError> {
        if self.temp_min >= self.temp_max {
            return Err(ControlError::InvalidSettings {
                reason: format!(
                    "temp_min ({}) must be below temp_max ({})",
                    self.temp_min, self.temp_max
                ),
            });
        }
        if self.hum_min < 0.0 {
            return Err(ControlError::InvalidSettings {
                reason: format!("hum_min ({}) must not be negative", self.hum_min),
            });
        }
        if self.light_threshold < 0 {
            return Err(ControlError::InvalidSettings {
                reason: format!(
                    "light_threshold ({}) must not be negative",
                    self.light_threshold
                ),
            });
        }
        Ok(())
    }
}

/// Actuator positions, owned exclusively by the decision engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorState {
    /// Heating relay.
    pub heater_on: bool,
    /// Irrigation pump relay.
    pub pump_on: bool,
    /// Roof vent servo (open/closed).
    pub vent_open: bool,
    /// Grow light.
    pub light_on: bool,
    /// Intrusion alarm.
    pub alarm_active: bool,
}

/// Manual override vector, pinned to the actuators every tick in Manual mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualOverrides {
    /// Heater override.
    pub heat: bool,
    /// Pump override.
    pub pump: bool,
    /// Roof vent override.
    pub fan: bool,
    /// Grow light override.
    pub light: bool,
}

/// Control mode: policies decide, or the operator does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Climate, irrigation and lighting policies drive the actuators.
    Auto,
    /// The override vector is passed through verbatim. Safety interlocks do
    /// not apply; security still runs.
    Manual(ManualOverrides),
}

impl Mode {
    /// True when in [`Mode::Auto`].
    pub fn is_auto(&self) -> bool {
        matches!(self, Mode::Auto)
    }
}

/// Simulation overlay state. While active, simulated fields drift as a
/// feedback function of the actuator state instead of tracking hardware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Whether the simulation overlay is active.
    pub active: bool,
}

/// Discrete alarm transition, published once per transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmEvent {
    /// Motion rising edge while armed.
    On,
    /// Motion ceased, or the arming condition was lost mid-alarm.
    Off,
}

/// A partial settings update; absent fields keep their current value.
/// Committed atomically only if the merged result validates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SettingsUpdate {
    /// New heater threshold.
    pub temp_min: Option<f64>,
    /// New vent threshold.
    pub temp_max: Option<f64>,
    /// New irrigation threshold.
    pub hum_min: Option<f64>,
    /// New darkness threshold.
    pub light_threshold: Option<i32>,
}

impl SettingsUpdate {
    /// Merge this update over `current` without validating.
    pub fn merged_into(&self, current: &Settings) -> Settings {
        Settings {
            temp_min: self.temp_min.unwrap_or(current.temp_min),
            temp_max: self.temp_max.unwrap_or(current.temp_max),
            hum_min: self.hum_min.unwrap_or(current.hum_min),
            light_threshold: self.light_threshold.unwrap_or(current.light_threshold),
        }
    }
}

/// Remote mode/override command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Delegate to the policies.
    Auto,
    /// Take manual control, keeping the last override vector.
    Manual,
    /// Roof vent override (Manual only).
    FanOn,
    /// Roof vent override (Manual only).
    FanOff,
    /// Heater override (Manual only).
    HeatOn,
    /// Heater override (Manual only).
    HeatOff,
    /// Pump override (Manual only).
    PumpOn,
    /// Pump override (Manual only).
    PumpOff,
    /// Grow light override (Manual only).
    LightOn,
    /// Grow light override (Manual only).
    LightOff,
}

/// Remote simulation toggle with optional injected readings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulationUpdate {
    /// Toggle the overlay; absent leaves it unchanged.
    pub active: Option<bool>,
    /// Injected temperature seed, °C.
    pub temperature: Option<f64>,
    /// Injected humidity seed, %RH.
    pub humidity: Option<f64>,
    /// Injected light level seed.
    pub light_level: Option<i32>,
}

/// Remote demo-clock override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoClockUpdate {
    /// Pin the clock to `hour` when true, return to the real clock when false.
    pub active: bool,
    /// Pinned hour of day, 0-23.
    pub hour: u32,
}

/// External message routed to the controller by the engine loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Mode or override change.
    Control(ControlCommand),
    /// Threshold update.
    Settings(SettingsUpdate),
    /// Simulation toggle/injection.
    Simulation(SimulationUpdate),
    /// Demo clock override.
    DemoClock(DemoClockUpdate),
}

/// Telemetry record published on the display/telemetry cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Temperature, °C.
    pub temp: f64,
    /// Humidity, %RH.
    pub hum: f64,
    /// Light level.
    pub lux: i32,
    /// Heater relay state.
    pub heat: bool,
    /// Pump relay state.
    pub pump: bool,
    /// Roof vent state.
    pub fan: bool,
    /// Grow light state.
    pub light: bool,
    /// True in Auto mode.
    pub auto: bool,
    /// Motion detector state.
    pub motion: bool,
    /// Night classification at record time.
    pub is_night: bool,
    /// Local time `HH:MM:SS`, empty if the clock is unavailable.
    pub local_time: String,
}
