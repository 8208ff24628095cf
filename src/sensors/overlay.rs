// Copyright (c) 2026 greenguard
// Licensed under the MIT License. See LICENSE file in the project root.

//! Sensor overlay - merges raw frames with the simulation feedback loop
//!
//! With simulation off, each field copies from the raw frame unless that
//! read failed (NaN), in which case the previous committed value survives.
//! With simulation on, temperature, humidity and light ignore hardware and
//! drift as a feedback function of the actuator state, clamped to physical
//! bounds. Motion is always live; it is never simulated.

use crate::core::{
    ActuatorState, SensorSnapshot, SimulationState, HUM_RANGE, LIGHT_RANGE, TEMP_RANGE,
};

use super::RawSensorFrame;

/// Per-tick temperature rise from the heater, °C.
const HEATER_TEMP_DELTA: f64 = 0.1;
/// Per-tick temperature drop from the open vent, °C.
const VENT_TEMP_DELTA: f64 = 0.1;
/// Per-tick temperature rise from the grow light, °C.
const LIGHT_TEMP_DELTA: f64 = 0.05;
/// Per-tick light-level rise from the grow light.
const LIGHT_LUX_DELTA: i32 = 50;
/// Per-tick humidity rise from the pump, %RH.
const PUMP_HUM_DELTA: f64 = 0.5;
/// Per-tick humidity drop from the open vent, %RH.
const VENT_HUM_DELTA: f64 = 0.2;

/// Produce this tick's committed snapshot.
pub fn acquire(
    raw: &RawSensorFrame,
    sim: &SimulationState,
    prev: &SensorSnapshot,
    actuators: &ActuatorState,
) -> SensorSnapshot {
    if sim.active {
        return simulate(raw, prev, actuators);
    }

    SensorSnapshot {
        temperature: if raw.temperature.is_nan() {
            prev.temperature
        } else {
            raw.temperature
        },
        humidity: if raw.humidity.is_nan() {
            prev.humidity
        } else {
            raw.humidity
        },
        light_level: raw.light_level,
        motion: raw.motion,
    }
}

/// Integrate actuator feedback into the previous snapshot. Deltas are
/// additive and independent, then clamped.
fn simulate(raw: &RawSensorFrame, prev: &SensorSnapshot, actuators: &ActuatorState) -> SensorSnapshot {
    let mut temperature = prev.temperature;
    let mut humidity = prev.humidity;
    let mut light_level = prev.light_level;

    if actuators.heater_on {
        temperature += HEATER_TEMP_DELTA;
    }
    if actuators.vent_open {
        temperature -= VENT_TEMP_DELTA;
        humidity -= VENT_HUM_DELTA;
    }
    if actuators.light_on {
        temperature += LIGHT_TEMP_DELTA;
        light_level += LIGHT_LUX_DELTA;
    }
    if actuators.pump_on {
        humidity += PUMP_HUM_DELTA;
    }

    SensorSnapshot {
        temperature: temperature.clamp(TEMP_RANGE.0, TEMP_RANGE.1),
        humidity: humidity.clamp(HUM_RANGE.0, HUM_RANGE.1),
        light_level: light_level.clamp(LIGHT_RANGE.0, LIGHT_RANGE.1),
        motion: raw.motion,
    }
}
