// Copyright (c) 2026 greenguard
// Licensed under the MIT License. See LICENSE file in the project root.

//! Wire message parsing for the inbound control topics
//!
//! Payload shapes follow the historical firmware: settings use the short
//! keys `min_t`/`max_t`/`min_h`/`min_l`, simulation uses `active`/`t`/`h`/`l`
//! and control commands are plain uppercase strings. Malformed payloads
//! decode to `None` and are ignored by the bridge without mutating anything.

use serde::Deserialize;
use tracing::warn;

use crate::core::{Command, ControlCommand, DemoClockUpdate, SettingsUpdate, SimulationUpdate};

/// Which inbound topic a payload arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundTopic {
    /// Mode and manual override commands.
    Control,
    /// Threshold updates.
    Settings,
    /// Simulation toggle and injected readings.
    Simulation,
    /// Demo clock override.
    Clock,
}

/// Decode one inbound publish into a controller command.
pub fn decode(topic: InboundTopic, payload: &[u8]) -> Option<Command> {
    match topic {
        InboundTopic::Control => parse_control(payload).map(Command::Control),
        InboundTopic::Settings => parse_settings(payload).map(Command::Settings),
        InboundTopic::Simulation => parse_simulation(payload).map(Command::Simulation),
        InboundTopic::Clock => parse_demo_clock(payload).map(Command::DemoClock),
    }
}

fn parse_control(payload: &[u8]) -> Option<ControlCommand> {
    let text = std::str::from_utf8(payload).ok()?;
    let command = match text.trim() {
        "AUTO" => ControlCommand::Auto,
        "MANUAL" => ControlCommand::Manual,
        "FAN_ON" => ControlCommand::FanOn,
        "FAN_OFF" => ControlCommand::FanOff,
        "HEAT_ON" => ControlCommand::HeatOn,
        "HEAT_OFF" => ControlCommand::HeatOff,
        "PUMP_ON" => ControlCommand::PumpOn,
        "PUMP_OFF" => ControlCommand::PumpOff,
        "LIGHT_ON" => ControlCommand::LightOn,
        "LIGHT_OFF" => ControlCommand::LightOff,
        other => {
            warn!("ignoring unknown control command {other:?}");
            return None;
        }
    };
    Some(command)
}

#[derive(Debug, Deserialize)]
struct SettingsPayload {
    min_t: Option<f64>,
    max_t: Option<f64>,
    min_h: Option<f64>,
    min_l: Option<i32>,
}

fn parse_settings(payload: &[u8]) -> Option<SettingsUpdate> {
    let parsed: SettingsPayload = match serde_json::from_slice(payload) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!("ignoring malformed settings payload: {err}");
            return None;
        }
    };
    Some(SettingsUpdate {
        temp_min: parsed.min_t,
        temp_max: parsed.max_t,
        hum_min: parsed.min_h,
        light_threshold: parsed.min_l,
    })
}

#[derive(Debug, Deserialize)]
struct SimulationPayload {
    active: Option<bool>,
    t: Option<f64>,
    h: Option<f64>,
    l: Option<i32>,
}

fn parse_simulation(payload: &[u8]) -> Option<SimulationUpdate> {
    let parsed: SimulationPayload = match serde_json::from_slice(payload) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!("ignoring malformed simulation payload: {err}");
            return None;
        }
    };
    Some(SimulationUpdate {
        active: parsed.active,
        temperature: parsed.t,
        humidity: parsed.h,
        light_level: parsed.l,
    })
}

#[derive(Debug, Deserialize)]
struct ClockPayload {
    active: bool,
    #[serde(default)]
    hour: u32,
}

fn parse_demo_clock(payload: &[u8]) -> Option<DemoClockUpdate> {
    let parsed: ClockPayload = match serde_json::from_slice(payload) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!("ignoring malformed clock payload: {err}");
            return None;
        }
    };
    if parsed.hour > 23 {
        warn!("ignoring clock payload with hour {}", parsed.hour);
        return None;
    }
    Some(DemoClockUpdate {
        active: parsed.active,
        hour: parsed.hour,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_commands_parse() {
        assert_eq!(
            decode(InboundTopic::Control, b"AUTO"),
            Some(Command::Control(ControlCommand::Auto))
        );
        assert_eq!(
            decode(InboundTopic::Control, b"  PUMP_ON \n"),
            Some(Command::Control(ControlCommand::PumpOn))
        );
        assert_eq!(
            decode(InboundTopic::Control, b"LIGHT_OFF"),
            Some(Command::Control(ControlCommand::LightOff))
        );
        assert_eq!(decode(InboundTopic::Control, b"REBOOT"), None);
        assert_eq!(decode(InboundTopic::Control, &[0xff, 0xfe]), None);
    }

    #[test]
    fn settings_payload_uses_short_keys() {
        let update = decode(InboundTopic::Settings, br#"{"min_t": 20.0, "max_t": 30.0}"#);
        assert_eq!(
            update,
            Some(Command::Settings(SettingsUpdate {
                temp_min: Some(20.0),
                temp_max: Some(30.0),
                hum_min: None,
                light_threshold: None,
            }))
        );
    }

    #[test]
    fn partial_settings_leave_absent_fields_none() {
        let update = decode(InboundTopic::Settings, br#"{"min_h": 35.5}"#);
        assert_eq!(
            update,
            Some(Command::Settings(SettingsUpdate {
                hum_min: Some(35.5),
                ..SettingsUpdate::default()
            }))
        );
    }

    #[test]
    fn malformed_settings_are_dropped() {
        assert_eq!(decode(InboundTopic::Settings, b"not json"), None);
        assert_eq!(decode(InboundTopic::Settings, br#"{"min_t": "hot"}"#), None);
    }

    #[test]
    fn simulation_payload_parses() {
        let update = decode(
            InboundTopic::Simulation,
            br#"{"active": true, "t": 35.0, "l": 100}"#,
        );
        assert_eq!(
            update,
            Some(Command::Simulation(SimulationUpdate {
                active: Some(true),
                temperature: Some(35.0),
                humidity: None,
                light_level: Some(100),
            }))
        );
    }

    #[test]
    fn clock_payload_bounds_hour() {
        assert_eq!(
            decode(InboundTopic::Clock, br#"{"active": true, "hour": 23}"#),
            Some(Command::DemoClock(DemoClockUpdate {
                active: true,
                hour: 23
            }))
        );
        assert_eq!(decode(InboundTopic::Clock, br#"{"active": true, "hour": 24}"#), None);
        assert_eq!(
            decode(InboundTopic::Clock, br#"{"active": false}"#),
            Some(Command::DemoClock(DemoClockUpdate {
                active: false,
                hour: 0
            }))
        );
    }
}
