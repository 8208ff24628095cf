// Copyright (c) 2026 greenguard
// Licensed under the MIT License. See LICENSE file in the project root.

//! GreenGuard - Autonomous Greenhouse Environmental Controller
//!
//! Reads temperature, humidity, light and motion, decides actuator positions
//! (heater, irrigation pump, roof vent, grow light, intrusion alarm) and
//! accepts remote overrides over MQTT.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    GreenGuard Engine                       │
//! ├────────────────────────────────────────────────────────────┤
//! │  ┌─────────┐  ┌─────────┐  ┌────────────┐  ┌────────────┐  │
//! │  │ Sensor  │→ │ Sensor  │→ │ Controller │→ │ Streaming  │  │
//! │  │ Source  │  │ Overlay │  │ (policies) │  │ Manager    │  │
//! │  └─────────┘  └─────────┘  └────────────┘  └────────────┘  │
//! │       ↓            ↓             ↓               ↓         │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │                      Event Bus                       │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! │                          ↓                                 │
//! │                   ┌────────────┐                           │
//! │                   │  Display   │                           │
//! │                   └────────────┘                           │
//! └────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod clock;
pub mod config;
pub mod core;
pub mod display;
pub mod error;
pub mod policies;
pub mod sensors;
pub mod streaming;

// Re-exports for convenience
pub use config::Config;
pub use core::{
    ActuatorState, AlarmEvent, Controller, Engine, EventBus, Mode, SensorSnapshot, Settings,
    SimulationState, TelemetryRecord,
};
pub use error::{ClockError, ControlError};
pub use sensors::{RawSensorFrame, SensorSource};
pub use streaming::StreamingManager;

/// GreenGuard version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// GreenGuard name
pub const NAME: &str = "GreenGuard";
