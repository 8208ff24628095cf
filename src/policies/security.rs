// Copyright (c) 2026 greenguard
// Licensed under the MIT License. See LICENSE file in the project root.

//! Security policy - intrusion alarm
//!
//! Arming is derived, never stored: armed = night OR simulation active.
//! Activation is edge-triggered on motion while armed; deactivation is
//! level-triggered on disarm (even mid-alarm) and edge-triggered on motion
//! ceasing. Each transition yields exactly one event.

use tracing::warn;

use crate::core::{ActuatorState, AlarmEvent};

/// Evaluate the alarm for one tick. Runs every tick regardless of mode.
pub fn evaluate(armed: bool, motion: bool, actuators: &mut ActuatorState) -> Option<AlarmEvent> {
    if armed && motion && !actuators.alarm_active {
        warn!("intrusion detected: motion while armed");
        actuators.alarm_active = true;
        return Some(AlarmEvent::On);
    }

    if actuators.alarm_active && (!armed || !motion) {
        actuators.alarm_active = false;
        return Some(AlarmEvent::Off);
    }

    None
}

/// Derive the arming condition.
pub fn armed(is_night: bool, simulation_active: bool) -> bool {
    is_night || simulation_active
}
