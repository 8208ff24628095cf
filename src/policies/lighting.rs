// Copyright (c) 2026 greenguard
// Licensed under the MIT License. See LICENSE file in the project root.

//! Lighting policy - grow-light gate
//!
//! The light adds heat load, so darkness alone is not enough: the grow light
//! runs only during the day, in the dark, below the thermal ceiling.

use crate::core::{ActuatorState, SensorSnapshot, Settings};

/// Evaluate the grow light for one tick. Stateless: no hysteresis, the
/// current snapshot fully determines the output.
pub fn evaluate(is_night: bool, snapshot: &SensorSnapshot, settings: &Settings, actuators: &mut ActuatorState) {
    actuators.light_on = !is_night
        && snapshot.light_level < settings.light_threshold
        && snapshot.temperature < settings.temp_max;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_eight_boolean_corners() {
        let settings = Settings::default();
        for night in [false, true] {
            for dark in [false, true] {
                for cool in [false, true] {
                    let snapshot = SensorSnapshot {
                        light_level: if dark { settings.light_threshold - 1 } else { settings.light_threshold },
                        temperature: if cool { settings.temp_max - 1.0 } else { settings.temp_max },
                        ..SensorSnapshot::default()
                    };
                    let mut actuators = ActuatorState::default();
                    evaluate(night, &snapshot, &settings, &mut actuators);
                    assert_eq!(
                        actuators.light_on,
                        !night && dark && cool,
                        "night={night} dark={dark} cool={cool}"
                    );
                }
            }
        }
    }

    #[test]
    fn threshold_boundary_is_exclusive() {
        let settings = Settings::default();
        let snapshot = SensorSnapshot {
            light_level: settings.light_threshold,
            temperature: 20.0,
            ..SensorSnapshot::default()
        };
        let mut actuators = ActuatorState::default();
        evaluate(false, &snapshot, &settings, &mut actuators);
        assert!(!actuators.light_on);
    }
}
