// Copyright (c) 2026 greenguard
// Licensed under the MIT License. See LICENSE file in the project root.

//! Climate policy - heater hysteresis and roof vent with safety interlock

use crate::core::{ActuatorState, Settings};

/// Hysteresis dead-band applied above `temp_min` (heater) and below
/// `temp_max` (vent) to prevent relay chatter, °C.
pub const HYSTERESIS_BAND: f64 = 1.0;

/// Evaluate heater and vent for one tick.
///
/// The vent step runs after the heater step on purpose: opening the vent
/// forces the heater off for this tick, overriding whatever the heater step
/// decided. Inside a dead-band the previous state is kept.
pub fn evaluate(temperature: f64, settings: &Settings, actuators: &mut ActuatorState) {
    // Heater
    if temperature < settings.temp_min {
        actuators.heater_on = true;
    } else if temperature > settings.temp_min + HYSTERESIS_BAND {
        actuators.heater_on = false;
    }

    // Roof vent, with the never-heat-while-venting interlock
    if temperature > settings.temp_max {
        actuators.vent_open = true;
        actuators.heater_on = false;
    } else if temperature < settings.temp_max - HYSTERESIS_BAND {
        actuators.vent_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            temp_min: 18.0,
            temp_max: 28.0,
            ..Settings::default()
        }
    }

    #[test]
    fn heater_engages_below_temp_min() {
        let mut actuators = ActuatorState::default();
        evaluate(17.9, &settings(), &mut actuators);
        assert!(actuators.heater_on);
    }

    #[test]
    fn heater_releases_above_dead_band() {
        let mut actuators = ActuatorState {
            heater_on: true,
            ..ActuatorState::default()
        };
        evaluate(19.1, &settings(), &mut actuators);
        assert!(!actuators.heater_on);
    }

    #[test]
    fn heater_holds_inside_dead_band() {
        // For every t in [temp_min, temp_min + band] the prior state survives.
        for prior in [false, true] {
            for tenth in 0..=10 {
                let t = 18.0 + tenth as f64 * 0.1;
                let mut actuators = ActuatorState {
                    heater_on: prior,
                    ..ActuatorState::default()
                };
                evaluate(t, &settings(), &mut actuators);
                assert_eq!(actuators.heater_on, prior, "t={t}, prior={prior}");
            }
        }
    }

    #[test]
    fn vent_opens_above_temp_max_and_retracts_heater() {
        let mut actuators = ActuatorState {
            heater_on: true,
            ..ActuatorState::default()
        };
        evaluate(28.5, &settings(), &mut actuators);
        assert!(actuators.vent_open);
        assert!(!actuators.heater_on, "interlock must force the heater off");
    }

    #[test]
    fn vent_closes_below_dead_band() {
        let mut actuators = ActuatorState {
            vent_open: true,
            ..ActuatorState::default()
        };
        evaluate(26.9, &settings(), &mut actuators);
        assert!(!actuators.vent_open);
    }

    #[test]
    fn vent_holds_inside_dead_band() {
        let mut actuators = ActuatorState {
            vent_open: true,
            ..ActuatorState::default()
        };
        evaluate(27.5, &settings(), &mut actuators);
        assert!(actuators.vent_open);
    }

    #[test]
    fn never_heating_when_vent_decision_fires() {
        // Whenever this tick's temperature opens the vent, the heater must
        // come out false regardless of prior actuator state.
        for tenth in 281..=500 {
            let t = tenth as f64 * 0.1;
            for heater in [false, true] {
                for vent in [false, true] {
                    let mut actuators = ActuatorState {
                        heater_on: heater,
                        vent_open: vent,
                        ..ActuatorState::default()
                    };
                    evaluate(t, &settings(), &mut actuators);
                    assert!(actuators.vent_open, "vent must open at t={t}");
                    assert!(!actuators.heater_on, "heating while venting at t={t}");
                }
            }
        }
    }
}
