// Copyright (c) 2026 greenguard
// Licensed under the MIT License. See LICENSE file in the project root.

//! The decision engine
//!
//! Owns all mutable control state and is the single writer of the actuator
//! vector. Each tick: sensor overlay → mode arbiter → (in Auto) climate →
//! irrigation → lighting in that fixed order → security, which runs
//! regardless of mode. External messages are handled synchronously to
//! completion between ticks; handlers that change settings or mode re-run
//! the environmental policies immediately while in Auto so published state
//! never lags a committed change.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::clock::{self, ClockSource, FixedHourClock, RealClock};
use crate::error::ControlError;
use crate::policies::{climate, lighting, security, IrrigationPolicy, IrrigationStrategy};
use crate::sensors::{self, RawSensorFrame};

use super::{
    ActuatorState, AlarmEvent, ControlCommand, DemoClockUpdate, ManualOverrides, Mode,
    SensorSnapshot, Settings, SettingsUpdate, SimulationState, SimulationUpdate, TelemetryRecord,
    HUM_RANGE, LIGHT_RANGE, TEMP_RANGE,
};

/// Everything one tick produced for the collaborators.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    /// The committed snapshot.
    pub snapshot: SensorSnapshot,
    /// Actuator vector after all policies ran.
    pub actuators: ActuatorState,
    /// Alarm transition, if one fired this tick.
    pub alarm: Option<AlarmEvent>,
    /// Telemetry reflecting the committed state.
    pub telemetry: TelemetryRecord,
}

/// The greenhouse decision engine.
pub struct Controller {
    settings: Settings,
    actuators: ActuatorState,
    auto: bool,
    manual: ManualOverrides,
    sim: SimulationState,
    snapshot: SensorSnapshot,
    irrigation: IrrigationPolicy,
    clock: Box<dyn ClockSource>,
}

impl Controller {
    /// Build a controller in Auto mode with the real clock.
    pub fn new(settings: Settings, strategy: IrrigationStrategy, pulse_duration: Duration) -> Self {
        Self {
            settings,
            actuators: ActuatorState::default(),
            auto: true,
            manual: ManualOverrides::default(),
            sim: SimulationState::default(),
            snapshot: SensorSnapshot::default(),
            irrigation: IrrigationPolicy::new(strategy, pulse_duration),
            clock: Box::new(RealClock),
        }
    }

    /// Replace the clock source.
    pub fn set_clock(&mut self, clock: Box<dyn ClockSource>) {
        self.clock = clock;
    }

    /// Current settings.
    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Current actuator vector.
    pub fn actuators(&self) -> ActuatorState {
        self.actuators
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        if self.auto {
            Mode::Auto
        } else {
            Mode::Manual(self.manual)
        }
    }

    /// Last committed snapshot.
    pub fn snapshot(&self) -> SensorSnapshot {
        self.snapshot
    }

    /// Whether the simulation overlay is active.
    pub fn simulation_active(&self) -> bool {
        self.sim.active
    }

    /// Run one control tick against a raw sensor frame.
    pub fn tick(&mut self, raw: &RawSensorFrame, now: Instant) -> TickOutcome {
        self.snapshot = sensors::acquire(raw, &self.sim, &self.snapshot, &self.actuators);

        if self.auto {
            self.evaluate_environment(now);
        } else {
            self.pin_manual_overrides();
        }

        // Security is not gated by Auto/Manual.
        let armed = security::armed(self.is_night(), self.sim.active);
        let alarm = security::evaluate(armed, self.snapshot.motion, &mut self.actuators);

        TickOutcome {
            snapshot: self.snapshot,
            actuators: self.actuators,
            alarm,
            telemetry: self.telemetry(),
        }
    }

    /// Handle a mode/override command.
    pub fn apply_control(&mut self, command: ControlCommand, now: Instant) {
        match command {
            ControlCommand::Auto => {
                if !self.auto {
                    info!("mode -> auto");
                }
                self.auto = true;
                self.evaluate_environment(now);
            }
            ControlCommand::Manual => {
                if self.auto {
                    info!("mode -> manual");
                    // A latched irrigation pulse must not expire into a
                    // manually-held pump state later.
                    self.irrigation.reset();
                }
                self.auto = false;
                self.pin_manual_overrides();
            }
            _ if self.auto => {
                // Override fields apply only while in Manual.
                debug!("ignoring override {command:?} while in auto mode");
            }
            ControlCommand::FanOn => self.set_manual(|m| m.fan = true),
            ControlCommand::FanOff => self.set_manual(|m| m.fan = false),
            ControlCommand::HeatOn => self.set_manual(|m| m.heat = true),
            ControlCommand::HeatOff => self.set_manual(|m| m.heat = false),
            ControlCommand::PumpOn => self.set_manual(|m| m.pump = true),
            ControlCommand::PumpOff => self.set_manual(|m| m.pump = false),
            ControlCommand::LightOn => self.set_manual(|m| m.light = true),
            ControlCommand::LightOff => self.set_manual(|m| m.light = false),
        }
    }

    /// Handle a partial settings update.
    ///
    /// The merged result is committed atomically only if it validates;
    /// otherwise the prior settings are kept and the error is returned. A
    /// committed update re-runs the environmental policies immediately while
    /// in Auto, so a threshold change never waits for the next sensor tick.
    pub fn apply_settings(&mut self, update: SettingsUpdate, now: Instant) -> Result<(), ControlError> {
        let candidate = update.merged_into(&self.settings);
        candidate.validate()?;
        self.settings = candidate;
        info!(
            "settings updated: temp {:.1}..{:.1} °C, hum_min {:.1} %, light_threshold {}",
            candidate.temp_min, candidate.temp_max, candidate.hum_min, candidate.light_threshold
        );

        if self.auto {
            self.evaluate_environment(now);
        }
        Ok(())
    }

    /// Handle a simulation toggle/injection.
    ///
    /// While active, injected fields seed the committed snapshot (clamped to
    /// physical bounds) and later ticks drift from there under actuator
    /// feedback.
    pub fn apply_simulation(&mut self, update: SimulationUpdate, now: Instant) {
        if let Some(active) = update.active {
            if active != self.sim.active {
                info!("simulation {}", if active { "enabled" } else { "disabled" });
            }
            self.sim.active = active;
        }

        if !self.sim.active {
            return;
        }

        if let Some(t) = update.temperature {
            self.snapshot.temperature = t.clamp(TEMP_RANGE.0, TEMP_RANGE.1);
        }
        if let Some(h) = update.humidity {
            self.snapshot.humidity = h.clamp(HUM_RANGE.0, HUM_RANGE.1);
        }
        if let Some(l) = update.light_level {
            self.snapshot.light_level = l.clamp(LIGHT_RANGE.0, LIGHT_RANGE.1);
        }

        if self.auto {
            self.evaluate_environment(now);
        }
    }

    /// Handle a demo-clock override.
    pub fn apply_demo_clock(&mut self, update: DemoClockUpdate) {
        if update.active {
            info!("demo clock pinned at {:02}:00", update.hour % 24);
            self.clock = Box::new(FixedHourClock::new(update.hour));
        } else {
            info!("demo clock off, using system time");
            self.clock = Box::new(RealClock);
        }
    }

    /// Telemetry reflecting the current committed state.
    pub fn telemetry(&self) -> TelemetryRecord {
        TelemetryRecord {
            temp: self.snapshot.temperature,
            hum: self.snapshot.humidity,
            lux: self.snapshot.light_level,
            heat: self.actuators.heater_on,
            pump: self.actuators.pump_on,
            fan: self.actuators.vent_open,
            light: self.actuators.light_on,
            auto: self.auto,
            motion: self.snapshot.motion,
            is_night: self.is_night(),
            local_time: self.clock.local_time().unwrap_or_default(),
        }
    }

    fn is_night(&self) -> bool {
        clock::is_night(&*self.clock)
    }

    /// Climate → irrigation → lighting, in that order. Climate may retract
    /// the heater because of venting before the later policies run.
    fn evaluate_environment(&mut self, now: Instant) {
        climate::evaluate(self.snapshot.temperature, &self.settings, &mut self.actuators);
        self.irrigation.evaluate(
            self.snapshot.humidity,
            self.settings.hum_min,
            now,
            &mut self.actuators,
        );
        lighting::evaluate(self.is_night(), &self.snapshot, &self.settings, &mut self.actuators);
    }

    fn pin_manual_overrides(&mut self) {
        self.actuators.heater_on = self.manual.heat;
        self.actuators.pump_on = self.manual.pump;
        self.actuators.vent_open = self.manual.fan;
        self.actuators.light_on = self.manual.light;
    }

    fn set_manual(&mut self, mutate: impl FnOnce(&mut ManualOverrides)) {
        mutate(&mut self.manual);
        self.pin_manual_overrides();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FailingClock;

    fn controller() -> Controller {
        let mut c = Controller::new(
            Settings::default(),
            IrrigationStrategy::Pulse,
            Duration::from_millis(5000),
        );
        // Pin daytime so night gating does not depend on the host clock.
        c.set_clock(Box::new(FixedHourClock::new(12)));
        c
    }

    fn frame(temperature: f64, humidity: f64, light_level: i32, motion: bool) -> RawSensorFrame {
        RawSensorFrame {
            temperature,
            humidity,
            light_level,
            motion,
        }
    }

    #[test]
    fn cold_tick_engages_heater() {
        let mut c = controller();
        let out = c.tick(&frame(15.0, 60.0, 3000, false), Instant::now());
        assert!(out.actuators.heater_on);
        assert!(!out.actuators.vent_open);
    }

    #[test]
    fn hot_tick_vents_and_retracts_heater() {
        let mut c = controller();
        let now = Instant::now();
        c.tick(&frame(15.0, 60.0, 3000, false), now);
        let out = c.tick(&frame(29.0, 60.0, 3000, false), now);
        assert!(out.actuators.vent_open);
        assert!(!out.actuators.heater_on);
    }

    #[test]
    fn settings_update_recomputes_without_waiting_for_tick() {
        let mut c = controller();
        let now = Instant::now();
        // 25 °C with temp_min 18: no heat. Raise temp_min to 26 first so the
        // heater latches on, then move the band below 25 and watch it release
        // immediately on the settings update itself.
        c.tick(&frame(25.0, 60.0, 3000, false), now);
        c.apply_settings(
            SettingsUpdate {
                temp_min: Some(26.0),
                temp_max: Some(35.0),
                ..SettingsUpdate::default()
            },
            now,
        )
        .unwrap();
        assert!(c.actuators().heater_on);

        c.apply_settings(
            SettingsUpdate {
                temp_min: Some(20.0),
                temp_max: Some(30.0),
                ..SettingsUpdate::default()
            },
            now,
        )
        .unwrap();
        // 25 > 20 + 1 => released, with no tick in between.
        assert!(!c.actuators().heater_on);
    }

    #[test]
    fn invalid_settings_rejected_atomically() {
        let mut c = controller();
        let before = c.settings();
        let err = c
            .apply_settings(
                SettingsUpdate {
                    temp_min: Some(30.0),
                    temp_max: Some(20.0),
                    ..SettingsUpdate::default()
                },
                Instant::now(),
            )
            .unwrap_err();
        assert!(matches!(err, ControlError::InvalidSettings { .. }));
        assert_eq!(c.settings(), before, "no partial application");

        let err = c
            .apply_settings(
                SettingsUpdate {
                    hum_min: Some(-5.0),
                    ..SettingsUpdate::default()
                },
                Instant::now(),
            )
            .unwrap_err();
        assert!(matches!(err, ControlError::InvalidSettings { .. }));
        assert_eq!(c.settings(), before);
    }

    #[test]
    fn settings_update_does_not_reevaluate_in_manual() {
        let mut c = controller();
        let now = Instant::now();
        c.tick(&frame(15.0, 60.0, 3000, false), now);
        assert!(c.actuators().heater_on);

        c.apply_control(ControlCommand::Manual, now);
        assert!(!c.actuators().heater_on, "manual pass-through pins false");

        // Committed, but no policy run while manual.
        c.apply_settings(
            SettingsUpdate {
                temp_min: Some(25.0),
                ..SettingsUpdate::default()
            },
            now,
        )
        .unwrap();
        assert!(!c.actuators().heater_on);
        assert_eq!(c.settings().temp_min, 25.0);
    }

    #[test]
    fn manual_passthrough_overrides_cold_condition() {
        let mut c = controller();
        let now = Instant::now();
        c.apply_control(ControlCommand::Manual, now);
        c.apply_control(ControlCommand::FanOn, now);
        c.apply_control(ControlCommand::HeatOff, now);

        let out = c.tick(&frame(10.0, 60.0, 3000, false), now);
        assert!(!out.actuators.heater_on, "manual bypasses hysteresis entirely");
        assert!(out.actuators.vent_open);
    }

    #[test]
    fn overrides_ignored_in_auto() {
        let mut c = controller();
        let now = Instant::now();
        c.apply_control(ControlCommand::PumpOn, now);
        assert!(!c.actuators().pump_on);

        // The stored vector did not change either: entering manual later
        // starts from the untouched overrides.
        c.apply_control(ControlCommand::Manual, now);
        assert!(!c.actuators().pump_on);
    }

    #[test]
    fn returning_to_auto_reevaluates_immediately() {
        let mut c = controller();
        let now = Instant::now();
        c.tick(&frame(15.0, 60.0, 3000, false), now);
        c.apply_control(ControlCommand::Manual, now);
        assert!(!c.actuators().heater_on);

        c.apply_control(ControlCommand::Auto, now);
        assert!(c.actuators().heater_on, "auto re-runs policies on switch");
    }

    #[test]
    fn security_runs_in_manual_mode() {
        let mut c = controller();
        c.set_clock(Box::new(FixedHourClock::new(23)));
        let now = Instant::now();
        c.apply_control(ControlCommand::Manual, now);

        let out = c.tick(&frame(20.0, 60.0, 3000, true), now);
        assert_eq!(out.alarm, Some(AlarmEvent::On));
        assert!(out.actuators.alarm_active);
    }

    #[test]
    fn daytime_motion_does_not_alarm() {
        let mut c = controller();
        let out = c.tick(&frame(20.0, 60.0, 3000, true), Instant::now());
        assert_eq!(out.alarm, None);
        assert!(!out.actuators.alarm_active);
    }

    #[test]
    fn simulation_arms_security_during_the_day() {
        let mut c = controller();
        let now = Instant::now();
        c.apply_simulation(
            SimulationUpdate {
                active: Some(true),
                ..SimulationUpdate::default()
            },
            now,
        );
        let out = c.tick(&frame(0.0, 0.0, 0, true), now);
        assert_eq!(out.alarm, Some(AlarmEvent::On));
    }

    #[test]
    fn failed_clock_disarms_security() {
        let mut c = controller();
        c.set_clock(Box::new(FailingClock));
        let out = c.tick(&frame(20.0, 60.0, 3000, true), Instant::now());
        assert_eq!(out.alarm, None, "fail-safe day classification");
    }

    #[test]
    fn simulation_injection_seeds_and_reevaluates() {
        let mut c = controller();
        let now = Instant::now();
        c.apply_simulation(
            SimulationUpdate {
                active: Some(true),
                temperature: Some(10.0),
                ..SimulationUpdate::default()
            },
            now,
        );
        // Injection already ran the policies: cold snapshot => heater on.
        assert!(c.actuators().heater_on);
        assert_eq!(c.snapshot().temperature, 10.0);
    }

    #[test]
    fn simulation_injection_is_clamped() {
        let mut c = controller();
        let now = Instant::now();
        c.apply_simulation(
            SimulationUpdate {
                active: Some(true),
                temperature: Some(120.0),
                humidity: Some(-4.0),
                light_level: Some(90_000),
                ..SimulationUpdate::default()
            },
            now,
        );
        let snap = c.snapshot();
        assert_eq!(snap.temperature, 50.0);
        assert_eq!(snap.humidity, 0.0);
        assert_eq!(snap.light_level, 50_000);
    }

    #[test]
    fn heater_feedback_never_exceeds_ceiling() {
        let mut c = controller();
        let now = Instant::now();
        // Manual heat on, simulation active: temperature integrates upward
        // each tick but saturates at the physical ceiling.
        c.apply_control(ControlCommand::Manual, now);
        c.apply_control(ControlCommand::HeatOn, now);
        c.apply_simulation(
            SimulationUpdate {
                active: Some(true),
                temperature: Some(49.0),
                ..SimulationUpdate::default()
            },
            now,
        );

        let mut last = 0.0;
        for _ in 0..50 {
            let out = c.tick(&frame(0.0, 0.0, 0, false), now);
            assert!(out.snapshot.temperature <= 50.0);
            last = out.snapshot.temperature;
        }
        assert_eq!(last, 50.0);
    }

    #[test]
    fn pulse_irrigation_across_ticks() {
        let mut c = controller();
        let t0 = Instant::now();
        let out = c.tick(&frame(20.0, 30.0, 3000, false), t0);
        assert!(out.actuators.pump_on);

        let out = c.tick(&frame(20.0, 30.0, 3000, false), t0 + Duration::from_millis(2000));
        assert!(out.actuators.pump_on);

        let out = c.tick(&frame(20.0, 30.0, 3000, false), t0 + Duration::from_millis(5000));
        assert!(!out.actuators.pump_on, "pulse ends at the window boundary");
    }

    #[test]
    fn stale_sensor_field_survives_nan_read() {
        let mut c = controller();
        let now = Instant::now();
        c.tick(&frame(21.0, 55.0, 3000, false), now);
        let out = c.tick(&frame(f64::NAN, 58.0, 3000, false), now);
        assert_eq!(out.snapshot.temperature, 21.0);
        assert_eq!(out.snapshot.humidity, 58.0);
    }

    #[test]
    fn telemetry_reflects_committed_state() {
        let mut c = controller();
        let out = c.tick(&frame(15.0, 60.0, 500, false), Instant::now());
        assert_eq!(out.telemetry.temp, 15.0);
        assert!(out.telemetry.heat);
        assert!(out.telemetry.light, "dark + cool + daytime => grow light on");
        assert!(out.telemetry.auto);
        assert!(!out.telemetry.is_night);
        assert_eq!(out.telemetry.local_time, "12:00:00");
    }

    #[test]
    fn grow_light_off_at_night() {
        let mut c = controller();
        c.set_clock(Box::new(FixedHourClock::new(2)));
        let out = c.tick(&frame(20.0, 60.0, 500, false), Instant::now());
        assert!(!out.actuators.light_on);
    }
}
