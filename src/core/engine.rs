// Copyright (c) 2026 greenguard
// Licensed under the MIT License. See LICENSE file in the project root.

//! Engine - drives the controller on its two cadences
//!
//! One cooperative loop owns the controller: a sensor/policy interval, a
//! telemetry/display interval and the external command channel are raced in
//! a single `select!`, so every mutation runs to completion before the next
//! input is looked at. No other task touches controller state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::ControlConfig;
use crate::display::DisplayRequest;
use crate::sensors::SensorSource;

use super::{AlarmEvent, Command, Controller, EventBus, Settings};

/// The engine that owns the controller and its input/output channels.
pub struct Engine {
    controller: Controller,
    sensors: Box<dyn SensorSource>,
    bus: Arc<EventBus>,
    display: Option<mpsc::Sender<DisplayRequest>>,
    sensor_interval: Duration,
    telemetry_interval: Duration,
}

impl Engine {
    /// Assemble an engine from configuration and collaborators.
    pub fn new(
        config: &ControlConfig,
        sensors: Box<dyn SensorSource>,
        bus: Arc<EventBus>,
        display: Option<mpsc::Sender<DisplayRequest>>,
    ) -> Self {
        let controller = Controller::new(
            config.settings,
            config.irrigation,
            Duration::from_millis(config.pulse_ms),
        );
        Self {
            controller,
            sensors,
            bus,
            display,
            sensor_interval: Duration::from_millis(config.sensor_interval_ms),
            telemetry_interval: Duration::from_millis(config.telemetry_interval_ms),
        }
    }

    /// Direct access to the controller, for assembly-time adjustments.
    pub fn controller_mut(&mut self) -> &mut Controller {
        &mut self.controller
    }

    /// Run until the command channel closes.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) -> Result<()> {
        info!(
            "engine running: sensor tick {:?}, telemetry tick {:?}",
            self.sensor_interval, self.telemetry_interval
        );
        let mut sensor_tick = tokio::time::interval(self.sensor_interval);
        let mut telemetry_tick = tokio::time::interval(self.telemetry_interval);

        loop {
            tokio::select! {
                _ = sensor_tick.tick() => self.on_sensor_tick().await,
                _ = telemetry_tick.tick() => self.on_telemetry_tick(),
                command = commands.recv() => match command {
                    Some(command) => self.on_command(command),
                    None => {
                        info!("command channel closed, engine stopping");
                        return Ok(());
                    }
                },
            }
        }
    }

    async fn on_sensor_tick(&mut self) {
        let raw = match self.sensors.sample().await {
            Ok(raw) => raw,
            Err(err) => {
                // Worst case is "no actuator state change this tick".
                warn!("sensor sample failed, skipping tick: {err}");
                self.bus.publish_error(&format!("sensor sample failed: {err}"));
                return;
            }
        };

        let outcome = self.controller.tick(&raw, Instant::now());
        self.bus.publish_actuators(outcome.actuators);
        if let Some(alarm) = outcome.alarm {
            self.bus.publish_alarm(alarm);
            if alarm == AlarmEvent::On {
                self.send_display(DisplayRequest::Banner {
                    line1: "!! ALERT !!".into(),
                    line2: "INTRUSION".into(),
                });
            }
        }
    }

    fn on_telemetry_tick(&mut self) {
        let record = self.controller.telemetry();
        self.send_display(DisplayRequest::Status(record.clone()));
        self.bus.publish_telemetry(record);
    }

    fn on_command(&mut self, command: Command) {
        let now = Instant::now();
        match command {
            Command::Control(control) => self.controller.apply_control(control, now),
            Command::Settings(update) => match self.controller.apply_settings(update, now) {
                Ok(()) => {
                    let Settings { temp_min, temp_max, .. } = self.controller.settings();
                    self.send_display(DisplayRequest::Banner {
                        line1: "CONFIG UPDATE!".into(),
                        line2: format!("T:{temp_min:.1}-{temp_max:.1}"),
                    });
                }
                Err(err) => {
                    warn!("settings update rejected: {err}");
                    self.bus.publish_error(&err.to_string());
                    return;
                }
            },
            Command::Simulation(update) => {
                self.controller.apply_simulation(update, now);
                if self.controller.simulation_active() {
                    self.send_display(DisplayRequest::Banner {
                        line1: "SIMULATION MODE".into(),
                        line2: String::new(),
                    });
                }
            }
            Command::DemoClock(update) => self.controller.apply_demo_clock(update),
        }

        // Keep published state consistent with what was just committed
        // instead of waiting for the next telemetry tick.
        self.bus.publish_telemetry(self.controller.telemetry());
    }

    fn send_display(&self, request: DisplayRequest) {
        if let Some(display) = &self.display {
            // Best effort: a held banner must never back-pressure the core.
            let _ = display.try_send(request);
        }
    }
}
