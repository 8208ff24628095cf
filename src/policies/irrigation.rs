// Copyright (c) 2026 greenguard
// Licensed under the MIT License. See LICENSE file in the project root.

//! Irrigation policy - timed pulse or continuous threshold watering
//!
//! Two source lineages disagree on pump semantics, so both are first-class
//! variants selected at construction time rather than merged into one rule.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::ActuatorState;

/// Default pulse duration, ms.
pub const DEFAULT_PULSE_MS: u64 = 5000;

/// Which watering rule drives the pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IrrigationStrategy {
    /// Activate on dry, auto-deactivate after a fixed duration. While the
    /// pulse runs, humidity is not re-checked.
    Pulse,
    /// Pump on exactly while humidity is below the threshold. No timer, no
    /// latching; may chatter at the boundary.
    Continuous,
}

/// Stateful irrigation policy.
#[derive(Debug)]
pub struct IrrigationPolicy {
    strategy: IrrigationStrategy,
    pulse_duration: Duration,
    running_since: Option<Instant>,
}

impl IrrigationPolicy {
    /// Build a policy for `strategy`; `pulse_duration` only applies to
    /// [`IrrigationStrategy::Pulse`].
    pub fn new(strategy: IrrigationStrategy, pulse_duration: Duration) -> Self {
        Self {
            strategy,
            pulse_duration,
            running_since: None,
        }
    }

    /// The configured strategy.
    pub fn strategy(&self) -> IrrigationStrategy {
        self.strategy
    }

    /// Evaluate the pump for one tick.
    ///
    /// Invariant: a recorded pulse start implies `pump_on`.
    pub fn evaluate(&mut self, humidity: f64, hum_min: f64, now: Instant, actuators: &mut ActuatorState) {
        match self.strategy {
            IrrigationStrategy::Pulse => {
                if humidity < hum_min && self.running_since.is_none() {
                    info!("irrigation pulse started (humidity {humidity:.1} < {hum_min:.1})");
                    actuators.pump_on = true;
                    self.running_since = Some(now);
                }

                if let Some(started) = self.running_since {
                    if now.duration_since(started) >= self.pulse_duration {
                        info!("irrigation pulse complete");
                        actuators.pump_on = false;
                        self.running_since = None;
                    }
                }
            }
            IrrigationStrategy::Continuous => {
                actuators.pump_on = humidity < hum_min;
            }
        }
    }

    /// Drop any in-flight pulse without touching the actuators. Called when
    /// the operator takes manual control of the pump.
    pub fn reset(&mut self) {
        self.running_since = None;
    }
}
