// Copyright (c) 2026 greenguard
// Licensed under the MIT License. See LICENSE file in the project root.

//! Clock gate - resolves "is it night" from a pluggable time source
//!
//! Policies never special-case the demo override: the controller is handed a
//! [`ClockSource`] and the demo-clock message swaps a [`FixedHourClock`] in
//! place of the [`RealClock`].

use chrono::{Local, Timelike};

use crate::error::ClockError;

/// Night starts at this hour (inclusive).
pub const NIGHT_START_HOUR: u32 = 22;
/// Night ends at this hour (exclusive).
pub const NIGHT_END_HOUR: u32 = 6;

/// A source of local wall-clock time.
pub trait ClockSource: Send + Sync {
    /// Current local hour, 0-23.
    fn local_hour(&self) -> Result<u32, ClockError>;

    /// Current local time formatted `HH:MM:SS`, for telemetry.
    fn local_time(&self) -> Result<String, ClockError>;
}

/// Night classification with fail-safe day fallback.
///
/// A clock failure disarms security and lifts night-only constraints, which
/// is operationally safer than blocking control on a time error.
pub fn is_night(clock: &dyn ClockSource) -> bool {
    match clock.local_hour() {
        Ok(hour) => hour >= NIGHT_START_HOUR || hour < NIGHT_END_HOUR,
        Err(ClockError::TimeUnavailable) => false,
    }
}

/// System local time via chrono.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealClock;

impl ClockSource for RealClock {
    fn local_hour(&self) -> Result<u32, ClockError> {
        Ok(Local::now().hour())
    }

    fn local_time(&self) -> Result<String, ClockError> {
        Ok(Local::now().format("%H:%M:%S").to_string())
    }
}

/// Demo override clock pinned to a single hour of the day.
#[derive(Debug, Clone, Copy)]
pub struct FixedHourClock {
    hour: u32,
}

impl FixedHourClock {
    /// Create a clock pinned at `hour` (wrapped into 0-23).
    pub fn new(hour: u32) -> Self {
        Self { hour: hour % 24 }
    }

    /// The pinned hour.
    pub fn hour(&self) -> u32 {
        self.hour
    }
}

impl ClockSource for FixedHourClock {
    fn local_hour(&self) -> Result<u32, ClockError> {
        Ok(self.hour)
    }

    fn local_time(&self) -> Result<String, ClockError> {
        Ok(format!("{:02}:00:00", self.hour))
    }
}

#[cfg(test)]
pub(crate) struct FailingClock;

#[cfg(test)]
impl ClockSource for FailingClock {
    fn local_hour(&self) -> Result<u32, ClockError> {
        Err(ClockError::TimeUnavailable)
    }

    fn local_time(&self) -> Result<String, ClockError> {
        Err(ClockError::TimeUnavailable)
    }
}
