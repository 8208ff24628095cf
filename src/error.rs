// Copyright (c) 2026 greenguard
// Licensed under the MIT License. See LICENSE file in the project root.

//! Error taxonomy for the decision engine
//!
//! Nothing here is fatal: a bad sensor reading falls back to the previous
//! value, a failing clock falls back to "day", and an invalid settings update
//! is rejected atomically. The worst case is "no actuator change this tick".

use thiserror::Error;

/// Recoverable validation errors surfaced by the controller.
#[derive(Debug, Error, PartialEq)]
pub enum ControlError {
    /// A settings update would produce contradictory or negative bounds.
    /// The prior settings are kept unchanged.
    #[error("invalid settings: {reason}")]
    InvalidSettings {
        /// Human-readable explanation of the rejected update.
        reason: String,
    },
}

/// Errors from a wall-clock source.
#[derive(Debug, Error, PartialEq)]
pub enum ClockError {
    /// The time source could not be read. Callers treat this as "day".
    #[error("time source unavailable")]
    TimeUnavailable,
}
