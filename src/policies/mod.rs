//! Control policies - the stateful rules mapping snapshots to actuators
//!
//! In Auto mode the environmental policies run in the fixed order
//! climate → irrigation → lighting; climate may retract the heater because of
//! venting before the later policies evaluate. Security runs every tick
//! regardless of mode.

pub mod climate;
pub mod irrigation;
pub mod lighting;
pub mod security;

pub use irrigation::{IrrigationPolicy, IrrigationStrategy};
