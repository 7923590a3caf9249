//! Hardware-independent core library for the velo bicycle computer
//!
//! This crate contains the trip-computer engine: the interrupt-safe wheel
//! rotation sampler, the stop timeout, drive/idle time accounting, the
//! power-loss-safe persistence policy, and the screen state machine with its
//! two views. Every piece of hardware (rotation sensor, buttons, clock,
//! temperature sensor, non-volatile storage, display) is reached through a
//! trait, so the whole engine runs on desktop hosts for the simulator and tests.
//!
//! It is `#![no_std]` and allocation free.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod app_state;
pub mod config;
pub mod input;
pub mod pages;
pub mod sensors;
pub mod storage;
pub mod trip;
pub mod ui;

pub use app_state::{RunState, TripComputer};
pub use config::TripConfig;
pub use trip::{SharedTrip, TripSnapshot, TripState};
