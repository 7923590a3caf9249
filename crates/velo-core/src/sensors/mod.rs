//! Clock and temperature collaborators.
//!
//! The drivers themselves (RTC, BME280, ...) live in the firmware. The core
//! only sees these traits and wraps them so that an unavailable device
//! degrades into a last-known or placeholder value instead of an error.

mod clock;
mod temperature;

pub use clock::{CachedClock, TimeOfDay, WallClock};
pub use temperature::{TemperatureSensor, ThrottledTemperature};
