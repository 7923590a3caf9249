//! Tunable constants of the trip computer.
//!
//! Speeds are in centi-km/h (hundredths of a km/h). With distances in
//! centimetres and rotation intervals in milliseconds, `3600 * cm / ms` lands
//! exactly on this unit, so the sampler needs no further scaling.

use embassy_time::Duration;
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

/// Both distance counters wrap to zero here: 10 000 km, the width of the
/// four-digit km field on the display.
pub const DISTANCE_ROLLOVER_CM: u32 = 1_000_000_000;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripConfig {
    /// Distance covered by one wheel rotation.
    pub wheel_circumference_cm: u32,
    /// No rotation for longer than this forces the speed to zero.
    pub stop_timeout_ms: u32,
    /// Period of the control loop.
    pub loop_period_ms: u32,
    /// A cycle counts as driving above this speed, idle otherwise.
    pub drive_threshold_centi_kmh: u32,
    /// Motion above this speed is logged as invalidating the persisted trip.
    pub persist_guard_centi_kmh: u32,
    /// Hold time of the view-change button before the next view is shown.
    pub view_hold_ms: u32,
    /// Hold time of the reset button before the trip is cleared.
    pub reset_hold_ms: u32,
    /// Minimum interval between two temperature sensor reads.
    pub temperature_refresh_ms: u32,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("wheel circumference must be non-zero")]
    ZeroCircumference,
    #[error("control loop period must be non-zero")]
    ZeroLoopPeriod,
    #[error("stop timeout {timeout_ms} ms is shorter than the loop period {period_ms} ms")]
    TimeoutShorterThanPeriod { timeout_ms: u32, period_ms: u32 },
    #[error("button hold intervals must be non-zero")]
    ZeroHold,
    #[error("configured circumference {config_cm} cm differs from the sampler's {sampler_cm} cm")]
    CircumferenceMismatch { config_cm: u32, sampler_cm: u32 },
}

impl TripConfig {
    pub const DEFAULT: Self = Self {
        wheel_circumference_cm: 206,
        stop_timeout_ms: 3000,
        loop_period_ms: 250,
        drive_threshold_centi_kmh: 400,
        persist_guard_centi_kmh: 500,
        view_hold_ms: 1000,
        reset_hold_ms: 3000,
        temperature_refresh_ms: 5000,
    };

    /// Check the constraints the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wheel_circumference_cm == 0 {
            return Err(ConfigError::ZeroCircumference);
        }
        if self.loop_period_ms == 0 {
            return Err(ConfigError::ZeroLoopPeriod);
        }
        if self.stop_timeout_ms < self.loop_period_ms {
            return Err(ConfigError::TimeoutShorterThanPeriod {
                timeout_ms: self.stop_timeout_ms,
                period_ms: self.loop_period_ms,
            });
        }
        if self.view_hold_ms == 0 || self.reset_hold_ms == 0 {
            return Err(ConfigError::ZeroHold);
        }
        Ok(())
    }

    pub const fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms as u64)
    }

    pub const fn loop_period(&self) -> Duration {
        Duration::from_millis(self.loop_period_ms as u64)
    }

    pub const fn view_hold(&self) -> Duration {
        Duration::from_millis(self.view_hold_ms as u64)
    }

    pub const fn reset_hold(&self) -> Duration {
        Duration::from_millis(self.reset_hold_ms as u64)
    }

    pub const fn temperature_refresh(&self) -> Duration {
        Duration::from_millis(self.temperature_refresh_ms as u64)
    }
}

impl Default for TripConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
