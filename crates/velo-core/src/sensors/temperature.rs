use core::fmt::Debug;

use embassy_time::{Duration, Instant};
use log::{debug, warn};

/// Ambient temperature collaborator.
pub trait TemperatureSensor {
    type Error: Debug;

    fn read_celsius(&mut self) -> Result<f32, Self::Error>;
}

/// Rate limiter in front of a [`TemperatureSensor`].
///
/// The sensor sits on a shared bus and changes slowly, so it is read at most
/// once per `refresh` interval. Between reads, and after a failed read, the
/// last good value is returned. `None` means no read has ever succeeded.
#[derive(Debug)]
pub struct ThrottledTemperature {
    refresh: Duration,
    last_read: Option<Instant>,
    value: Option<f32>,
}

impl ThrottledTemperature {
    pub const fn new(refresh: Duration) -> Self {
        Self {
            refresh,
            last_read: None,
            value: None,
        }
    }

    pub fn read<S: TemperatureSensor>(&mut self, sensor: &mut S, now: Instant) -> Option<f32> {
        let due = match self.last_read {
            Some(last) => now.saturating_duration_since(last) >= self.refresh,
            None => true,
        };
        if !due {
            return self.value;
        }

        self.last_read = Some(now);
        match sensor.read_celsius() {
            Ok(celsius) if celsius.is_finite() => {
                debug!("Temperature refreshed: {:.1} C", celsius);
                self.value = Some(celsius);
            }
            Ok(celsius) => warn!("Discarding non-finite temperature {}", celsius),
            Err(e) => warn!("Temperature read failed: {:?}", e),
        }
        self.value
    }

    pub fn value(&self) -> Option<f32> {
        self.value
    }
}
