use core::fmt::{self, Debug, Display};

use log::warn;
use serde::{Deserialize, Serialize};

/// Wall-clock time of day as reported by the RTC.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self::new(0, 0, 0);

    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }

    /// Whether every field is inside its range.
    pub const fn is_valid(&self) -> bool {
        self.hour < 24 && self.minute < 60 && self.second < 60
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// Real-time clock collaborator.
pub trait WallClock {
    type Error: Debug;

    fn now(&mut self) -> Result<TimeOfDay, Self::Error>;
}

/// Clock wrapper that never fails.
///
/// A failed or out-of-range read returns the last good reading, or
/// midnight if the clock never answered.
pub struct CachedClock<C> {
    clock: C,
    last: TimeOfDay,
    healthy: bool,
}

impl<C: WallClock> CachedClock<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            last: TimeOfDay::MIDNIGHT,
            healthy: true,
        }
    }

    pub fn now(&mut self) -> TimeOfDay {
        match self.clock.now() {
            Ok(time) if time.is_valid() => {
                self.last = time;
                self.healthy = true;
            }
            Ok(time) => self.degrade(time),
            Err(e) => self.degrade(e),
        }
        self.last
    }

    /// Last reading returned by [`now`](Self::now).
    pub fn last(&self) -> TimeOfDay {
        self.last
    }

    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    fn degrade(&mut self, cause: impl Debug) {
        // Only the transition is logged, the loop polls every cycle.
        if self.healthy {
            warn!("Clock read failed ({:?}), holding {}", cause, self.last);
            self.healthy = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeClock {
        readings: [Result<TimeOfDay, ()>; 4],
        index: usize,
    }

    impl WallClock for FakeClock {
        type Error = ();

        fn now(&mut self) -> Result<TimeOfDay, ()> {
            let reading = self.readings[self.index.min(self.readings.len() - 1)];
            self.index += 1;
            reading
        }
    }

    #[test]
    fn test_display_is_zero_padded() {
        let mut text = heapless::String::<8>::new();
        core::fmt::write(&mut text, format_args!("{}", TimeOfDay::new(7, 5, 9))).unwrap();
        assert_eq!(text.as_str(), "07:05:09");
    }

    #[test]
    fn test_failed_read_holds_last_good_time() {
        let mut clock = CachedClock::new(FakeClock {
            readings: [
                Ok(TimeOfDay::new(10, 15, 0)),
                Err(()),
                Ok(TimeOfDay::new(25, 0, 0)),
                Ok(TimeOfDay::new(10, 15, 2)),
            ],
            index: 0,
        });

        assert_eq!(clock.now(), TimeOfDay::new(10, 15, 0));
        assert_eq!(clock.now(), TimeOfDay::new(10, 15, 0), "read error");
        assert_eq!(clock.now(), TimeOfDay::new(10, 15, 0), "out of range hour");
        assert_eq!(clock.now(), TimeOfDay::new(10, 15, 2));
    }

    #[test]
    fn test_dead_clock_reads_midnight() {
        let mut clock = CachedClock::new(FakeClock {
            readings: [Err(()); 4],
            index: 0,
        });
        assert_eq!(clock.now(), TimeOfDay::MIDNIGHT);
        assert_eq!(clock.last(), TimeOfDay::MIDNIGHT);
    }
}
