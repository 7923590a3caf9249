//! Trip state and the components that advance it.
//!
//! [`TripState`] is the single record mutated by both execution contexts:
//! the rotation interrupt ([`motion::on_rotation`]) and the control loop
//! ([`motion::check_stopped`], [`metrics::accumulate`], the persistence
//! manager). It is shared through [`SharedTrip`], which serializes every
//! access inside a critical section.

pub mod metrics;
pub mod motion;
mod shared;

pub use shared::SharedTrip;

use embassy_time::Instant;

use crate::sensors::TimeOfDay;
use crate::storage::PersistedTrip;

/// Live trip-computer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripState {
    /// Lifetime distance, wraps to zero at [`DISTANCE_ROLLOVER_CM`](crate::config::DISTANCE_ROLLOVER_CM).
    pub odometer_cm: u32,
    /// Distance since the last trip reset.
    pub trip_cm: u32,
    /// Most recent instantaneous speed. Never persisted.
    pub speed_centi_kmh: u32,
    pub drive_ms: u32,
    pub idle_ms: u32,
    /// Wall-clock time of the last trip reset.
    pub trip_start: TimeOfDay,
    /// In-memory state has diverged from the last persisted record.
    pub dirty: bool,
    last_edge: Instant,
}

impl TripState {
    /// Zeroed state, as on first boot.
    pub const fn new() -> Self {
        Self {
            odometer_cm: 0,
            trip_cm: 0,
            speed_centi_kmh: 0,
            drive_ms: 0,
            idle_ms: 0,
            trip_start: TimeOfDay::MIDNIGHT,
            dirty: false,
            last_edge: Instant::from_ticks(0),
        }
    }

    /// Timestamp of the most recent accepted rotation edge.
    pub fn last_edge(&self) -> Instant {
        self.last_edge
    }

    /// Zero the trip counters as one unit and stamp the new start time.
    ///
    /// The odometer is untouched. The state becomes dirty so the zeroed trip
    /// is written at the next stop.
    pub fn reset_trip(&mut self, now: TimeOfDay) {
        self.trip_cm = 0;
        self.drive_ms = 0;
        self.idle_ms = 0;
        self.trip_start = now;
        self.dirty = true;
    }

    /// Average speed over driving time, in centi-km/h.
    ///
    /// Zero whenever either the trip distance or the drive time is zero.
    pub fn average_speed_centi_kmh(&self) -> u32 {
        metrics::average_speed_centi_kmh(self.trip_cm, self.drive_ms)
    }

    /// The six persisted fields.
    pub fn persisted(&self) -> PersistedTrip {
        PersistedTrip {
            odometer_cm: self.odometer_cm,
            trip_cm: self.trip_cm,
            drive_ms: self.drive_ms,
            average_centi_kmh: self.average_speed_centi_kmh(),
            idle_ms: self.idle_ms,
            trip_start: self.trip_start,
        }
    }

    /// Load a restored record. Speed restarts at zero and the state is clean.
    pub fn restore(&mut self, record: &PersistedTrip) {
        self.odometer_cm = record.odometer_cm;
        self.trip_cm = record.trip_cm;
        self.drive_ms = record.drive_ms;
        self.idle_ms = record.idle_ms;
        self.trip_start = record.trip_start;
        self.speed_centi_kmh = 0;
        self.dirty = false;
    }

    pub fn snapshot(&self) -> TripSnapshot {
        TripSnapshot {
            odometer_cm: self.odometer_cm,
            trip_cm: self.trip_cm,
            speed_centi_kmh: self.speed_centi_kmh,
            drive_ms: self.drive_ms,
            idle_ms: self.idle_ms,
            average_centi_kmh: self.average_speed_centi_kmh(),
            trip_start: self.trip_start,
        }
    }
}

impl Default for TripState {
    fn default() -> Self {
        Self::new()
    }
}

/// Consistent copy of the displayed trip values, taken under one lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TripSnapshot {
    pub odometer_cm: u32,
    pub trip_cm: u32,
    pub speed_centi_kmh: u32,
    pub drive_ms: u32,
    pub idle_ms: u32,
    pub average_centi_kmh: u32,
    pub trip_start: TimeOfDay,
}
