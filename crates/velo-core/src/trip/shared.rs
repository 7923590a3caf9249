use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Instant;

use super::{TripSnapshot, TripState, motion};

/// Trip state shared between the rotation interrupt and the control loop.
///
/// Every access runs inside a critical section, so the odometer and trip
/// distance (incremented together by the interrupt) are never observed
/// half-updated, and a trip reset is never observed half-applied.
///
/// ```rust,ignore
/// static TRIP: SharedTrip = SharedTrip::new(206);
///
/// #[interrupt]
/// fn wheel_sensor() {
///     TRIP.on_rotation(Instant::now());
/// }
/// ```
pub struct SharedTrip {
    state: Mutex<CriticalSectionRawMutex, RefCell<TripState>>,
    circumference_cm: u32,
}

impl SharedTrip {
    pub const fn new(circumference_cm: u32) -> Self {
        Self {
            state: Mutex::new(RefCell::new(TripState::new())),
            circumference_cm,
        }
    }

    pub const fn circumference_cm(&self) -> u32 {
        self.circumference_cm
    }

    /// Rotation interrupt entry point.
    pub fn on_rotation(&self, now: Instant) {
        self.with(|state| motion::on_rotation(state, self.circumference_cm, now));
    }

    /// Run `f` with exclusive access to the state.
    ///
    /// Keep `f` short: interrupts are masked for its whole duration.
    pub fn with<R>(&self, f: impl FnOnce(&mut TripState) -> R) -> R {
        self.state.lock(|cell| f(&mut *cell.borrow_mut()))
    }

    pub fn snapshot(&self) -> TripSnapshot {
        self.with(|state| state.snapshot())
    }
}
