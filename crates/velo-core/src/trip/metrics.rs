//! Drive time, idle time and average speed.

use super::TripState;

/// Whether a control-loop cycle was spent riding or standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleKind {
    Driving,
    Idle,
}

/// Book one control-loop cycle of `period_ms` to exactly one of the two timers.
pub fn accumulate(state: &mut TripState, period_ms: u32, drive_threshold_centi_kmh: u32) -> CycleKind {
    if state.speed_centi_kmh > drive_threshold_centi_kmh {
        state.drive_ms = state.drive_ms.saturating_add(period_ms);
        CycleKind::Driving
    } else {
        state.idle_ms = state.idle_ms.saturating_add(period_ms);
        CycleKind::Idle
    }
}

/// `trip_cm / drive hours`, expressed in centi-km/h.
pub fn average_speed_centi_kmh(trip_cm: u32, drive_ms: u32) -> u32 {
    if trip_cm == 0 || drive_ms == 0 {
        return 0;
    }
    let average = trip_cm as u64 * 3600 / drive_ms as u64;
    u32::try_from(average).unwrap_or(u32::MAX)
}
