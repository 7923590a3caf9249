//! Wheel rotation sampling and the stop timeout.
//!
//! [`on_rotation`] runs in interrupt context: integer updates only, no I/O,
//! no logging, and no way to fail. [`check_stopped`] runs once per control
//! loop cycle and is the only way the speed can fall back to zero, since a
//! stationary wheel produces no edges.

use embassy_time::{Duration, Instant};

use super::TripState;
use crate::config::DISTANCE_ROLLOVER_CM;

/// Ms per hour divided by cm per km, times 100 for the centi- prefix.
const SPEED_SCALE: u64 = 3600;

/// Account for one wheel rotation edge at `now`.
///
/// An edge with no measurable elapsed time (zero milliseconds, or a timestamp
/// older than the previous edge) leaves the state untouched. An accepted edge
/// always marks the state dirty, even when the interval is so long that the
/// speed truncates to zero.
pub fn on_rotation(state: &mut TripState, circumference_cm: u32, now: Instant) {
    let elapsed_ms = match now.checked_duration_since(state.last_edge) {
        Some(elapsed) => elapsed.as_millis(),
        None => return,
    };
    if elapsed_ms == 0 {
        return;
    }

    let speed = SPEED_SCALE * circumference_cm as u64 / elapsed_ms;
    state.speed_centi_kmh = u32::try_from(speed).unwrap_or(u32::MAX);
    state.odometer_cm = advance(state.odometer_cm, circumference_cm);
    state.trip_cm = advance(state.trip_cm, circumference_cm);
    state.last_edge = now;
    state.dirty = true;
}

/// Force the speed to zero once no edge arrived for longer than `timeout`.
///
/// Returns `true` on the cycle that actually stopped the wheel.
pub fn check_stopped(state: &mut TripState, now: Instant, timeout: Duration) -> bool {
    if now.saturating_duration_since(state.last_edge) > timeout && state.speed_centi_kmh != 0 {
        state.speed_centi_kmh = 0;
        return true;
    }
    false
}

fn advance(distance_cm: u32, step_cm: u32) -> u32 {
    match distance_cm.checked_add(step_cm) {
        Some(next) if next < DISTANCE_ROLLOVER_CM => next,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CIRCUMFERENCE_CM: u32 = 206;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_speed_from_one_second_interval() {
        let mut state = TripState::new();
        on_rotation(&mut state, CIRCUMFERENCE_CM, at(1000));
        on_rotation(&mut state, CIRCUMFERENCE_CM, at(2000));

        // 3600 * 206 / 1000 = 741.6, truncated
        assert_eq!(state.speed_centi_kmh, 741);
        assert_eq!(state.odometer_cm, 412);
        assert_eq!(state.trip_cm, 412);
        assert_eq!(state.last_edge(), at(2000));
    }

    #[test]
    fn test_speed_follows_formula_for_many_intervals() {
        let mut state = TripState::new();
        let mut now = 0;
        for elapsed in [1u64, 7, 150, 333, 999, 2500, 60_000] {
            now += elapsed;
            let odometer_before = state.odometer_cm;
            let trip_before = state.trip_cm;

            on_rotation(&mut state, CIRCUMFERENCE_CM, at(now));

            assert_eq!(
                state.speed_centi_kmh as u64,
                3600 * CIRCUMFERENCE_CM as u64 / elapsed,
                "speed after a {} ms interval",
                elapsed
            );
            assert_eq!(state.odometer_cm, odometer_before + CIRCUMFERENCE_CM);
            assert_eq!(state.trip_cm, trip_before + CIRCUMFERENCE_CM);
        }
    }

    #[test]
    fn test_zero_elapsed_edge_is_ignored() {
        let mut state = TripState::new();
        on_rotation(&mut state, CIRCUMFERENCE_CM, at(500));
        on_rotation(&mut state, CIRCUMFERENCE_CM, at(1500));
        let before = state.clone();

        on_rotation(&mut state, CIRCUMFERENCE_CM, at(1500));

        assert_eq!(state, before);
    }

    #[test]
    fn test_sub_millisecond_edge_is_ignored() {
        let mut state = TripState::new();
        on_rotation(&mut state, CIRCUMFERENCE_CM, at(500));
        let before = state.clone();

        on_rotation(&mut state, CIRCUMFERENCE_CM, at(500) + Duration::from_micros(400));

        assert_eq!(state, before);
    }

    #[test]
    fn test_edge_older_than_last_is_ignored() {
        let mut state = TripState::new();
        on_rotation(&mut state, CIRCUMFERENCE_CM, at(2000));
        let before = state.clone();

        on_rotation(&mut state, CIRCUMFERENCE_CM, at(1000));

        assert_eq!(state, before);
    }

    #[test]
    fn test_odometer_rolls_over_to_zero() {
        let mut state = TripState::new();
        state.odometer_cm = DISTANCE_ROLLOVER_CM - 100;
        state.trip_cm = 1000;

        on_rotation(&mut state, CIRCUMFERENCE_CM, at(1000));

        assert_eq!(state.odometer_cm, 0);
        assert_eq!(state.trip_cm, 1206);
    }

    #[test]
    fn test_crawl_below_one_unit_still_marks_dirty() {
        let mut state = TripState::new();

        // 3600 * 206 / 800_000 truncates to zero.
        on_rotation(&mut state, CIRCUMFERENCE_CM, at(800_000));

        assert_eq!(state.speed_centi_kmh, 0);
        assert_eq!(state.odometer_cm, CIRCUMFERENCE_CM);
        assert!(state.dirty);
    }

    #[test]
    fn test_stop_timeout_zeroes_speed_idempotently() {
        let mut state = TripState::new();
        let timeout = Duration::from_millis(3000);
        on_rotation(&mut state, CIRCUMFERENCE_CM, at(1000));
        on_rotation(&mut state, CIRCUMFERENCE_CM, at(2000));

        assert!(!check_stopped(&mut state, at(5000), timeout), "exactly at the deadline");
        assert_eq!(state.speed_centi_kmh, 741);

        assert!(check_stopped(&mut state, at(5001), timeout));
        assert_eq!(state.speed_centi_kmh, 0);

        assert!(!check_stopped(&mut state, at(5250), timeout));
        assert_eq!(state.speed_centi_kmh, 0);
    }

    #[test]
    fn test_stop_timeout_keeps_distance() {
        let mut state = TripState::new();
        on_rotation(&mut state, CIRCUMFERENCE_CM, at(1000));

        check_stopped(&mut state, at(10_000), Duration::from_millis(3000));

        assert_eq!(state.odometer_cm, CIRCUMFERENCE_CM);
        assert_eq!(state.trip_cm, CIRCUMFERENCE_CM);
    }
}
