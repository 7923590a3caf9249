//! Fixed-width formatting of the displayed readings.
//!
//! Every formatter returns the same number of characters whatever the value,
//! so redrawing a field always covers every digit of the previous value.
//! Out-of-range values clamp to the largest representable reading.

use core::fmt::Write;

use heapless::String;

use crate::sensors::TimeOfDay;

/// Largest speed shown, `99.9` km/h, in centi-km/h.
const MAX_SPEED_CENTI_KMH: u32 = 9_999;

/// `99:59:59`
const MAX_DURATION_S: u32 = 99 * 3600 + 59 * 60 + 59;

const MAX_TEMPERATURE_TENTHS: i32 = 999;

/// `vv.v` km/h: `kmh = v / 100`, `tenths = (v / 10) % 10`.
pub fn speed(centi_kmh: u32) -> String<4> {
    let v = centi_kmh.min(MAX_SPEED_CENTI_KMH);
    let mut out = String::new();
    write!(out, "{:02}.{}", v / 100, (v / 10) % 10).ok();
    out
}

/// `kkkk.h` km with one decimal.
pub fn odometer(cm: u32) -> String<6> {
    let mut out = String::new();
    write!(out, "{:04}.{}", (cm / 100_000).min(9_999), (cm / 10_000) % 10).ok();
    out
}

/// `kkkk.mmm` km with metre resolution.
pub fn trip(cm: u32) -> String<8> {
    let mut out = String::new();
    write!(out, "{:04}.{:03}", (cm / 100_000).min(9_999), (cm / 100) % 1000).ok();
    out
}

/// `HH:MM:SS` of an accumulated duration.
pub fn duration(ms: u32) -> String<8> {
    let s = (ms / 1000).min(MAX_DURATION_S);
    let mut out = String::new();
    write!(out, "{:02}:{:02}:{:02}", s / 3600, (s / 60) % 60, s % 60).ok();
    out
}

pub fn time_of_day(time: TimeOfDay) -> String<8> {
    let mut out = String::new();
    write!(out, "{}", time).ok();
    out
}

/// `+dd.dC`, or ` --.-C` when no reading is available.
pub fn temperature(celsius: Option<f32>) -> String<6> {
    let mut out = String::new();
    match celsius {
        Some(c) if c.is_finite() => {
            let scaled = c * 10.0;
            // `as` truncates toward zero and saturates.
            let tenths = if scaled >= 0.0 {
                (scaled + 0.5) as i32
            } else {
                (scaled - 0.5) as i32
            };
            let tenths = tenths.clamp(-MAX_TEMPERATURE_TENTHS, MAX_TEMPERATURE_TENTHS);
            let sign = if tenths < 0 { '-' } else { '+' };
            let magnitude = tenths.unsigned_abs();
            write!(out, "{}{:02}.{}C", sign, magnitude / 10, magnitude % 10).ok();
        }
        _ => {
            out.push_str(" --.-C").ok();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_digits() {
        assert_eq!(speed(0).as_str(), "00.0");
        assert_eq!(speed(741).as_str(), "07.4");
        assert_eq!(speed(2_599).as_str(), "25.9");
        assert_eq!(speed(9_999).as_str(), "99.9");
        assert_eq!(speed(u32::MAX).as_str(), "99.9");
    }

    #[test]
    fn test_distances_are_zero_padded() {
        assert_eq!(odometer(0).as_str(), "0000.0");
        assert_eq!(odometer(1_234_567).as_str(), "0012.3");
        assert_eq!(odometer(999_999_999).as_str(), "9999.9");
        assert_eq!(trip(1_234_567).as_str(), "0012.345");
        assert_eq!(trip(206).as_str(), "0000.002");
    }

    #[test]
    fn test_duration_clamps() {
        assert_eq!(duration(0).as_str(), "00:00:00");
        assert_eq!(duration(3_723_999).as_str(), "01:02:03");
        assert_eq!(duration(u32::MAX).as_str(), "99:59:59");
    }

    #[test]
    fn test_temperature_is_fixed_width() {
        assert_eq!(temperature(Some(23.44)).as_str(), "+23.4C");
        assert_eq!(temperature(Some(-4.25)).as_str(), "-04.3C");
        assert_eq!(temperature(Some(0.0)).as_str(), "+00.0C");
        assert_eq!(temperature(Some(150.0)).as_str(), "+99.9C");
        assert_eq!(temperature(None).as_str(), " --.-C");
        assert_eq!(temperature(Some(f32::NAN)).as_str(), " --.-C");
    }
}
