//! Push-button handling.
//!
//! Both operator inputs (view change and trip reset) are deliberate long
//! presses: an action is accepted only after the button has been held for a
//! full hold interval, so contact bounce and brushes against the bar never
//! trigger anything.

use embassy_time::{Duration, Instant};
use embedded_hal::digital::InputPin;
use log::warn;

/// Hold-to-activate debounce.
///
/// `mark` follows `now` on every cycle the input is released and on every
/// accepted activation, so a fire needs the input asserted continuously for
/// `hold` since whichever came last. A repeating debounce keeps firing once
/// per `hold` interval while held; a latching one fires once per press and
/// re-arms only on release.
#[derive(Debug, Clone)]
pub struct HoldDebounce {
    hold: Duration,
    mark: Option<Instant>,
    repeat: bool,
    latched: bool,
}

impl HoldDebounce {
    pub const fn new(hold: Duration) -> Self {
        Self {
            hold,
            mark: None,
            repeat: true,
            latched: false,
        }
    }

    /// Fires at most once per press.
    pub const fn latching(hold: Duration) -> Self {
        Self {
            repeat: false,
            ..Self::new(hold)
        }
    }

    /// Feed the current input level. Returns `true` when an activation is accepted.
    pub fn poll(&mut self, asserted: bool, now: Instant) -> bool {
        let mark = *self.mark.get_or_insert(now);
        if !asserted {
            self.mark = Some(now);
            self.latched = false;
            return false;
        }
        if self.latched {
            return false;
        }
        if now.saturating_duration_since(mark) >= self.hold {
            self.mark = Some(now);
            self.latched = !self.repeat;
            return true;
        }
        false
    }
}

/// Push button wired to ground with a pull-up: low means pressed.
pub struct Button<P> {
    pin: P,
    debounce: HoldDebounce,
    name: &'static str,
    faulted: bool,
}

impl<P: InputPin> Button<P> {
    /// Repeats once per `hold` while held.
    pub fn new(name: &'static str, pin: P, hold: Duration) -> Self {
        Self::with_debounce(name, pin, HoldDebounce::new(hold))
    }

    /// Fires once per press, however long it is held.
    pub fn latching(name: &'static str, pin: P, hold: Duration) -> Self {
        Self::with_debounce(name, pin, HoldDebounce::latching(hold))
    }

    fn with_debounce(name: &'static str, pin: P, debounce: HoldDebounce) -> Self {
        Self {
            pin,
            debounce,
            name,
            faulted: false,
        }
    }

    /// Whether the button is held right now. A failed pin read counts as released.
    pub fn is_pressed(&mut self) -> bool {
        match self.pin.is_low() {
            Ok(low) => {
                self.faulted = false;
                low
            }
            Err(e) => {
                if !self.faulted {
                    warn!("{} button read failed: {:?}", self.name, e);
                    self.faulted = true;
                }
                false
            }
        }
    }

    /// Sample the pin and run it through the hold debounce.
    pub fn poll(&mut self, now: Instant) -> bool {
        let pressed = self.is_pressed();
        self.debounce.poll(pressed, now)
    }

    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use core::cell::Cell;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    /// Input pin whose level is set by the test.
    pub(crate) struct FakePin<'a> {
        pub(crate) pressed: &'a Cell<bool>,
        pub(crate) broken: bool,
    }

    impl ErrorType for FakePin<'_> {
        type Error = ErrorKind;
    }

    impl InputPin for FakePin<'_> {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            self.is_low().map(|low| !low)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            if self.broken {
                Err(ErrorKind::Other)
            } else {
                Ok(self.pressed.get())
            }
        }
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_short_press_never_fires() {
        let mut debounce = HoldDebounce::new(Duration::from_millis(1000));
        assert!(!debounce.poll(false, at(0)));
        for ms in (250..1000).step_by(250) {
            assert!(!debounce.poll(true, at(ms)));
        }
        assert!(!debounce.poll(false, at(1000)));
        assert!(!debounce.poll(true, at(1250)));
    }

    #[test]
    fn test_hold_fires_after_interval_then_repeats() {
        let mut debounce = HoldDebounce::new(Duration::from_millis(1000));
        debounce.poll(false, at(0));

        let fired: heapless::Vec<u64, 8> = (250..=3000)
            .step_by(250)
            .filter(|&ms| debounce.poll(true, at(ms)))
            .collect();

        assert_eq!(fired.as_slice(), &[1000, 2000, 3000]);
    }

    #[test]
    fn test_latching_hold_fires_once_per_press() {
        let mut debounce = HoldDebounce::latching(Duration::from_millis(1000));
        debounce.poll(false, at(0));

        let fired: heapless::Vec<u64, 8> = (250..=4000)
            .step_by(250)
            .filter(|&ms| debounce.poll(true, at(ms)))
            .collect();
        assert_eq!(fired.as_slice(), &[1000]);

        assert!(!debounce.poll(false, at(4250)));
        assert!(!debounce.poll(true, at(4500)));
        assert!(debounce.poll(true, at(5250)), "release re-arms the hold");
    }

    #[test]
    fn test_bounce_restarts_the_hold() {
        let mut debounce = HoldDebounce::new(Duration::from_millis(1000));
        debounce.poll(false, at(0));
        assert!(!debounce.poll(true, at(250)));
        assert!(!debounce.poll(true, at(750)));
        assert!(!debounce.poll(false, at(800)));
        assert!(!debounce.poll(true, at(1250)));
        assert!(!debounce.poll(true, at(1750)));
        assert!(debounce.poll(true, at(1800)));
    }

    #[test]
    fn test_button_is_active_low() {
        let pressed = Cell::new(false);
        let mut button = Button::new(
            "view",
            FakePin {
                pressed: &pressed,
                broken: false,
            },
            Duration::from_millis(1000),
        );

        assert!(!button.poll(at(0)));
        pressed.set(true);
        assert!(!button.poll(at(500)));
        assert!(button.poll(at(1000)));
    }

    #[test]
    fn test_broken_pin_reads_released() {
        let pressed = Cell::new(true);
        let mut button = Button::new(
            "reset",
            FakePin {
                pressed: &pressed,
                broken: true,
            },
            Duration::from_millis(1000),
        );

        for ms in (0..5000).step_by(250) {
            assert!(!button.poll(at(ms)));
        }
    }
}
