//! Application state of the trip computer and its control-loop cycle.

use embassy_time::Instant;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_hal::digital::InputPin;
use log::{debug, info, warn};

use crate::config::{ConfigError, TripConfig};
use crate::input::Button;
use crate::pages::{ScreenManager, ViewContext, ViewId};
use crate::sensors::{CachedClock, TemperatureSensor, TimeOfDay, WallClock};
use crate::storage::{NvStorage, PersistStats, PersistedTrip, PersistenceManager};
use crate::trip::{SharedTrip, TripSnapshot, metrics, motion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Constructed, persisted trip not loaded yet.
    Uninitialized,
    Running,
}

/// The trip computer: every component of the control loop, wired to its
/// collaborators.
///
/// The trip state itself lives in a [`SharedTrip`] borrowed from outside,
/// since the rotation interrupt updates it too. Everything else is owned
/// here and only touched from [`tick`](Self::tick).
///
/// ```rust,ignore
/// static TRIP: SharedTrip = SharedTrip::new(206);
///
/// let mut computer = TripComputer::new(
///     TripConfig::DEFAULT, &TRIP, eeprom, rtc, thermometer, view_pin, reset_pin,
/// )?;
/// computer.startup();
/// loop {
///     computer.tick(Instant::now(), &mut display)?;
///     Timer::after(TripConfig::DEFAULT.loop_period()).await;
/// }
/// ```
pub struct TripComputer<'a, S, C, T, V, R> {
    config: TripConfig,
    trip: &'a SharedTrip,
    persistence: PersistenceManager<S>,
    screen: ScreenManager<V>,
    clock: CachedClock<C>,
    temperature: T,
    reset_button: Button<R>,
    run_state: RunState,
}

impl<'a, S, C, T, V, R> TripComputer<'a, S, C, T, V, R>
where
    S: NvStorage,
    C: WallClock,
    T: TemperatureSensor,
    V: InputPin,
    R: InputPin,
{
    pub fn new(
        config: TripConfig,
        trip: &'a SharedTrip,
        storage: S,
        clock: C,
        temperature: T,
        view_pin: V,
        reset_pin: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.wheel_circumference_cm != trip.circumference_cm() {
            return Err(ConfigError::CircumferenceMismatch {
                config_cm: config.wheel_circumference_cm,
                sampler_cm: trip.circumference_cm(),
            });
        }

        Ok(Self {
            config,
            trip,
            persistence: PersistenceManager::new(storage, config.persist_guard_centi_kmh),
            screen: ScreenManager::new(&config, view_pin),
            clock: CachedClock::new(clock),
            temperature,
            reset_button: Button::latching("reset", reset_pin, config.reset_hold()),
            run_state: RunState::Uninitialized,
        })
    }

    /// Load the persisted trip. Must run before the first [`tick`](Self::tick)
    /// and before the rotation interrupt is enabled.
    pub fn startup(&mut self) -> Option<PersistedTrip> {
        let restored = self.persistence.restore(self.trip);
        self.run_state = RunState::Running;
        info!("Trip computer running, view {:?}", self.screen.current_view());
        restored
    }

    /// One control-loop cycle at `now`.
    ///
    /// Runs the stop timeout, drive/idle accounting, the clock read, the
    /// reset input and write policy, then the screen. Only a display error
    /// is returned; every other collaborator failure degrades and is logged.
    pub fn tick<D>(&mut self, now: Instant, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if self.run_state == RunState::Uninitialized {
            warn!("tick before startup, restoring now");
            self.startup();
        }

        let stop_timeout = self.config.stop_timeout();
        let period_ms = self.config.loop_period_ms;
        let threshold = self.config.drive_threshold_centi_kmh;
        let (stopped, cycle) = self.trip.with(|state| {
            let stopped = motion::check_stopped(state, now, stop_timeout);
            (stopped, metrics::accumulate(state, period_ms, threshold))
        });
        if stopped {
            debug!("No rotation for {} ms, wheel stopped", self.config.stop_timeout_ms);
        }
        debug!("Cycle counted as {:?}", cycle);

        let time = self.clock.now();

        if self.reset_button.poll(now) {
            self.persistence.reset_trip(self.trip, time);
        }
        // Failures are logged by the manager and retried at the next stop.
        self.persistence.tick(self.trip).ok();

        let mut ctx = ViewContext {
            now,
            time,
            trip: self.trip.snapshot(),
            temperature: &mut self.temperature,
        };
        self.screen.tick(&mut ctx, display)?;
        Ok(())
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn config(&self) -> &TripConfig {
        &self.config
    }

    pub fn snapshot(&self) -> TripSnapshot {
        self.trip.snapshot()
    }

    pub fn current_view(&self) -> ViewId {
        self.screen.current_view()
    }

    /// Last wall-clock reading.
    pub fn time(&self) -> TimeOfDay {
        self.clock.last()
    }

    pub fn persist_stats(&self) -> PersistStats {
        self.persistence.stats()
    }

    pub fn storage(&self) -> &S {
        self.persistence.storage()
    }

    pub fn clock_mut(&mut self) -> &mut C {
        self.clock.inner_mut()
    }

    pub fn temperature_mut(&mut self) -> &mut T {
        &mut self.temperature
    }

    pub fn view_pin_mut(&mut self) -> &mut V {
        self.screen.view_pin_mut()
    }

    pub fn reset_pin_mut(&mut self) -> &mut R {
        self.reset_button.pin_mut()
    }

    /// Shut down and hand back the storage, e.g. to boot again from it.
    pub fn into_storage(self) -> S {
        self.persistence.into_storage()
    }
}
