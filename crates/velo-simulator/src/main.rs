//! Desktop ride simulator for the velo bicycle computer.
//!
//! Drives velo-core through a synthetic ride on a simulated millisecond
//! clock: wheel rotation edges are generated from the ride's speed profile,
//! the control loop ticks every loop period, and the operator inputs are
//! scripted. The display is an `embedded-graphics-simulator` framebuffer,
//! saved as PNG snapshots of both views.
//!
//! After the ride the simulator "loses power" halfway through a storage
//! write and boots a second trip computer from the same storage, showing
//! that the previous complete record is restored.
//!
//! Build with `--features window` to watch the ride in an SDL window.
//!
//! # Script
//!
//! | Time      | Event                                 |
//! |-----------|---------------------------------------|
//! | 0-10 s    | accelerate to 25 km/h                 |
//! | 40 s      | snapshot of the main view             |
//! | 60-65 s   | brake for a traffic light             |
//! | 68-71 s   | reset button held: trip cleared       |
//! | 80-85 s   | accelerate to 20 km/h                 |
//! | 100, 110 s| view button held: summary, then main  |
//! | 140-145 s | brake to a stop                       |
//! | 150 s     | view button held: trip summary        |
//! | 160 s     | snapshot of the trip summary, end     |

use core::convert::Infallible;

use embassy_time::Instant;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettings, OutputSettingsBuilder, SimulatorDisplay};
use embedded_hal::digital::{ErrorType, InputPin};
use log::{error, info, warn};

use velo_core::config::TripConfig;
use velo_core::sensors::{TemperatureSensor, TimeOfDay, WallClock};
use velo_core::storage::record::{self, SLOT_ADDRESSES, SLOT_SIZE};
use velo_core::storage::{MemoryStorage, NvStorage, PersistStats, PersistedTrip};
use velo_core::trip::SharedTrip;
use velo_core::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};
use velo_core::{TripComputer, TripSnapshot};

// ---------------------------------------------------------------------------
// Simulation constants
// ---------------------------------------------------------------------------

/// Pixel scale factor for snapshots and the window.
const SCALE: u32 = 2;

/// Length of the scripted ride.
const RIDE_MS: u64 = 160_000;

/// Ride time is shown this many times faster than real time in the window.
#[cfg(feature = "window")]
const SPEEDUP: u32 = 8;

const RIDE_START: TimeOfDay = TimeOfDay::new(7, 45, 0);

const MAIN_SNAPSHOT_MS: u64 = 40_000;
const MAIN_SNAPSHOT_PATH: &str = "velo-main.png";
const TRIP_SNAPSHOT_PATH: &str = "velo-trip.png";

/// Inclusive hold windows of the view-change button, in ride ms.
const VIEW_HOLDS: [(u64, u64); 3] = [(100_000, 101_000), (110_000, 111_000), (150_000, 151_000)];

/// Inclusive hold window of the trip-reset button, in ride ms.
const RESET_HOLD: (u64, u64) = (68_000, 71_000);

/// Bytes of the interrupted write that reach storage before power is lost.
const TORN_WRITE_BYTES: usize = 14;

static TRIP: SharedTrip = SharedTrip::new(TripConfig::DEFAULT.wheel_circumference_cm);
static REBOOTED_TRIP: SharedTrip = SharedTrip::new(TripConfig::DEFAULT.wheel_circumference_cm);

type SimStorage = MemoryStorage<128>;
type SimComputer<'a> = TripComputer<'a, SimStorage, SimClock, SimThermometer, ScriptedPin, ScriptedPin>;

// ---------------------------------------------------------------------------
// Simulated collaborators
// ---------------------------------------------------------------------------

/// Wall clock advancing with the simulated ride time.
struct SimClock {
    start: TimeOfDay,
    elapsed_ms: u64,
}

impl WallClock for SimClock {
    type Error = Infallible;

    fn now(&mut self) -> Result<TimeOfDay, Infallible> {
        let start_s = self.start.hour as u64 * 3600 + self.start.minute as u64 * 60 + self.start.second as u64;
        let s = (start_s + self.elapsed_ms / 1000) % 86_400;
        Ok(TimeOfDay::new((s / 3600) as u8, ((s / 60) % 60) as u8, (s % 60) as u8))
    }
}

/// Morning air warming up slowly.
struct SimThermometer {
    elapsed_ms: u64,
}

impl TemperatureSensor for SimThermometer {
    type Error = Infallible;

    fn read_celsius(&mut self) -> Result<f32, Infallible> {
        let t = self.elapsed_ms as f64 / 1000.0;
        Ok((14.0 + t / 120.0 + 0.3 * (t / 17.0).sin()) as f32)
    }
}

/// Active-low button whose level is set by the script.
struct ScriptedPin {
    pressed: bool,
}

impl ErrorType for ScriptedPin {
    type Error = Infallible;
}

impl InputPin for ScriptedPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(!self.pressed)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(self.pressed)
    }
}

// ---------------------------------------------------------------------------
// Ride profile
// ---------------------------------------------------------------------------

/// Speed in km/h at ride time `ms`.
fn profile_kmh(ms: u64) -> f64 {
    let t = ms as f64 / 1000.0;
    match t {
        t if t < 10.0 => 2.5 * t,
        t if t < 60.0 => 25.0,
        t if t < 65.0 => 25.0 - 5.0 * (t - 60.0),
        t if t < 80.0 => 0.0,
        t if t < 85.0 => 4.0 * (t - 80.0),
        t if t < 140.0 => 20.0,
        t if t < 145.0 => 20.0 - 4.0 * (t - 140.0),
        _ => 0.0,
    }
}

/// Turns the speed profile into wheel rotation edges.
struct Wheel {
    circumference_cm: f64,
    travelled_cm: f64,
}

impl Wheel {
    fn new(circumference_cm: u32) -> Self {
        Self {
            circumference_cm: circumference_cm as f64,
            travelled_cm: 0.0,
        }
    }

    /// Advance one millisecond; `true` when the magnet passes the sensor.
    fn step(&mut self, ms: u64) -> bool {
        // km/h to cm/ms
        self.travelled_cm += profile_kmh(ms) * 100_000.0 / 3_600_000.0;
        if self.travelled_cm >= self.circumference_cm {
            self.travelled_cm -= self.circumference_cm;
            true
        } else {
            false
        }
    }
}

fn held(window: (u64, u64), ms: u64) -> bool {
    (window.0..=window.1).contains(&ms)
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn output_settings() -> OutputSettings {
    OutputSettingsBuilder::new().scale(SCALE).build()
}

fn save_snapshot(display: &SimulatorDisplay<Rgb565>, path: &str) {
    match display.to_rgb_output_image(&output_settings()).save_png(path) {
        Ok(()) => info!("Saved {}", path),
        Err(e) => error!("Failed to save {}: {}", path, e),
    }
}

fn log_trip(label: &str, trip: &TripSnapshot) {
    info!(
        "{}: odometer {} cm, trip {} cm, drive {} ms, idle {} ms, average {} centi-km/h, started {}",
        label,
        trip.odometer_cm,
        trip.trip_cm,
        trip.drive_ms,
        trip.idle_ms,
        trip.average_centi_kmh,
        trip.trip_start
    );
}

// ---------------------------------------------------------------------------
// Ride
// ---------------------------------------------------------------------------

fn build_computer(trip: &'static SharedTrip, storage: SimStorage) -> Option<SimComputer<'static>> {
    let computer = TripComputer::new(
        TripConfig::DEFAULT,
        trip,
        storage,
        SimClock {
            start: RIDE_START,
            elapsed_ms: 0,
        },
        SimThermometer { elapsed_ms: 0 },
        ScriptedPin { pressed: false },
        ScriptedPin { pressed: false },
    );
    match computer {
        Ok(computer) => Some(computer),
        Err(e) => {
            error!("Invalid configuration: {}", e);
            None
        }
    }
}

/// Ride the script. Returns the storage the trip computer wrote to, its
/// statistics and the final trip.
fn ride(
    mut computer: SimComputer<'static>,
    display: &mut SimulatorDisplay<Rgb565>,
) -> (SimStorage, PersistStats, TripSnapshot) {
    let period_ms = computer.config().loop_period_ms as u64;
    let mut wheel = Wheel::new(TRIP.circumference_cm());

    #[cfg(feature = "window")]
    let mut window = embedded_graphics_simulator::Window::new("Velo Simulator", &output_settings());

    for ms in 0..=RIDE_MS {
        if wheel.step(ms) {
            TRIP.on_rotation(Instant::from_millis(ms));
        }
        if ms % period_ms != 0 {
            continue;
        }

        computer.clock_mut().elapsed_ms = ms;
        computer.temperature_mut().elapsed_ms = ms;
        computer.view_pin_mut().pressed = VIEW_HOLDS.iter().any(|&window| held(window, ms));
        computer.reset_pin_mut().pressed = held(RESET_HOLD, ms);

        let Ok(()) = computer.tick(Instant::from_millis(ms), display);

        if ms % 10_000 == 0 {
            let trip = computer.snapshot();
            info!(
                "t={:>3} s  {}  speed {} centi-km/h  trip {} cm  view {:?}",
                ms / 1000,
                computer.time(),
                trip.speed_centi_kmh,
                trip.trip_cm,
                computer.current_view()
            );
        }
        if ms == MAIN_SNAPSHOT_MS {
            save_snapshot(display, MAIN_SNAPSHOT_PATH);
        }

        #[cfg(feature = "window")]
        {
            window.update(display);
            if window
                .events()
                .any(|event| matches!(event, embedded_graphics_simulator::SimulatorEvent::Quit))
            {
                info!("Window closed, ending ride early");
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(period_ms / SPEEDUP as u64));
        }
    }

    save_snapshot(display, TRIP_SNAPSHOT_PATH);
    let finished = computer.snapshot();
    log_trip("Ride finished", &finished);
    let stats = computer.persist_stats();
    info!(
        "Storage: {} writes, {} failures, newest record in slot {:?} (sequence {})",
        stats.writes, stats.failures, stats.active_slot, stats.sequence
    );
    (computer.into_storage(), stats, finished)
}

// ---------------------------------------------------------------------------
// Power loss
// ---------------------------------------------------------------------------

/// Start writing a newer record over the older slot and stop partway, the
/// way a brown-out would.
fn tear_next_write(storage: &mut SimStorage, stats: PersistStats) {
    let target = match stats.active_slot {
        Some(slot) => 1 - slot,
        None => 0,
    };
    let bogus = PersistedTrip {
        odometer_cm: 123_456_789,
        ..PersistedTrip::default()
    };
    let mut image = [0u8; SLOT_SIZE];
    match record::encode(stats.sequence.wrapping_add(1), &bogus, &mut image) {
        Ok(_) => {
            let Ok(()) = storage.write(SLOT_ADDRESSES[target], &image[..TORN_WRITE_BYTES]);
            warn!(
                "Power lost after {} bytes of the write to slot {}",
                TORN_WRITE_BYTES, target
            );
        }
        Err(e) => error!("Could not build the torn record: {}", e),
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("Starting velo ride simulator");
    info!(
        "Display: {}x{} (scale {}x), ride {} s",
        DISPLAY_WIDTH_PX,
        DISPLAY_HEIGHT_PX,
        SCALE,
        RIDE_MS / 1000
    );

    let mut display = SimulatorDisplay::<Rgb565>::new(Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX));

    let Some(mut computer) = build_computer(&TRIP, SimStorage::new()) else {
        return;
    };
    computer.startup();
    let (mut storage, stats, ridden) = ride(computer, &mut display);

    tear_next_write(&mut storage, stats);

    info!("Rebooting from the same storage");
    let Some(mut rebooted) = build_computer(&REBOOTED_TRIP, storage) else {
        return;
    };
    if rebooted.startup().is_none() {
        error!("Nothing restored after power loss");
    }
    let restored = rebooted.snapshot();
    log_trip("After reboot", &restored);
    if (restored.odometer_cm, restored.trip_cm) == (ridden.odometer_cm, ridden.trip_cm) {
        info!("Last complete record survived the interrupted write");
    } else {
        error!("Restored trip does not match the ride");
    }
    info!("Simulator exiting");
}
