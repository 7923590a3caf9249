use log::{debug, error, info, warn};
use thiserror_no_std::Error;

use super::record::{self, Record, RecordError, SLOT_ADDRESSES, SLOT_SIZE};
use super::{NvStorage, PersistedTrip};
use crate::sensors::TimeOfDay;
use crate::trip::SharedTrip;

#[derive(Error, Debug)]
pub enum PersistError<E> {
    #[error("storage read failed: {0:?}")]
    Read(E),
    #[error("storage write failed: {0:?}")]
    Write(E),
    #[error("record error: {0}")]
    Record(#[from] RecordError),
}

/// Counters kept by the [`PersistenceManager`] since startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistStats {
    pub writes: u32,
    pub failures: u32,
    /// Slot holding the newest complete record, if any.
    pub active_slot: Option<usize>,
    /// Sequence number of the newest complete record.
    pub sequence: u32,
}

/// Write-when-stopped persistence of the trip record.
///
/// Each cycle the manager marks the trip dirty while the wheel turns (every
/// accepted rotation edge marks it too) and,
/// once the speed is back to zero, writes the six persisted fields as one
/// record into the slot not holding the newest record. The record is never
/// written while the bicycle moves.
pub struct PersistenceManager<S> {
    storage: S,
    guard_centi_kmh: u32,
    /// Newest sequence on storage; the next write uses its successor.
    sequence: u32,
    next_slot: usize,
    stats: PersistStats,
    above_guard: bool,
}

impl<S: NvStorage> PersistenceManager<S> {
    pub fn new(storage: S, guard_centi_kmh: u32) -> Self {
        Self {
            storage,
            guard_centi_kmh,
            sequence: 0,
            next_slot: 0,
            stats: PersistStats::default(),
            above_guard: false,
        }
    }

    /// Load the newest valid record into `trip`.
    ///
    /// Runs once at startup before anything else touches the trip. When
    /// neither slot holds a valid record, or storage cannot be read, the
    /// trip starts from zero. Returns the restored record.
    pub fn restore(&mut self, trip: &SharedTrip) -> Option<PersistedTrip> {
        let mut newest: Option<(usize, Record)> = None;

        for (slot, _) in SLOT_ADDRESSES.iter().enumerate() {
            match self.read_slot(slot) {
                Ok(found) => {
                    debug!("Slot {} holds sequence {}", slot, found.sequence);
                    let replaces = match &newest {
                        Some((_, current)) => record::is_newer(found.sequence, current.sequence),
                        None => true,
                    };
                    if replaces {
                        newest = Some((slot, found));
                    }
                }
                Err(PersistError::Record(RecordError::Empty)) => {
                    debug!("Slot {} is empty", slot);
                }
                Err(e) => warn!("Slot {} rejected: {}", slot, e),
            }
        }

        match newest {
            Some((slot, found)) => {
                trip.with(|state| state.restore(&found.trip));
                self.sequence = found.sequence;
                self.next_slot = 1 - slot;
                self.stats.active_slot = Some(slot);
                self.stats.sequence = found.sequence;
                info!(
                    "Restored trip from slot {} (sequence {}): odometer {} cm, trip {} cm",
                    slot, found.sequence, found.trip.odometer_cm, found.trip.trip_cm
                );
                Some(found.trip)
            }
            None => {
                info!("No persisted trip found, starting from zero");
                None
            }
        }
    }

    /// Zero the trip as one unit, stamped with `now`.
    ///
    /// The zeroed trip becomes dirty and is written at the next stop.
    pub fn reset_trip(&mut self, trip: &SharedTrip, now: TimeOfDay) {
        trip.with(|state| state.reset_trip(now));
        info!("Trip reset at {}", now);
    }

    /// One control-loop cycle of the write policy.
    ///
    /// Returns `Ok(true)` when a record was written. A failed write leaves
    /// the trip dirty so the next stopped cycle tries again.
    pub fn tick(&mut self, trip: &SharedTrip) -> Result<bool, PersistError<S::Error>> {
        let (speed, dirty, snapshot) = trip.with(|state| {
            if state.speed_centi_kmh > 0 {
                state.dirty = true;
            }
            (state.speed_centi_kmh, state.dirty, state.persisted())
        });

        if speed > self.guard_centi_kmh {
            if !self.above_guard {
                debug!("Moving at {} centi-km/h, persisted trip is stale", speed);
                self.above_guard = true;
            }
        } else if speed == 0 {
            self.above_guard = false;
        }

        if speed != 0 || !dirty {
            return Ok(false);
        }

        if let Err(e) = self.write(&snapshot) {
            self.stats.failures = self.stats.failures.wrapping_add(1);
            error!("Failed to persist trip: {}", e);
            return Err(e);
        }

        // A rotation may have landed while the write was in flight.
        let clean = trip.with(|state| {
            if state.persisted() == snapshot {
                state.dirty = false;
            }
            !state.dirty
        });
        if !clean {
            debug!("Trip changed during write, staying dirty");
        }
        Ok(true)
    }

    pub fn stats(&self) -> PersistStats {
        self.stats
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn read_slot(&mut self, slot: usize) -> Result<Record, PersistError<S::Error>> {
        let mut image = [0u8; SLOT_SIZE];
        self.storage
            .read(SLOT_ADDRESSES[slot], &mut image)
            .map_err(PersistError::Read)?;
        Ok(record::decode(&image)?)
    }

    fn write(&mut self, trip: &PersistedTrip) -> Result<(), PersistError<S::Error>> {
        let sequence = self.sequence.wrapping_add(1);
        let slot = self.next_slot;

        let mut image = [0u8; SLOT_SIZE];
        let len = record::encode(sequence, trip, &mut image)?;
        self.storage
            .write(SLOT_ADDRESSES[slot], &image[..len])
            .map_err(PersistError::Write)?;

        self.sequence = sequence;
        self.next_slot = 1 - slot;
        self.stats.writes = self.stats.writes.wrapping_add(1);
        self.stats.active_slot = Some(slot);
        self.stats.sequence = sequence;
        info!(
            "Persisted trip to slot {} (sequence {}): odometer {} cm, trip {} cm",
            slot, sequence, trip.odometer_cm, trip.trip_cm
        );
        Ok(())
    }
}
