//! Non-volatile persistence of the trip record.
//!
//! The six persisted fields travel together as one [`PersistedTrip`], framed
//! by [`record`] with a sequence number and a CRC, and written alternately to
//! two fixed slots by the [`manager::PersistenceManager`]. A write torn by a
//! power loss fails its CRC on the next boot and the other slot still holds
//! the previous complete record.

pub mod manager;
pub mod record;

mod memory;

pub use manager::{PersistError, PersistStats, PersistenceManager};
pub use memory::MemoryStorage;
pub use record::{RecordError, SLOT_ADDRESSES, SLOT_SIZE};

use core::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::sensors::TimeOfDay;

/// Byte-addressed non-volatile storage (EEPROM, emulated EEPROM, FRAM).
///
/// Implementations own wear leveling and whatever erase cycle the medium
/// needs. A write is not assumed to be atomic.
pub trait NvStorage {
    type Error: Debug;

    fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), Self::Error>;

    fn write(&mut self, address: u16, data: &[u8]) -> Result<(), Self::Error>;
}

/// The persisted part of the trip state.
///
/// `average_centi_kmh` is derivable from the others and is stored for
/// readers of the raw record only; restore recomputes it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistedTrip {
    pub odometer_cm: u32,
    pub trip_cm: u32,
    pub drive_ms: u32,
    pub average_centi_kmh: u32,
    pub idle_ms: u32,
    pub trip_start: TimeOfDay,
}
