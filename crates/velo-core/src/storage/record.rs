//! Binary frame of a persisted trip record.
//!
//! ```text
//! offset  size  field
//! 0       2     magic "VT"
//! 2       1     format version
//! 3       1     payload length n
//! 4       4     sequence number (LE)
//! 8       n     postcard-encoded PersistedTrip
//! 8+n     4     CRC-32/ISO-HDLC of bytes 0..8+n (LE)
//! ```
//!
//! The CRC covers the header too, so a slot holding the start of a new
//! record and the tail of an old one is rejected as a whole.

use crc::{CRC_32_ISO_HDLC, Crc};
use thiserror_no_std::Error;

use super::PersistedTrip;

/// Bytes reserved for each slot.
pub const SLOT_SIZE: usize = 64;

/// The two alternating slots.
pub const SLOT_ADDRESSES: [u16; 2] = [0x000, 0x040];

const MAGIC: [u8; 2] = *b"VT";
const VERSION: u8 = 1;
const HEADER_SIZE: usize = 8;
const CRC_SIZE: usize = 4;
const MAX_PAYLOAD: usize = SLOT_SIZE - HEADER_SIZE - CRC_SIZE;

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    #[error("slot is erased")]
    Empty,
    #[error("bad magic")]
    BadMagic,
    #[error("unsupported record version {0}")]
    UnsupportedVersion(u8),
    #[error("payload length {0} out of range")]
    BadLength(u8),
    #[error("checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    Checksum { stored: u32, computed: u32 },
    #[error("payload does not fit the slot")]
    Encode,
    #[error("payload is malformed")]
    Decode,
}

/// A decoded slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub sequence: u32,
    pub trip: PersistedTrip,
}

/// Serialize `trip` into a slot image. Returns the number of meaningful bytes.
pub fn encode(
    sequence: u32,
    trip: &PersistedTrip,
    slot: &mut [u8; SLOT_SIZE],
) -> Result<usize, RecordError> {
    slot.fill(0xFF);

    let (header, rest) = slot.split_at_mut(HEADER_SIZE);
    let payload_len = postcard::to_slice(trip, &mut rest[..MAX_PAYLOAD])
        .map_err(|_| RecordError::Encode)?
        .len();

    header[0..2].copy_from_slice(&MAGIC);
    header[2] = VERSION;
    header[3] = payload_len as u8;
    header[4..8].copy_from_slice(&sequence.to_le_bytes());

    let body_len = HEADER_SIZE + payload_len;
    let crc = CRC32.checksum(&slot[..body_len]);
    slot[body_len..body_len + CRC_SIZE].copy_from_slice(&crc.to_le_bytes());

    Ok(body_len + CRC_SIZE)
}

/// Validate and deserialize a slot image.
pub fn decode(slot: &[u8; SLOT_SIZE]) -> Result<Record, RecordError> {
    if slot[..HEADER_SIZE].iter().all(|&b| b == 0xFF) {
        return Err(RecordError::Empty);
    }
    if slot[0..2] != MAGIC {
        return Err(RecordError::BadMagic);
    }
    if slot[2] != VERSION {
        return Err(RecordError::UnsupportedVersion(slot[2]));
    }
    let payload_len = slot[3] as usize;
    if payload_len == 0 || payload_len > MAX_PAYLOAD {
        return Err(RecordError::BadLength(slot[3]));
    }

    let body_len = HEADER_SIZE + payload_len;
    let mut stored = [0u8; CRC_SIZE];
    stored.copy_from_slice(&slot[body_len..body_len + CRC_SIZE]);
    let stored = u32::from_le_bytes(stored);
    let computed = CRC32.checksum(&slot[..body_len]);
    if stored != computed {
        return Err(RecordError::Checksum { stored, computed });
    }

    let mut sequence = [0u8; 4];
    sequence.copy_from_slice(&slot[4..8]);
    let trip = postcard::from_bytes(&slot[HEADER_SIZE..body_len]).map_err(|_| RecordError::Decode)?;

    Ok(Record {
        sequence: u32::from_le_bytes(sequence),
        trip,
    })
}

/// Sequence comparison that survives wrap-around.
pub fn is_newer(candidate: u32, current: u32) -> bool {
    (candidate.wrapping_sub(current) as i32) > 0
}
