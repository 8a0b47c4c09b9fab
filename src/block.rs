//! StampedBlock - checksummed, counted payload for integrity runs
//!
//! A byte block stamped with an incrementing counter and a CRC32 over the
//! payload. The integrity harness pushes these through a shallow queue and
//! rejects any run where the counter is non-linear or the checksum fails.

use serde::{ Deserialize, Serialize };

use crate::checksum::crc32;

/// Byte payload stamped with a counter and a checksum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampedBlock {
    /// Position of this block in the produced stream
    pub counter: u64,
    /// CRC32 over `payload`
    pub checksum: u32,
    /// Payload bytes
    pub payload: Vec<u8>,
}

impl StampedBlock {
    /// Stamp a payload with its counter and checksum
    pub fn stamp(counter: u64, payload: Vec<u8>) -> Self {
        let checksum = crc32(&payload);
        Self {
            counter,
            checksum,
            payload,
        }
    }

    /// Verify the checksum against the payload
    pub fn verify(&self) -> bool {
        crc32(&self.payload) == self.checksum
    }

    /// Verify checksum and counter linearity against the expected counter
    pub fn verify_next(&self, expected_counter: u64) -> bool {
        self.counter == expected_counter && self.verify()
    }
}
