//! Fixed-size records exchanged verbatim with the central controller.
//!
//! Both sides lay these out as C structs on little-endian targets, so the wire image is the
//! in-memory image of the sender, padding included. Fields are read and written at their
//! explicit offsets; padding is written as zero and ignored on read.

use heapless::Vec;
use serde::{Deserialize, Serialize};

/// Team number addressing every radio on the network.
pub const BROADCAST_TEAM: u16 = 0xFFFF;
/// Capacity of a radio packet payload.
pub const MESSAGE_DATA_LEN: usize = 61;

#[inline]
pub(crate) fn u16_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

#[inline]
pub(crate) fn put_u16(bytes: &mut [u8], offset: usize, value: u16) {
    bytes[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// Stored settings of one LED output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedConfiguration {
    pub count: u16,
    pub brightness: u8,
}

/// Controller settings as persisted by the configuration store.
///
/// Layout: `valid@0 team_number@2 initial_teams@4 led0{count@8 brightness@10}
/// led1{count@12 brightness@14}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Set to 1 once the record has been written by the store.
    pub valid: u8,
    pub team_number: u16,
    /// Teams that radio messages are sent to by default.
    pub initial_teams: [u16; 2],
    pub led0: LedConfiguration,
    pub led1: LedConfiguration,
}

impl Configuration {
    pub const WIRE_SIZE: usize = 16;

    pub fn from_wire(bytes: &[u8; Self::WIRE_SIZE]) -> Self {
        Self {
            valid: bytes[0],
            team_number: u16_at(bytes, 2),
            initial_teams: [u16_at(bytes, 4), u16_at(bytes, 6)],
            led0: LedConfiguration {
                count: u16_at(bytes, 8),
                brightness: bytes[10],
            },
            led1: LedConfiguration {
                count: u16_at(bytes, 12),
                brightness: bytes[14],
            },
        }
    }

    pub fn to_wire(&self) -> [u8; Self::WIRE_SIZE] {
        let mut bytes = [0; Self::WIRE_SIZE];
        bytes[0] = self.valid;
        put_u16(&mut bytes, 2, self.team_number);
        put_u16(&mut bytes, 4, self.initial_teams[0]);
        put_u16(&mut bytes, 6, self.initial_teams[1]);
        put_u16(&mut bytes, 8, self.led0.count);
        bytes[10] = self.led0.brightness;
        put_u16(&mut bytes, 12, self.led1.count);
        bytes[14] = self.led1.brightness;
        bytes
    }
}

/// A radio packet.
///
/// Layout: `data[61]@0 len@61 team_number@62`. Only the first `len` data bytes are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub data: Vec<u8, MESSAGE_DATA_LEN>,
    /// Destination (when sending) or origin (when received); [`BROADCAST_TEAM`] for everyone.
    pub team_number: u16,
}

impl Message {
    pub const MAX_DATA_LEN: usize = MESSAGE_DATA_LEN;
    pub const WIRE_SIZE: usize = 64;

    pub fn new(team_number: u16, data: &[u8]) -> Self {
        let len = data.len().min(Self::MAX_DATA_LEN);
        let mut payload = Vec::new();
        // len is clamped to the capacity above
        let _ = payload.extend_from_slice(&data[..len]);
        Self {
            data: payload,
            team_number,
        }
    }

    pub fn is_broadcast(&self) -> bool {
        self.team_number == BROADCAST_TEAM
    }

    pub fn from_wire(bytes: &[u8; Self::WIRE_SIZE]) -> Self {
        let len = usize::from(bytes[Self::MAX_DATA_LEN]);
        Self::new(u16_at(bytes, 62), &bytes[..len.min(Self::MAX_DATA_LEN)])
    }

    pub fn to_wire(&self) -> [u8; Self::WIRE_SIZE] {
        let mut bytes = [0; Self::WIRE_SIZE];
        bytes[..self.data.len()].copy_from_slice(&self.data);
        bytes[Self::MAX_DATA_LEN] = u8::try_from(self.data.len()).unwrap_or(u8::MAX);
        put_u16(&mut bytes, 62, self.team_number);
        bytes
    }
}
