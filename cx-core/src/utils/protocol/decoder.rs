//! Frame decoding.
//!
//! Decoding is driven entirely by the opcode at byte 0. Fixed payloads start at byte 1; the
//! variable-length commands carry a count at byte 1 and their entries from byte 2 on.

use heapless::Vec;

use super::{
    command::{Command, Opcode},
    records::{u16_at, Configuration, Message},
};
use crate::{config::MAX_ZONES, utils::zones::ZoneDefinition};

/// Size of one `{offset, count}` entry of a zone layout frame.
const ZONE_ENTRY_SIZE: usize = 4;

/// Reasons a frame could not be turned into a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The frame has no opcode byte.
    Empty,
    /// The frame ends before the payload its opcode requires.
    Truncated {
        opcode: Opcode,
        needed: usize,
        available: usize,
    },
    /// A variable-length command names more entries than a port can hold.
    TooManyEntries { opcode: Opcode, count: usize },
}

/// Decode one bus frame.
///
/// Unknown opcodes decode to [`Command::Unknown`]. Multi-byte fields are little-endian, the
/// native order of both ends of the bus.
pub fn decode(buf: &[u8]) -> Result<Command, DecodeError> {
    let (&raw, payload) = buf.split_first().ok_or(DecodeError::Empty)?;

    let Some(opcode) = Opcode::from_u8(raw) else {
        tracing::debug!(opcode = raw, "unknown opcode");
        return Ok(Command::Unknown { opcode: raw });
    };
    tracing::debug!(?opcode, "decoding command");

    let command = match opcode {
        Opcode::On => Command::On,
        Opcode::Off => Command::Off,
        Opcode::ReadPatternDone => Command::ReadPatternDone,
        Opcode::ReadConfig => Command::ReadConfig,
        Opcode::RadioGetLatestReceived => Command::RadioGetLatestReceived,
        Opcode::GetColor => Command::GetColor,
        Opcode::GetPort => Command::GetPort,
        Opcode::Pattern => {
            let p = fixed(opcode, payload)?;
            Command::Pattern {
                pattern_id: p[0],
                one_shot: p[1] != 0,
                delay: i16::from_le_bytes([p[2], p[3]]),
            }
        }
        Opcode::ChangeColor => {
            let p = fixed(opcode, payload)?;
            Command::ChangeColor {
                r: p[0],
                g: p[1],
                b: p[2],
            }
        }
        Opcode::SetLedPort => Command::SetLedPort {
            port: fixed(opcode, payload)?[0],
        },
        Opcode::DigitalSetup => {
            let p = fixed(opcode, payload)?;
            Command::DigitalSetup {
                port: p[0],
                mode: p[1],
            }
        }
        Opcode::DigitalWrite => {
            let p = fixed(opcode, payload)?;
            Command::DigitalWrite {
                port: p[0],
                value: p[1],
            }
        }
        Opcode::DigitalRead => Command::DigitalRead {
            port: fixed(opcode, payload)?[0],
        },
        Opcode::SetConfig => {
            let p = fixed(opcode, payload)?;
            let mut record = [0; Configuration::WIRE_SIZE];
            record.copy_from_slice(p);
            Command::SetConfig {
                config: Configuration::from_wire(&record),
            }
        }
        Opcode::RadioSend => {
            let p = fixed(opcode, payload)?;
            let mut record = [0; Message::WIRE_SIZE];
            record.copy_from_slice(p);
            Command::RadioSend {
                message: Message::from_wire(&record),
            }
        }
        Opcode::SetPatternZone => {
            let p = fixed(opcode, payload)?;
            Command::SetPatternZone {
                zone_index: u16_at(p, 0),
                reversed: p[2] != 0,
            }
        }
        Opcode::SetNewZones => {
            let entries = counted(opcode, payload, ZONE_ENTRY_SIZE)?;
            let mut zones = Vec::new();
            for entry in entries.chunks_exact(ZONE_ENTRY_SIZE) {
                zones
                    .push(ZoneDefinition::new(u16_at(entry, 0), u16_at(entry, 2)))
                    .map_err(|_| DecodeError::TooManyEntries {
                        opcode,
                        count: entries.len() / ZONE_ENTRY_SIZE,
                    })?;
            }
            Command::SetNewZones { zones }
        }
        Opcode::SyncStates => {
            let entries = counted(opcode, payload, 1)?;
            let mut zone_indexes = Vec::new();
            zone_indexes
                .extend_from_slice(entries)
                .map_err(|()| DecodeError::TooManyEntries {
                    opcode,
                    count: entries.len(),
                })?;
            Command::SyncStates { zone_indexes }
        }
    };

    Ok(command)
}

/// The fixed payload of `opcode`, exactly `payload_size` bytes long.
fn fixed(opcode: Opcode, payload: &[u8]) -> Result<&[u8], DecodeError> {
    let needed = opcode.payload_size().unwrap_or(0);
    payload.get(..needed).ok_or(DecodeError::Truncated {
        opcode,
        needed: needed + 1,
        available: payload.len() + 1,
    })
}

/// The entries of a counted payload: a count byte followed by `count * entry_size` bytes.
///
/// Counts above [`MAX_ZONES`] are rejected rather than clamped.
fn counted(opcode: Opcode, payload: &[u8], entry_size: usize) -> Result<&[u8], DecodeError> {
    let (&count, body) = payload.split_first().ok_or(DecodeError::Truncated {
        opcode,
        needed: 2,
        available: 1,
    })?;
    let count = usize::from(count);

    if count > MAX_ZONES {
        tracing::warn!(?opcode, count, "entry count exceeds {} zones", MAX_ZONES);
        return Err(DecodeError::TooManyEntries { opcode, count });
    }

    let needed = count * entry_size;
    body.get(..needed).ok_or(DecodeError::Truncated {
        opcode,
        needed: needed + 2,
        available: payload.len() + 1,
    })
}
