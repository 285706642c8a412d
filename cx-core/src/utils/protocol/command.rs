//! Command model.
//!
//! Every bus frame starts with an opcode byte. The opcode selects the variant of [`Command`],
//! and each variant carries exactly the payload of that opcode.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use super::records::{Configuration, Message};
use crate::{config::MAX_ZONES, utils::zones::ZoneDefinition};

/// Opcode byte at offset 0 of every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    On = 0,
    Off = 1,
    Pattern = 2,
    ChangeColor = 3,
    ReadPatternDone = 4,
    SetLedPort = 5,
    DigitalSetup = 7,
    DigitalWrite = 8,
    DigitalRead = 9,
    SetConfig = 10,
    ReadConfig = 11,
    RadioSend = 12,
    RadioGetLatestReceived = 13,
    GetColor = 14,
    GetPort = 15,
    SetPatternZone = 16,
    SetNewZones = 17,
    SyncStates = 18,
}

impl Opcode {
    pub const fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::On,
            1 => Self::Off,
            2 => Self::Pattern,
            3 => Self::ChangeColor,
            4 => Self::ReadPatternDone,
            5 => Self::SetLedPort,
            7 => Self::DigitalSetup,
            8 => Self::DigitalWrite,
            9 => Self::DigitalRead,
            10 => Self::SetConfig,
            11 => Self::ReadConfig,
            12 => Self::RadioSend,
            13 => Self::RadioGetLatestReceived,
            14 => Self::GetColor,
            15 => Self::GetPort,
            16 => Self::SetPatternZone,
            17 => Self::SetNewZones,
            18 => Self::SyncStates,
            _ => return None,
        })
    }

    /// Size in bytes of the fixed payload following the opcode.
    ///
    /// `None` for the variable-length opcodes, whose size depends on their count byte.
    pub const fn payload_size(self) -> Option<usize> {
        Some(match self {
            Self::On
            | Self::Off
            | Self::ReadPatternDone
            | Self::ReadConfig
            | Self::RadioGetLatestReceived
            | Self::GetColor
            | Self::GetPort => 0,
            Self::Pattern => 4,
            Self::ChangeColor => 3,
            Self::SetLedPort | Self::DigitalRead => 1,
            Self::DigitalSetup | Self::DigitalWrite => 2,
            Self::SetPatternZone => 3,
            Self::SetConfig => Configuration::WIRE_SIZE,
            Self::RadioSend => Message::WIRE_SIZE,
            Self::SetNewZones | Self::SyncStates => return None,
        })
    }
}

impl TryFrom<u8> for Opcode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or(value)
    }
}

/// A decoded bus command.
///
/// Serialized as JSON with tag `"ct"` for scripted command playback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "ct", rename_all = "snake_case")]
pub enum Command {
    /// Resume rendering from the start of every zone's pattern.
    On,
    /// Blank every output and stop rendering.
    Off,
    /// Set the pattern of the selected zone. A negative `delay` selects the pattern default.
    Pattern {
        pattern_id: u8,
        one_shot: bool,
        delay: i16,
    },
    /// Set the color of the selected zone.
    ChangeColor { r: u8, g: u8, b: u8 },
    ReadPatternDone,
    /// Select the LED output that subsequent zone commands address.
    SetLedPort { port: u8 },
    DigitalSetup { port: u8, mode: u8 },
    DigitalWrite { port: u8, value: u8 },
    DigitalRead { port: u8 },
    SetConfig { config: Configuration },
    ReadConfig,
    RadioSend { message: Message },
    RadioGetLatestReceived,
    GetColor,
    GetPort,
    /// Select the zone that color and pattern commands target.
    SetPatternZone { zone_index: u16, reversed: bool },
    /// Replace the zone layout of the selected port.
    SetNewZones {
        zones: Vec<ZoneDefinition, MAX_ZONES>,
    },
    /// Restart the listed zones together.
    SyncStates { zone_indexes: Vec<u8, MAX_ZONES> },
    /// Unrecognized opcode; carries no payload and has no effect.
    Unknown { opcode: u8 },
}

impl Command {
    /// The opcode byte this command is framed with.
    pub fn opcode_byte(&self) -> u8 {
        match (self, self.opcode()) {
            (Self::Unknown { opcode }, _) => *opcode,
            (_, Some(opcode)) => opcode as u8,
            (_, None) => u8::MAX,
        }
    }

    pub const fn opcode(&self) -> Option<Opcode> {
        Some(match self {
            Self::On => Opcode::On,
            Self::Off => Opcode::Off,
            Self::Pattern { .. } => Opcode::Pattern,
            Self::ChangeColor { .. } => Opcode::ChangeColor,
            Self::ReadPatternDone => Opcode::ReadPatternDone,
            Self::SetLedPort { .. } => Opcode::SetLedPort,
            Self::DigitalSetup { .. } => Opcode::DigitalSetup,
            Self::DigitalWrite { .. } => Opcode::DigitalWrite,
            Self::DigitalRead { .. } => Opcode::DigitalRead,
            Self::SetConfig { .. } => Opcode::SetConfig,
            Self::ReadConfig => Opcode::ReadConfig,
            Self::RadioSend { .. } => Opcode::RadioSend,
            Self::RadioGetLatestReceived => Opcode::RadioGetLatestReceived,
            Self::GetColor => Opcode::GetColor,
            Self::GetPort => Opcode::GetPort,
            Self::SetPatternZone { .. } => Opcode::SetPatternZone,
            Self::SetNewZones { .. } => Opcode::SetNewZones,
            Self::SyncStates { .. } => Opcode::SyncStates,
            Self::Unknown { .. } => return None,
        })
    }

    /// Whether the command is executed by the render loop rather than on the bus side.
    pub const fn is_queued(&self) -> bool {
        matches!(
            self,
            Self::On
                | Self::Off
                | Self::Pattern { .. }
                | Self::ChangeColor { .. }
                | Self::SetLedPort { .. }
                | Self::SetPatternZone { .. }
                | Self::SetNewZones { .. }
                | Self::SyncStates { .. }
        )
    }
}
