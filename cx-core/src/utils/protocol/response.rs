//! Replies to bus read requests.
//!
//! A read request answers the last received command: the first byte echoes its opcode and the
//! rest is the fixed-size reply payload. Commands without a reply answer with [`NO_DATA`].

use heapless::Vec;

use super::{
    command::Opcode,
    records::{Configuration, Message},
};

/// Single-byte reply for commands that have nothing to report.
pub const NO_DATA: u8 = 0xFF;

/// Longest reply: opcode plus a radio packet.
pub const MAX_RESPONSE_SIZE: usize = 1 + Message::WIRE_SIZE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Whether the selected zone finished its one-shot pattern.
    PatternDone(bool),
    DigitalRead(u8),
    RadioLastReceived(Message),
    Config(Configuration),
    /// Color of the selected zone, `0x00RRGGBB`.
    Color(u32),
    Port(u8),
    NoData,
}

impl Response {
    pub const fn opcode(&self) -> Option<Opcode> {
        Some(match self {
            Self::PatternDone(_) => Opcode::ReadPatternDone,
            Self::DigitalRead(_) => Opcode::DigitalRead,
            Self::RadioLastReceived(_) => Opcode::RadioGetLatestReceived,
            Self::Config(_) => Opcode::ReadConfig,
            Self::Color(_) => Opcode::GetColor,
            Self::Port(_) => Opcode::GetPort,
            Self::NoData => return None,
        })
    }

    /// The full reply image.
    pub fn to_bytes(&self) -> Vec<u8, MAX_RESPONSE_SIZE> {
        let mut out = Vec::new();
        let Some(opcode) = self.opcode() else {
            let _ = out.push(NO_DATA);
            return out;
        };

        // every payload fits MAX_RESPONSE_SIZE
        let _ = out.push(opcode as u8);
        let _ = match self {
            Self::PatternDone(done) => out.push(u8::from(*done)).map_err(|_| ()),
            Self::DigitalRead(value) | Self::Port(value) => out.push(*value).map_err(|_| ()),
            Self::RadioLastReceived(message) => out.extend_from_slice(&message.to_wire()),
            Self::Config(config) => out.extend_from_slice(&config.to_wire()),
            Self::Color(color) => out.extend_from_slice(&color.to_le_bytes()),
            Self::NoData => Ok(()),
        };
        out
    }

    /// Write the reply into the bus transmit buffer, returning the number of bytes written.
    pub fn write_to(&self, out: &mut [u8]) -> usize {
        let bytes = self.to_bytes();
        let len = bytes.len().min(out.len());
        out[..len].copy_from_slice(&bytes[..len]);
        len
    }
}
