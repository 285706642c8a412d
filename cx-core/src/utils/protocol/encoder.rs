//! Frame encoding, the central controller's side of [`super::decode`].

use heapless::Vec;

use super::command::Command;
use crate::config::RECEIVE_BUF_SIZE;

/// One encoded bus frame. Never longer than the receive buffer.
pub type Frame = Vec<u8, RECEIVE_BUF_SIZE>;

impl Command {
    /// Encode the command exactly as [`super::decode`] expects to read it.
    pub fn encode(&self) -> Frame {
        let mut frame = Frame::new();
        put(&mut frame, &[self.opcode_byte()]);

        match self {
            Self::On
            | Self::Off
            | Self::ReadPatternDone
            | Self::ReadConfig
            | Self::RadioGetLatestReceived
            | Self::GetColor
            | Self::GetPort
            | Self::Unknown { .. } => {}
            Self::Pattern {
                pattern_id,
                one_shot,
                delay,
            } => {
                put(&mut frame, &[*pattern_id, u8::from(*one_shot)]);
                put(&mut frame, &delay.to_le_bytes());
            }
            Self::ChangeColor { r, g, b } => put(&mut frame, &[*r, *g, *b]),
            Self::SetLedPort { port } | Self::DigitalRead { port } => put(&mut frame, &[*port]),
            Self::DigitalSetup { port, mode } => put(&mut frame, &[*port, *mode]),
            Self::DigitalWrite { port, value } => put(&mut frame, &[*port, *value]),
            Self::SetConfig { config } => put(&mut frame, &config.to_wire()),
            Self::RadioSend { message } => put(&mut frame, &message.to_wire()),
            Self::SetPatternZone {
                zone_index,
                reversed,
            } => {
                put(&mut frame, &zone_index.to_le_bytes());
                put(&mut frame, &[u8::from(*reversed)]);
            }
            Self::SetNewZones { zones } => {
                put(&mut frame, &[entry_count(zones.len())]);
                for zone in zones {
                    put(&mut frame, &zone.offset.to_le_bytes());
                    put(&mut frame, &zone.count.to_le_bytes());
                }
            }
            Self::SyncStates { zone_indexes } => {
                put(&mut frame, &[entry_count(zone_indexes.len())]);
                put(&mut frame, zone_indexes);
            }
        }

        frame
    }
}

fn entry_count(len: usize) -> u8 {
    u8::try_from(len).unwrap_or(u8::MAX)
}

// The largest command (a radio packet) is 65 bytes, well inside the frame capacity.
fn put(frame: &mut Frame, bytes: &[u8]) {
    let _ = frame.extend_from_slice(bytes);
}
