//! Peripheral-bus protocol.
//!
//! - `command`: the [`Command`] model and its [`Opcode`] tags
//! - `records`: fixed-size host-native records carried inside commands and responses
//! - `decoder`: bytes to [`Command`]
//! - `encoder`: [`Command`] to bytes, as the central controller sends them
//! - `response`: replies written back on a bus read request

pub mod command;
pub mod decoder;
pub mod encoder;
pub mod records;
pub mod response;

pub use command::{Command, Opcode};
pub use decoder::{decode, DecodeError};
pub use encoder::Frame;
pub use records::{Configuration, LedConfiguration, Message};
pub use response::Response;
