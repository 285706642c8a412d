//! Long-range packet radio used to talk to other robots.
//!
//! The radio transport lives outside this crate; the bus only needs to hand it packets and ask
//! for the last one received.

use crate::utils::protocol::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    /// The board was built without a radio.
    Disabled,
}

pub trait PacketRadio {
    type Error: core::fmt::Debug;

    /// Send to the team named in the message.
    fn send(&mut self, message: &Message) -> Result<(), Self::Error>;

    /// Send to every team the radio knows about.
    fn send_to_all(&mut self, message: &Message) -> Result<(), Self::Error>;

    fn last_received(&self) -> Option<Message>;
}

/// Stand-in for boards without a radio. Sends fail and nothing is ever received.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRadio;

impl PacketRadio for NoRadio {
    type Error = RadioError;

    fn send(&mut self, _message: &Message) -> Result<(), Self::Error> {
        Err(RadioError::Disabled)
    }

    fn send_to_all(&mut self, _message: &Message) -> Result<(), Self::Error> {
        Err(RadioError::Disabled)
    }

    fn last_received(&self) -> Option<Message> {
        None
    }
}
