//! Peripheral-bus target.
//!
//! The central controller writes a command frame, then optionally issues a read request whose
//! reply answers that last frame. Both handlers run in the bus interrupt context: commands that
//! touch the LEDs are queued for the render loop, everything else is served right here.

use super::{radio::PacketRadio, store::ConfigStore};
use crate::{
    config::RECEIVE_BUF_SIZE,
    utils::{
        controllers::digital::DigitalIo,
        protocol::{decode, Command, Configuration, Response},
        queue::CommandQueue,
    },
};

pub struct BusTarget<'q, D, C, R> {
    queue: &'q CommandQueue,
    digital: D,
    config: C,
    radio: R,
    rx: [u8; RECEIVE_BUF_SIZE],
    /// Last command served on the bus side; read requests answer it.
    latched: Option<Command>,
}

impl<'q, D, C, R> BusTarget<'q, D, C, R>
where
    D: DigitalIo,
    C: ConfigStore,
    R: PacketRadio,
{
    pub fn new(queue: &'q CommandQueue, digital: D, config: C, radio: R) -> Self {
        Self {
            queue,
            digital,
            config,
            radio,
            rx: [0; RECEIVE_BUF_SIZE],
            latched: None,
        }
    }

    /// Handle a frame written by the central controller.
    ///
    /// The frame is copied into the zero-filled receive buffer, so short frames read zeros past
    /// their end and frames longer than the buffer are cut off.
    pub fn on_receive(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            tracing::debug!("empty bus write");
            return;
        }

        let len = bytes.len().min(RECEIVE_BUF_SIZE);
        self.rx.fill(0);
        self.rx[..len].copy_from_slice(&bytes[..len]);

        let command = match decode(&self.rx) {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!(?e, "dropping malformed frame");
                self.latched = None;
                return;
            }
        };

        if command.is_queued() {
            self.latched = None;
            let pending = self.queue.push(command);
            tracing::debug!(pending, "command queued");
            return;
        }

        self.execute(&command);
        self.latched = Some(command);
    }

    /// Handle a read request, writing the reply into `out`. Returns the reply length.
    pub fn on_request(&mut self, out: &mut [u8]) -> usize {
        self.response().write_to(out)
    }

    /// The reply to the latched command.
    pub fn response(&mut self) -> Response {
        let status = self.queue.status();

        match &self.latched {
            Some(Command::ReadPatternDone) => Response::PatternDone(status.pattern_done),
            Some(Command::DigitalRead { port }) => match self.digital.read(*port) {
                Ok(value) => Response::DigitalRead(value),
                Err(e) => {
                    tracing::warn!(port, ?e, "digital read failed");
                    Response::NoData
                }
            },
            Some(Command::RadioGetLatestReceived) => {
                Response::RadioLastReceived(self.radio.last_received().unwrap_or_default())
            }
            Some(Command::ReadConfig) => Response::Config(self.config.load().unwrap_or_else(|e| {
                tracing::warn!(?e, "no stored configuration");
                Configuration::default()
            })),
            Some(Command::GetColor) => Response::Color(status.color),
            Some(Command::GetPort) => Response::Port(status.port),
            _ => Response::NoData,
        }
    }

    fn execute(&mut self, command: &Command) {
        match command {
            Command::DigitalSetup { port, mode } => {
                if let Err(e) = self.digital.setup(*port, *mode) {
                    tracing::warn!(port, mode, ?e, "digital setup failed");
                }
            }
            Command::DigitalWrite { port, value } => {
                if let Err(e) = self.digital.write(*port, *value) {
                    tracing::warn!(port, value, ?e, "digital write failed");
                }
            }
            Command::SetConfig { config } => {
                if let Err(e) = self.config.store(*config) {
                    tracing::error!(?e, "failed to store configuration");
                }
            }
            Command::RadioSend { message } => {
                let sent = if message.is_broadcast() {
                    self.radio.send_to_all(message)
                } else {
                    self.radio.send(message)
                };
                if let Err(e) = sent {
                    tracing::warn!(team = message.team_number, ?e, "radio send failed");
                }
            }
            Command::Unknown { opcode } => tracing::debug!(opcode, "ignoring unknown opcode"),
            _ => {}
        }
    }

    pub fn digital(&self) -> &D {
        &self.digital
    }

    pub fn digital_mut(&mut self) -> &mut D {
        &mut self.digital
    }

    pub fn config_store(&self) -> &C {
        &self.config
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }
}
