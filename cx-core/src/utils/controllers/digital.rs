//! General-purpose digital I/O exposed to the central controller.
//!
//! The board brings out three pins (GPIO 2, 3 and 16 on the reference board) addressed as
//! ports 0..=2. Modes use the Arduino numbering the central controller sends.

use embedded_hal::digital::{InputPin, OutputPin};

/// Number of digital ports on the board.
pub const NUM_DIGITAL_PORTS: usize = 3;

/// GPIO numbers behind ports 0, 1 and 2 on the reference board.
pub const DIGITAL_PORT_GPIOS: [u8; NUM_DIGITAL_PORTS] = [2, 3, 16];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PinMode {
    Input = 0,
    Output = 1,
    InputPullUp = 2,
    InputPullDown = 3,
    Output2mA = 4,
    Output4mA = 5,
    Output8mA = 6,
    Output12mA = 7,
}

impl PinMode {
    pub const fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Input,
            1 => Self::Output,
            2 => Self::InputPullUp,
            3 => Self::InputPullDown,
            4 => Self::Output2mA,
            5 => Self::Output4mA,
            6 => Self::Output8mA,
            7 => Self::Output12mA,
            _ => return None,
        })
    }

    pub const fn is_output(self) -> bool {
        matches!(
            self,
            Self::Output | Self::Output2mA | Self::Output4mA | Self::Output8mA | Self::Output12mA
        )
    }
}

/// Errors from the digital port bank.
#[derive(Debug)]
pub enum DigitalError<E: core::fmt::Debug> {
    UnknownPort(u8),
    UnknownMode(u8),
    Pin(E),
}

/// Digital ports as seen by the bus: numbered ports, raw mode bytes, values as 0/1.
pub trait DigitalIo {
    type Error: core::fmt::Debug;

    fn setup(&mut self, port: u8, mode: u8) -> Result<(), Self::Error>;
    fn write(&mut self, port: u8, value: u8) -> Result<(), Self::Error>;
    fn read(&mut self, port: u8) -> Result<u8, Self::Error>;
}

/// The digital port bank over `embedded-hal` pins that can both drive and sense.
pub struct DigitalPorts<P> {
    pins: [P; NUM_DIGITAL_PORTS],
    modes: [PinMode; NUM_DIGITAL_PORTS],
}

impl<P, E> DigitalPorts<P>
where
    P: InputPin<Error = E> + OutputPin<Error = E>,
    E: core::fmt::Debug,
{
    pub fn new(pins: [P; NUM_DIGITAL_PORTS]) -> Self {
        Self {
            pins,
            modes: [PinMode::Input; NUM_DIGITAL_PORTS],
        }
    }

    /// Configure every port as an output driven low, the power-on state of the board.
    pub fn init(&mut self) -> Result<(), DigitalError<E>> {
        for (pin, mode) in self.pins.iter_mut().zip(self.modes.iter_mut()) {
            *mode = PinMode::Output;
            pin.set_low().map_err(DigitalError::Pin)?;
        }
        Ok(())
    }

    pub fn mode(&self, port: u8) -> Option<PinMode> {
        self.modes.get(usize::from(port)).copied()
    }

    fn index(port: u8) -> Result<usize, DigitalError<E>> {
        let index = usize::from(port);
        if index < NUM_DIGITAL_PORTS {
            Ok(index)
        } else {
            Err(DigitalError::UnknownPort(port))
        }
    }
}

impl<P, E> DigitalIo for DigitalPorts<P>
where
    P: InputPin<Error = E> + OutputPin<Error = E>,
    E: core::fmt::Debug,
{
    type Error = DigitalError<E>;

    fn setup(&mut self, port: u8, mode: u8) -> Result<(), Self::Error> {
        let index = Self::index(port)?;
        let mode = PinMode::from_u8(mode).ok_or(DigitalError::UnknownMode(mode))?;

        // pulls and drive strength belong to the pin's HAL; the bank only records the mode
        self.modes[index] = mode;
        tracing::debug!(port, ?mode, output = mode.is_output(), "digital port configured");
        Ok(())
    }

    /// Drive the pin whatever its recorded mode.
    fn write(&mut self, port: u8, value: u8) -> Result<(), Self::Error> {
        let index = Self::index(port)?;
        let pin = &mut self.pins[index];
        if value == 0 {
            pin.set_low().map_err(DigitalError::Pin)
        } else {
            pin.set_high().map_err(DigitalError::Pin)
        }
    }

    fn read(&mut self, port: u8) -> Result<u8, Self::Error> {
        let index = Self::index(port)?;
        let high = self.pins[index].is_high().map_err(DigitalError::Pin)?;
        Ok(u8::from(high))
    }
}
