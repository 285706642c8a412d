//! LED output for the Connector X controller.
//!
//! The zone engine writes rendered pixels through a [`PixelSink`]. [`SmartLedSink`] keeps one
//! pixel buffer per port and pushes it to an addressable LED chain via `SmartLedsWrite`.

use alloc::{vec, vec::Vec};

use smart_leds::brightness;
use smart_leds_trait::{SmartLedsWrite, RGB8};

/// Pixel buffers of the LED ports.
///
/// Writes outside a port's buffer, and writes to ports that do not exist, are dropped.
pub trait PixelSink {
    /// Number of pixels on `port`.
    fn len(&self, port: u8) -> usize;

    /// Set pixel `index` of `port` in the buffer. Nothing is shown until [`Self::flush`].
    fn write(&mut self, port: u8, index: usize, color: RGB8);

    /// Set every pixel of `port`.
    fn fill(&mut self, port: u8, color: RGB8) {
        for index in 0..self.len(port) {
            self.write(port, index, color);
        }
    }

    /// Show the buffer of `port` at the given brightness.
    fn flush(&mut self, port: u8, brightness: u8);
}

/// Pixel buffers for two LED chains.
pub struct SmartLedSink<A, B> {
    drivers: (A, B),
    pixels: [Vec<RGB8>; 2],
}

impl<A, B> SmartLedSink<A, B>
where
    A: SmartLedsWrite<Color = RGB8>,
    B: SmartLedsWrite<Color = RGB8>,
    A::Error: core::fmt::Debug,
    B::Error: core::fmt::Debug,
{
    /// Create a sink with `led0` pixels on port 0 and `led1` pixels on port 1, all black.
    pub fn new(port0: A, led0: usize, port1: B, led1: usize) -> Self {
        Self {
            drivers: (port0, port1),
            pixels: [vec![RGB8::default(); led0], vec![RGB8::default(); led1]],
        }
    }

    /// Current buffer contents of `port`, as of the last write.
    pub fn pixels(&self, port: u8) -> &[RGB8] {
        self.pixels
            .get(usize::from(port))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Give the drivers back.
    pub fn release(self) -> (A, B) {
        self.drivers
    }
}

impl<A, B> PixelSink for SmartLedSink<A, B>
where
    A: SmartLedsWrite<Color = RGB8>,
    B: SmartLedsWrite<Color = RGB8>,
    A::Error: core::fmt::Debug,
    B::Error: core::fmt::Debug,
{
    fn len(&self, port: u8) -> usize {
        self.pixels(port).len()
    }

    fn write(&mut self, port: u8, index: usize, color: RGB8) {
        if let Some(pixel) = self
            .pixels
            .get_mut(usize::from(port))
            .and_then(|pixels| pixels.get_mut(index))
        {
            *pixel = color;
        }
    }

    fn flush(&mut self, port: u8, level: u8) {
        match port {
            0 => {
                let frame = brightness(self.pixels[0].iter().copied(), level);
                if let Err(e) = self.drivers.0.write(frame) {
                    tracing::error!(port, "LED write failed: {:?}", e);
                }
            }
            1 => {
                let frame = brightness(self.pixels[1].iter().copied(), level);
                if let Err(e) = self.drivers.1.write(frame) {
                    tracing::error!(port, "LED write failed: {:?}", e);
                }
            }
            _ => tracing::warn!(port, "flush on unknown LED port"),
        }
    }
}
