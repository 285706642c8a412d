#![allow(dead_code)]

use std::{cell::RefCell, convert::Infallible, rc::Rc};

use cx_core::utils::controllers::leds::PixelSink;
use smart_leds_trait::{SmartLedsWrite, RGB8};

pub const RED: u32 = 0xFF_00_00;
pub const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

pub const fn rgb(r: u8, g: u8, b: u8) -> RGB8 {
    RGB8 { r, g, b }
}

/// Pixel sink that keeps plain buffers and counts flushes per port.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    pub pixels: [Vec<RGB8>; 2],
    pub flushes: [usize; 2],
    pub dropped: usize,
}

impl RecordingSink {
    pub fn new(led0: usize, led1: usize) -> Self {
        Self {
            pixels: [vec![BLACK; led0], vec![BLACK; led1]],
            flushes: [0; 2],
            dropped: 0,
        }
    }

    pub fn port(&self, port: u8) -> &[RGB8] {
        &self.pixels[usize::from(port)]
    }
}

impl PixelSink for RecordingSink {
    fn len(&self, port: u8) -> usize {
        self.pixels.get(usize::from(port)).map_or(0, Vec::len)
    }

    fn write(&mut self, port: u8, index: usize, color: RGB8) {
        match self
            .pixels
            .get_mut(usize::from(port))
            .and_then(|p| p.get_mut(index))
        {
            Some(pixel) => *pixel = color,
            None => self.dropped += 1,
        }
    }

    fn flush(&mut self, port: u8, _brightness: u8) {
        if let Some(count) = self.flushes.get_mut(usize::from(port)) {
            *count += 1;
        }
    }
}

/// LED chain that records every frame written to it.
#[derive(Debug, Clone, Default)]
pub struct VecDriver {
    pub frames: Rc<RefCell<Vec<Vec<RGB8>>>>,
}

impl VecDriver {
    pub fn last_frame(&self) -> Option<Vec<RGB8>> {
        self.frames.borrow().last().cloned()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.borrow().len()
    }
}

impl SmartLedsWrite for VecDriver {
    type Error = Infallible;
    type Color = RGB8;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        let frame = iterator.into_iter().map(Into::into).collect();
        self.frames.borrow_mut().push(frame);
        Ok(())
    }
}
