//! Render functions, one per [`super::PatternType`].
//!
//! Every function paints a zone-sized strip from `(color, state)` alone and returns whether the
//! strip changed. They keep no state between calls.

use smart_leds_trait::RGB8;

use super::color::{rgb_from_u32, scale_color, wheel};

/// Number of states in one full sine-roll period.
pub const SINE_ROLL_STATES: u16 = 100;
/// Pixels per half wave of the sine roll.
pub const SINE_ROLL_WIDTH: f32 = 8.0;
/// Lit pixels in the chase window.
pub const CHASE_WIDTH: u16 = 5;

const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

pub fn none(_strip: &mut [RGB8], _color: u32, _state: u16) -> bool {
    false
}

pub fn set_all(strip: &mut [RGB8], color: u32, _state: u16) -> bool {
    strip.fill(rgb_from_u32(color));
    true
}

pub fn blink(strip: &mut [RGB8], color: u32, state: u16) -> bool {
    match state {
        0 => set_all(strip, color, 0),
        1 => {
            strip.fill(BLACK);
            true
        }
        _ => false,
    }
}

#[allow(clippy::cast_possible_truncation)]
pub fn rgb_fade(strip: &mut [RGB8], _color: u32, state: u16) -> bool {
    let len = strip.len();
    for (i, pixel) in strip.iter_mut().enumerate() {
        let position = (i * 256 / len + usize::from(state)) & 0xFF;
        *pixel = wheel(position as u8);
    }
    true
}

pub fn hacker_mode(strip: &mut [RGB8], _color: u32, state: u16) -> bool {
    let fill = match state {
        0 => RGB8 { r: 0, g: 200, b: 0 },
        1 => RGB8 { r: 5, g: 100, b: 5 },
        _ => return false,
    };
    strip.fill(fill);
    true
}

#[allow(clippy::cast_possible_truncation)]
pub fn breathing(strip: &mut [RGB8], color: u32, state: u16) -> bool {
    // ramps up over the first 256 states and back down over the next 256
    let level = if state > 255 {
        511u16.saturating_sub(state)
    } else {
        state
    };
    strip.fill(scale_color(color, (level & 0xFF) as u8));
    true
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn sine_roll(strip: &mut [RGB8], color: u32, state: u16) -> bool {
    use core::f32::consts::PI;

    let states = f32::from(SINE_ROLL_STATES);
    let phase = (2.0 * PI / states) * (states - f32::from(state));
    for (index, pixel) in strip.iter_mut().enumerate() {
        let offset = (1.0 / SINE_ROLL_WIDTH) * PI * index as f32;
        let level = libm::sinf(offset + phase) + 1.0;
        // float to int casts saturate, so the wave bottoms out at 0
        *pixel = scale_color(color, (255.0 * (level / 2.0)) as u8);
    }
    true
}

/// A [`CHASE_WIDTH`] window entering from the start of the strip and walking off its end.
///
/// Pixel `i` is lit while `state - CHASE_WIDTH <= i < state`; everything else is left dark.
pub fn chase(strip: &mut [RGB8], color: u32, state: u16) -> bool {
    let color = rgb_from_u32(color);
    let first = usize::from(state.saturating_sub(CHASE_WIDTH));
    let last = usize::from(state).min(strip.len());
    if first < last {
        strip[first..last].fill(color);
    }
    true
}
