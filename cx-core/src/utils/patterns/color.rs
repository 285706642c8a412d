//! Packed-color helpers.
//!
//! Colors travel through the engine as `0x00RRGGBB` words and become [`RGB8`] only when written
//! to a strip.

use smart_leds_trait::RGB8;

/// Create an RGB color from a u32 value (0xRRGGBB format)
#[allow(clippy::cast_possible_truncation)]
pub const fn rgb_from_u32(color: u32) -> RGB8 {
    RGB8 {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}

/// Pack an RGB color into a u32 value (0xRRGGBB format)
pub const fn u32_from_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub fn scale8(value: u8, scale: u8) -> u8 {
    ((u16::from(value) * u16::from(scale)) >> 8) as u8
}

/// Scale every channel of a packed color.
#[inline]
pub fn scale_color(color: u32, scale: u8) -> RGB8 {
    let c = rgb_from_u32(color);
    RGB8 {
        r: scale8(c.r, scale),
        g: scale8(c.g, scale),
        b: scale8(c.b, scale),
    }
}

/// Position on a red-green-blue color wheel.
pub const fn wheel(position: u8) -> RGB8 {
    if position < 85 {
        RGB8 {
            r: position * 3,
            g: 255 - position * 3,
            b: 0,
        }
    } else if position < 170 {
        let p = position - 85;
        RGB8 {
            r: 255 - p * 3,
            g: 0,
            b: p * 3,
        }
    } else {
        let p = position - 170;
        RGB8 {
            r: 0,
            g: p * 3,
            b: 255 - p * 3,
        }
    }
}
