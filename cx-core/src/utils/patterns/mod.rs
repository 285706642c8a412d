//! The pattern library.
//!
//! Patterns are a closed set: each [`PatternType`] has one entry in [`PATTERNS`] carrying its
//! state count, its default frame delay and a pure render function. Ids past the table (the
//! bitmap-backed matrix patterns) are not available on this controller.

pub mod animation;
pub mod color;

use smart_leds_trait::RGB8;

pub use color::{rgb_from_u32, u32_from_rgb};

/// Paints a zone-sized strip for one state. Returns whether the strip should be shown.
pub type RenderFn = fn(strip: &mut [RGB8], color: u32, state: u16) -> bool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PatternType {
    None = 0,
    SetAll = 1,
    Blink = 2,
    RgbFade = 3,
    HackerMode = 4,
    Breathing = 5,
    SineRoll = 6,
    Chase = 7,
}

impl PatternType {
    pub const fn from_u8(id: u8) -> Option<Self> {
        Some(match id {
            0 => Self::None,
            1 => Self::SetAll,
            2 => Self::Blink,
            3 => Self::RgbFade,
            4 => Self::HackerMode,
            5 => Self::Breathing,
            6 => Self::SineRoll,
            7 => Self::Chase,
            _ => return None,
        })
    }
}

/// How the number of states of a pattern is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternStateMode {
    /// Exactly `num_states` states.
    Constant,
    /// `num_states` plus the length of the zone the pattern runs on.
    LedCount,
}

#[derive(Clone, Copy)]
pub struct Pattern {
    pub kind: PatternType,
    pub mode: PatternStateMode,
    pub num_states: u16,
    pub default_delay_ms: u16,
    render: RenderFn,
}

impl Pattern {
    const fn new(
        kind: PatternType,
        mode: PatternStateMode,
        num_states: u16,
        default_delay_ms: u16,
        render: RenderFn,
    ) -> Self {
        Self {
            kind,
            mode,
            num_states,
            default_delay_ms,
            render,
        }
    }

    /// First state past the end of the animation on a zone of `zone_len` pixels.
    pub fn state_ceiling(&self, zone_len: u16) -> u32 {
        match self.mode {
            PatternStateMode::Constant => u32::from(self.num_states),
            PatternStateMode::LedCount => u32::from(self.num_states) + u32::from(zone_len),
        }
    }

    pub fn render(&self, strip: &mut [RGB8], color: u32, state: u16) -> bool {
        (self.render)(strip, color, state)
    }
}

impl core::fmt::Debug for Pattern {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pattern")
            .field("kind", &self.kind)
            .field("mode", &self.mode)
            .field("num_states", &self.num_states)
            .field("default_delay_ms", &self.default_delay_ms)
            .finish_non_exhaustive()
    }
}

/// Every pattern, indexed by id.
pub static PATTERNS: [Pattern; 8] = {
    use animation::*;
    use PatternStateMode::{Constant, LedCount};

    [
        Pattern::new(PatternType::None, Constant, 0, 0, none),
        Pattern::new(PatternType::SetAll, Constant, 1, 500, set_all),
        Pattern::new(PatternType::Blink, Constant, 2, 400, blink),
        Pattern::new(PatternType::RgbFade, Constant, 256, 10, rgb_fade),
        Pattern::new(PatternType::HackerMode, Constant, 2, 100, hacker_mode),
        Pattern::new(PatternType::Breathing, Constant, 512, 5, breathing),
        Pattern::new(PatternType::SineRoll, Constant, SINE_ROLL_STATES, 5, sine_roll),
        Pattern::new(PatternType::Chase, LedCount, CHASE_WIDTH, 20, chase),
    ]
};

/// Look up a pattern by its wire id.
pub fn pattern(id: u8) -> Option<&'static Pattern> {
    PATTERNS.get(usize::from(id))
}
