//! Board configuration for the LED controller.
//!
//! Describes both LED outputs (pixel count, zone layout, brightness, wiring quirks) along with
//! the fixed protocol limits shared by the decoder and the zone engine.

use heapless::Vec;

use crate::utils::zones::ZoneDefinition;

/// Number of physical LED outputs.
pub const NUM_PORTS: usize = 2;
/// Port used when a command names a port that does not exist.
pub const DEFAULT_PORT: u8 = 0;
/// Size of the bus receive buffer; every frame is copied into one of these.
pub const RECEIVE_BUF_SIZE: usize = 128;
/// Upper bound on zones per port, and on entries in variable-length commands.
pub const MAX_ZONES: usize = 10;
/// Base 7-bit bus address before the address switches are applied.
pub const BUS_BASE_ADDRESS: u8 = 0b001_0000;

/// Computes the bus target address from the three address-select switches.
pub const fn bus_address(a0: bool, a1: bool, a2: bool) -> u8 {
    BUS_BASE_ADDRESS | ((a2 as u8) << 2) | ((a1 as u8) << 1) | (a0 as u8)
}

/// Configuration of one LED output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortConfig {
    /// Number of pixels attached to the output.
    pub led_count: u16,
    /// Number of even zones to create when `zones` is empty.
    pub zone_count: u16,
    /// Explicit zone layout; takes precedence over `zone_count` when it fits the output.
    pub zones: Vec<ZoneDefinition, MAX_ZONES>,
    /// Brightness applied on every flush (0-255).
    pub brightness: u8,
    /// Whether the output drives a pixel matrix rather than a strip.
    pub is_matrix: bool,
    /// Output is wired with red and green swapped (RGB strip on a GRB driver).
    pub swap_red_green: bool,
}

impl PortConfig {
    /// A strip split into a single zone.
    pub fn strip(led_count: u16, brightness: u8) -> Self {
        Self {
            led_count,
            zone_count: 1,
            zones: Vec::new(),
            brightness,
            is_matrix: false,
            swap_red_green: false,
        }
    }

    /// A `width` x `height` matrix driven as a single zone.
    pub fn matrix(width: u16, height: u16, brightness: u8) -> Self {
        Self {
            is_matrix: true,
            ..Self::strip(width * height, brightness)
        }
    }

    /// Split the output into `count` equal zones.
    #[must_use]
    pub fn with_zone_count(mut self, count: u16) -> Self {
        self.zone_count = count;
        self.zones.clear();
        self
    }

    /// Use an explicit zone layout. Entries beyond [`MAX_ZONES`] are dropped with a warning.
    #[must_use]
    pub fn with_zones(mut self, zones: &[ZoneDefinition]) -> Self {
        self.zones.clear();
        for zone in zones {
            if self.zones.push(*zone).is_err() {
                tracing::warn!(
                    count = zones.len(),
                    "zone layout exceeds {} zones, truncating",
                    MAX_ZONES
                );
                break;
            }
        }
        self
    }

    #[must_use]
    pub fn with_swapped_red_green(mut self, swap: bool) -> Self {
        self.swap_red_green = swap;
        self
    }
}

/// Configuration of the whole board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub ports: [PortConfig; NUM_PORTS],
}

impl Default for BoardConfig {
    /// The reference robot: a 42-pixel strip in five zones on port 0, an 8x8 matrix on port 1.
    fn default() -> Self {
        Self {
            ports: [
                PortConfig::strip(42, 80)
                    .with_zones(&[
                        ZoneDefinition::new(0, 9),
                        ZoneDefinition::new(9, 15),
                        ZoneDefinition::new(24, 8),
                        ZoneDefinition::new(32, 5),
                        ZoneDefinition::new(37, 5),
                    ])
                    .with_swapped_red_green(true),
                PortConfig::matrix(8, 8, 40),
            ],
        }
    }
}
