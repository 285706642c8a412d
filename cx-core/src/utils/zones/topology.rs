//! Zone layout of one port.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::config::MAX_ZONES;

/// A half-open pixel range `[offset, offset + count)` of a port's buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneDefinition {
    pub offset: u16,
    pub count: u16,
}

impl ZoneDefinition {
    pub const fn new(offset: u16, count: u16) -> Self {
        Self { offset, count }
    }

    /// One past the last pixel. Computed wide so it never wraps.
    pub const fn end(&self) -> u32 {
        self.offset as u32 + self.count as u32
    }

    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub const fn overlaps(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && (self.offset as u32) < other.end()
            && (other.offset as u32) < self.end()
    }
}

/// Why a zone layout does not fit a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyError {
    /// Two zones share pixels.
    Overlap { first: usize, second: usize },
    /// A zone reaches past the end of the pixel buffer.
    OutOfBounds { index: usize, end: u32, len: u16 },
}

/// Split `led_count` pixels into `zone_count` equal zones.
///
/// A zone count of zero is treated as one and counts above [`MAX_ZONES`] are capped. Pixels left
/// over by the integer division stay outside every zone.
pub fn even_partition(led_count: u16, zone_count: u16) -> Vec<ZoneDefinition, MAX_ZONES> {
    #[allow(clippy::cast_possible_truncation)]
    let zone_count = zone_count.clamp(1, MAX_ZONES as u16);
    let per_zone = led_count / zone_count;

    (0..zone_count)
        .map(|i| ZoneDefinition::new(i * per_zone, per_zone))
        .collect()
}

/// Check that every zone lies inside `len` pixels and that no two zones overlap.
pub fn validate_topology(zones: &[ZoneDefinition], len: u16) -> Result<(), TopologyError> {
    for (index, zone) in zones.iter().enumerate() {
        if zone.end() > u32::from(len) {
            return Err(TopologyError::OutOfBounds {
                index,
                end: zone.end(),
                len,
            });
        }
        if let Some(second) = zones[index + 1..]
            .iter()
            .position(|other| zone.overlaps(other))
        {
            return Err(TopologyError::Overlap {
                first: index,
                second: index + 1 + second,
            });
        }
    }
    Ok(())
}
