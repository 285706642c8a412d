//! Per-zone pattern scheduling.
//!
//! A [`PatternZone`] owns the zone layout of one port and one [`RunZone`] per zone. Every call
//! to [`PatternZone::update_zones`] advances the zones whose delay has elapsed, renders them into
//! a scratch strip and copies the result into the port's pixel buffer through a [`PixelSink`].

use alloc::vec::Vec as AllocVec;

use heapless::Vec;
use smart_leds_trait::RGB8;

use super::topology::{even_partition, ZoneDefinition};
use crate::{
    config::MAX_ZONES,
    utils::{
        controllers::leds::PixelSink,
        patterns::{pattern, Pattern},
    },
};

/// Playback state of one zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunZone {
    /// Copy the rendered strip into the zone back to front.
    pub reversed: bool,
    pub state: u16,
    /// `0x00RRGGBB`
    pub color: u32,
    pub pattern_id: u8,
    /// `None` until the zone renders for the first time after a reset.
    pub last_update_ms: Option<u32>,
    pub delay: u16,
    pub one_shot: bool,
    pub done_running: bool,
}

impl RunZone {
    /// Start the pattern over from its first state.
    pub fn reset(&mut self) {
        self.state = 0;
        self.last_update_ms = None;
        self.done_running = false;
    }

    /// Whether the delay has elapsed at `now_ms` and the zone may still run.
    pub fn should_update(&self, now_ms: u32) -> bool {
        let elapsed = match self.last_update_ms {
            Some(last) => now_ms.wrapping_sub(last) >= u32::from(self.delay),
            None => true,
        };
        elapsed && !self.is_done()
    }

    /// A one-shot pattern that reached its last state.
    pub fn is_done(&self) -> bool {
        self.one_shot && self.done_running
    }
}

/// The zones of one LED port and their playback state.
#[derive(Debug)]
pub struct PatternZone {
    port: u8,
    brightness: u8,
    zones: Vec<ZoneDefinition, MAX_ZONES>,
    run_zones: Vec<RunZone, MAX_ZONES>,
    current: usize,
    scratch: AllocVec<RGB8>,
}

impl PatternZone {
    /// Evenly split `led_count` pixels into `zone_count` zones.
    pub fn new(port: u8, brightness: u8, led_count: u16, zone_count: u16) -> Self {
        Self::from_definitions(port, brightness, &even_partition(led_count, zone_count))
    }

    pub fn from_definitions(port: u8, brightness: u8, zones: &[ZoneDefinition]) -> Self {
        let mut this = Self {
            port,
            brightness,
            zones: Vec::new(),
            run_zones: Vec::new(),
            current: 0,
            scratch: AllocVec::new(),
        };
        this.set_zones(zones);
        this
    }

    /// Replace the zone layout. Every zone starts over with fresh playback state and zone 0
    /// becomes the selected zone.
    pub fn set_zones(&mut self, zones: &[ZoneDefinition]) {
        if zones.len() > MAX_ZONES {
            tracing::warn!(
                port = self.port,
                count = zones.len(),
                "zone layout exceeds {} zones, truncating",
                MAX_ZONES
            );
        }

        self.zones.clear();
        self.run_zones.clear();
        for zone in zones.iter().take(MAX_ZONES) {
            // both vectors hold MAX_ZONES entries
            let _ = self.zones.push(*zone);
            let _ = self.run_zones.push(RunZone::default());
        }
        self.current = 0;

        tracing::info!(port = self.port, zones = self.zones.len(), "zone layout replaced");
    }

    /// Select the zone that pattern and color changes apply to.
    pub fn set_run_zone(&mut self, index: u16, reversed: bool) -> bool {
        let index = usize::from(index);
        let Some(run) = self.run_zones.get_mut(index) else {
            tracing::warn!(port = self.port, index, "no such zone");
            return false;
        };

        run.reversed = reversed;
        self.current = index;
        true
    }

    /// Start `pattern_id` on the selected zone and render its first state right away.
    pub fn set_pattern<S: PixelSink + ?Sized>(
        &mut self,
        pattern_id: u8,
        delay: u16,
        one_shot: bool,
        now_ms: u32,
        sink: &mut S,
    ) -> bool {
        if pattern(pattern_id).is_none() {
            tracing::warn!(port = self.port, pattern_id, "unknown pattern");
            return false;
        }
        let Some(run) = self.run_zones.get_mut(self.current) else {
            return false;
        };

        run.pattern_id = pattern_id;
        run.delay = delay;
        run.one_shot = one_shot;
        run.reset();

        tracing::info!(
            port = self.port,
            zone = self.current,
            pattern_id,
            one_shot,
            delay,
            "pattern set"
        );

        self.update_zone(self.current, true, now_ms, sink)
    }

    /// Change the color of the selected zone and render it right away.
    pub fn set_color<S: PixelSink + ?Sized>(&mut self, color: u32, now_ms: u32, sink: &mut S) -> bool {
        let Some(run) = self.run_zones.get_mut(self.current) else {
            return false;
        };

        run.color = color;
        run.reset();
        self.update_zone(self.current, true, now_ms, sink)
    }

    /// Restart the listed zones. Indexes without a zone are skipped; returns how many were reset.
    pub fn reset_zones(&mut self, indexes: &[u8]) -> usize {
        let mut count = 0;
        for &index in indexes {
            if let Some(run) = self.run_zones.get_mut(usize::from(index)) {
                run.reset();
                count += 1;
            }
        }
        count
    }

    pub fn reset_all(&mut self) {
        self.run_zones.iter_mut().for_each(RunZone::reset);
    }

    /// Advance zone `index` if it is due, or unconditionally when `force` is set.
    ///
    /// Returns whether the zone was rendered.
    pub fn update_zone<S: PixelSink + ?Sized>(
        &mut self,
        index: usize,
        force: bool,
        now_ms: u32,
        sink: &mut S,
    ) -> bool {
        let (Some(run), Some(zone)) = (self.run_zones.get_mut(index), self.zones.get(index)) else {
            return false;
        };
        let Some(pattern) = pattern(run.pattern_id) else {
            return false;
        };

        if !force {
            if !run.should_update(now_ms) {
                return false;
            }
            if u32::from(run.state) >= pattern.state_ceiling(zone.count) {
                if run.one_shot {
                    run.done_running = true;
                    return false;
                }
                run.reset();
            }
        }

        self.render(index, pattern, sink);

        let run = &mut self.run_zones[index];
        run.state = run.state.wrapping_add(1);
        run.last_update_ms = Some(now_ms);
        true
    }

    /// Update every zone in ascending order. Returns how many zones were rendered.
    pub fn update_zones<S: PixelSink + ?Sized>(&mut self, force: bool, now_ms: u32, sink: &mut S) -> usize {
        (0..self.run_zones.len())
            .filter(|&index| self.update_zone(index, force, now_ms, sink))
            .count()
    }

    fn render<S: PixelSink + ?Sized>(&mut self, index: usize, pattern: &Pattern, sink: &mut S) {
        let zone = self.zones[index];
        let run = self.run_zones[index];
        let offset = usize::from(zone.offset);
        let count = usize::from(zone.count);

        self.scratch.clear();
        self.scratch.resize(count, RGB8::default());
        let dirty = pattern.render(&mut self.scratch, run.color, run.state);

        for (p, pixel) in self.scratch.iter().enumerate() {
            // reversed zones land one pixel past their range: the first pixel of the next zone
            // gets overwritten, and only the last zone on the port writes past the buffer, which
            // the sink drops
            let dest = if run.reversed {
                offset + (count - p)
            } else {
                offset + p
            };
            sink.write(self.port, dest, *pixel);
        }

        if dirty {
            sink.flush(self.port, self.brightness);
        }
    }

    pub fn port(&self) -> u8 {
        self.port
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn zones(&self) -> &[ZoneDefinition] {
        &self.zones
    }

    pub fn run_zones(&self) -> &[RunZone] {
        &self.run_zones
    }

    pub fn run_zone(&self, index: usize) -> Option<&RunZone> {
        self.run_zones.get(index)
    }

    pub fn run_zone_mut(&mut self, index: usize) -> Option<&mut RunZone> {
        self.run_zones.get_mut(index)
    }

    /// Index of the selected zone.
    pub fn current_zone(&self) -> usize {
        self.current
    }

    /// Whether the selected zone finished its one-shot pattern.
    pub fn pattern_done(&self) -> bool {
        self.run_zone(self.current).is_some_and(RunZone::is_done)
    }

    /// Color of the selected zone.
    pub fn current_color(&self) -> u32 {
        self.run_zone(self.current).map_or(0, |run| run.color)
    }
}
