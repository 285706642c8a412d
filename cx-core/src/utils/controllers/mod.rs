//! Execution context of the LED controller.
//!
//! - `leds`: pixel buffers and the `SmartLedsWrite` output
//! - `digital`: the general-purpose digital port bank
//!
//! [`SystemController`] owns the zone engines of both ports and drains the
//! [`CommandQueue`] between engine ticks.

pub mod digital;
pub mod leds;

use embassy_time::{Duration, Instant, Timer};
use heapless::Vec;
use smart_leds_trait::RGB8;

use self::leds::PixelSink;
use crate::{
    config::{BoardConfig, DEFAULT_PORT, NUM_PORTS},
    utils::{
        patterns::{pattern, u32_from_rgb},
        protocol::Command,
        queue::{CommandQueue, EngineStatus},
        zones::{validate_topology, PatternZone, ZoneDefinition},
    },
};

/// Time between engine ticks when nothing else is scheduled.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(1);

struct Port {
    zones: PatternZone,
    led_count: u16,
    swap_red_green: bool,
}

pub struct SystemController<'q, S> {
    queue: &'q CommandQueue,
    sink: S,
    ports: Vec<Port, NUM_PORTS>,
    current_port: u8,
    system_on: bool,
    tick_period: Duration,
}

impl<'q, S> SystemController<'q, S>
where
    S: PixelSink,
{
    /// Build the zone engines from `config` and blank both ports.
    pub fn new(queue: &'q CommandQueue, mut sink: S, config: &BoardConfig) -> Self {
        let mut ports = Vec::new();
        for (index, port) in (0u8..).zip(config.ports.iter()) {
            let zones = if !port.zones.is_empty() && fits(index, &port.zones, port.led_count) {
                PatternZone::from_definitions(index, port.brightness, &port.zones)
            } else {
                PatternZone::new(index, port.brightness, port.led_count, port.zone_count)
            };

            sink.fill(index, RGB8::default());
            sink.flush(index, port.brightness);

            // config.ports has exactly NUM_PORTS entries
            let _ = ports.push(Port {
                zones,
                led_count: port.led_count,
                swap_red_green: port.swap_red_green,
            });
        }

        tracing::info!(ports = ports.len(), "LED controller initialized");

        let controller = Self {
            queue,
            sink,
            ports,
            current_port: DEFAULT_PORT,
            system_on: true,
            tick_period: DEFAULT_TICK_PERIOD,
        };
        controller.publish();
        controller
    }

    #[must_use]
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Apply at most one queued command, advance every zone that is due, then publish the
    /// engine status for the bus.
    pub fn tick(&mut self, now_ms: u32) {
        if let Some(command) = self.queue.pop() {
            self.apply(command, now_ms);
        }

        if self.system_on {
            for port in &mut self.ports {
                port.zones.update_zones(false, now_ms, &mut self.sink);
            }
        }

        self.publish();
    }

    /// Apply one command to the engine.
    pub fn apply(&mut self, command: Command, now_ms: u32) {
        tracing::debug!(?command, "applying command");

        match command {
            Command::On => {
                for port in &mut self.ports {
                    port.zones.reset_all();
                }
                self.system_on = true;
                tracing::info!("LEDs on");
            }
            Command::Off => {
                for port in &self.ports {
                    let index = port.zones.port();
                    self.sink.fill(index, RGB8::default());
                    self.sink.flush(index, port.zones.brightness());
                }
                self.system_on = false;
                tracing::info!("LEDs off");
            }
            Command::Pattern {
                pattern_id,
                one_shot,
                delay,
            } => {
                let Some(known) = pattern(pattern_id) else {
                    tracing::warn!(pattern_id, "pattern not available");
                    return;
                };
                // negative delays select the pattern's own pace
                let delay = u16::try_from(delay).unwrap_or(known.default_delay_ms);
                if let Some(port) = self.ports.get_mut(usize::from(self.current_port)) {
                    port.zones
                        .set_pattern(pattern_id, delay, one_shot, now_ms, &mut self.sink);
                }
            }
            Command::ChangeColor { r, g, b } => {
                if let Some(port) = self.ports.get_mut(usize::from(self.current_port)) {
                    let color = if port.swap_red_green {
                        u32_from_rgb(g, r, b)
                    } else {
                        u32_from_rgb(r, g, b)
                    };
                    port.zones.set_color(color, now_ms, &mut self.sink);
                }
            }
            Command::SetLedPort { port } => {
                self.current_port = if usize::from(port) < self.ports.len() {
                    port
                } else {
                    tracing::warn!(port, "no such LED port, using port {}", DEFAULT_PORT);
                    DEFAULT_PORT
                };
                tracing::info!(port = self.current_port, "LED port selected");
            }
            Command::SetPatternZone {
                zone_index,
                reversed,
            } => {
                if let Some(port) = self.ports.get_mut(usize::from(self.current_port)) {
                    port.zones.set_run_zone(zone_index, reversed);
                }
            }
            Command::SetNewZones { zones } => {
                let index = self.current_port;
                if let Some(port) = self.ports.get_mut(usize::from(index)) {
                    if fits(index, &zones, port.led_count) {
                        port.zones.set_zones(&zones);
                        tracing::info!(port = index, zones = zones.len(), "zone layout replaced");
                    }
                }
            }
            Command::SyncStates { zone_indexes } => {
                if let Some(port) = self.ports.get_mut(usize::from(self.current_port)) {
                    let reset = port.zones.reset_zones(&zone_indexes);
                    tracing::debug!(reset, requested = zone_indexes.len(), "zones synced");
                }
            }
            other => tracing::debug!(?other, "not an engine command, ignoring"),
        }
    }

    /// Run the engine forever, ticking every `tick_period`.
    pub async fn run(&mut self) -> ! {
        loop {
            // the millisecond clock wraps after ~49 days; zone timing uses wrapping arithmetic
            #[allow(clippy::cast_possible_truncation)]
            let now_ms = Instant::now().as_millis() as u32;
            self.tick(now_ms);
            Timer::after(self.tick_period).await;
        }
    }

    pub fn status(&self) -> EngineStatus {
        let zones = self.zones(self.current_port);
        EngineStatus {
            system_on: self.system_on,
            port: self.current_port,
            color: zones.map_or(0, PatternZone::current_color),
            pattern_done: zones.is_some_and(PatternZone::pattern_done),
        }
    }

    pub fn is_on(&self) -> bool {
        self.system_on
    }

    pub fn current_port(&self) -> u8 {
        self.current_port
    }

    pub fn zones(&self, port: u8) -> Option<&PatternZone> {
        self.ports.get(usize::from(port)).map(|p| &p.zones)
    }

    pub fn zones_mut(&mut self, port: u8) -> Option<&mut PatternZone> {
        self.ports.get_mut(usize::from(port)).map(|p| &mut p.zones)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn publish(&self) {
        self.queue.publish_status(self.status());
    }
}

/// Whether `zones` lie inside the port without overlapping. Layouts that don't are refused.
fn fits(port: u8, zones: &[ZoneDefinition], led_count: u16) -> bool {
    match validate_topology(zones, led_count) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(port, ?e, "zone layout does not fit the port, keeping the previous one");
            false
        }
    }
}
