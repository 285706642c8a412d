use std::{convert::Infallible, fmt::Write as _, path::PathBuf};

use clap::Parser;
use cx_core::{
    config::BoardConfig,
    utils::{
        connection::{BusTarget, MemoryConfigStore, NoRadio},
        controllers::{
            digital::{DigitalPorts, DIGITAL_PORT_GPIOS},
            leds::SmartLedSink,
        },
        protocol::{Command, Opcode},
        queue::CommandQueue,
        Duration, SystemController, Timer,
    },
};
use embassy_executor::{Executor, Spawner};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use serde::Deserialize;
use smart_leds_trait::{SmartLedsWrite, RGB8};
use tracing::{error, info, warn};

/// Commands replayed when no script is given: select the matrix, light it, then run a few
/// patterns on the strip zones.
const DEFAULT_SCRIPT: &str = r#"[
    {"cmd": {"ct": "set_led_port", "port": 1}, "delay_ms": 500},
    {"cmd": {"ct": "on"}, "delay_ms": 500},
    {"cmd": {"ct": "change_color", "r": 255, "g": 50, "b": 40}, "delay_ms": 500},
    {"cmd": {"ct": "pattern", "pattern_id": 5, "one_shot": false, "delay": -1}, "delay_ms": 2000},
    {"cmd": {"ct": "set_led_port", "port": 0}, "delay_ms": 100},
    {"cmd": {"ct": "set_pattern_zone", "zone_index": 1, "reversed": false}, "delay_ms": 100},
    {"cmd": {"ct": "change_color", "r": 0, "g": 0, "b": 255}, "delay_ms": 100},
    {"cmd": {"ct": "pattern", "pattern_id": 2, "one_shot": false, "delay": -1}, "delay_ms": 1000},
    {"cmd": {"ct": "set_pattern_zone", "zone_index": 3, "reversed": true}, "delay_ms": 100},
    {"cmd": {"ct": "pattern", "pattern_id": 7, "one_shot": true, "delay": 50}, "delay_ms": 100},
    {"cmd": {"ct": "read_pattern_done"}, "delay_ms": 1000},
    {"cmd": {"ct": "read_pattern_done"}, "delay_ms": 100},
    {"cmd": {"ct": "sync_states", "zone_indexes": [1, 3]}, "delay_ms": 1000},
    {"cmd": {"ct": "get_color"}, "delay_ms": 100},
    {"cmd": {"ct": "get_port"}, "delay_ms": 100},
    {"cmd": {"ct": "digital_setup", "port": 0, "mode": 1}, "delay_ms": 0},
    {"cmd": {"ct": "digital_write", "port": 0, "value": 1}, "delay_ms": 0},
    {"cmd": {"ct": "digital_read", "port": 0}, "delay_ms": 100},
    {"cmd": {"ct": "off"}, "delay_ms": 1000}
]"#;

static QUEUE: CommandQueue = CommandQueue::new();

#[derive(Parser)]
#[clap(version = "1.0")]
struct Opts {
    /// JSON command script, a list of `{"cmd": ..., "delay_ms": ...}` steps
    #[clap(long)]
    script: Option<PathBuf>,
    /// play the script again once it ends
    #[clap(long)]
    repeat: bool,
    /// milliseconds between engine ticks
    #[clap(long, default_value_t = 1)]
    tick_ms: u64,
    /// pixels on LED port 0
    #[clap(long, default_value_t = 42)]
    led0: u16,
    /// pixels on LED port 1
    #[clap(long, default_value_t = 64)]
    led1: u16,
    /// split port 0 into this many even zones instead of the board layout
    #[clap(long)]
    zones0: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct ScriptStep {
    cmd: Command,
    #[serde(default)]
    delay_ms: u64,
}

/// LED chain that logs every frame instead of driving pixels.
struct SerialLedDriver {
    port: u8,
}

impl SmartLedsWrite for SerialLedDriver {
    type Color = RGB8;
    type Error = Infallible;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        let mut line = String::new();
        for c in iterator {
            let c: RGB8 = c.into();
            let _ = write!(line, "{:02x}{:02x}{:02x} ", c.r, c.g, c.b);
        }
        info!(port = self.port, "LED: {}", line.trim_end());
        Ok(())
    }
}

/// Digital pin that remembers the last level driven onto it.
struct SimPin {
    gpio: u8,
    high: bool,
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        info!(gpio = self.gpio, "pin low");
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        info!(gpio = self.gpio, "pin high");
        Ok(())
    }
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high)
    }
}

type Bus = BusTarget<'static, DigitalPorts<SimPin>, MemoryConfigStore, NoRadio>;
type Engine = SystemController<'static, SmartLedSink<SerialLedDriver, SerialLedDriver>>;

#[embassy_executor::task]
async fn engine_task(mut ctrl: Engine) -> ! {
    ctrl.run().await
}

/// Play the script through the real wire format, as the central controller would.
#[embassy_executor::task]
async fn bus_task(mut bus: Bus, script: Vec<ScriptStep>, repeat: bool) {
    loop {
        for step in &script {
            let frame = step.cmd.encode();
            info!(command = ?step.cmd, bytes = frame.len(), "bus write");
            bus.on_receive(&frame);

            if expects_reply(&step.cmd) {
                let mut reply = [0u8; 128];
                let len = bus.on_request(&mut reply);
                info!(reply = ?&reply[..len], "bus read");
            }

            Timer::after_millis(step.delay_ms).await;
        }

        if !repeat {
            info!("script finished");
            return;
        }
    }
}

fn expects_reply(cmd: &Command) -> bool {
    matches!(
        cmd.opcode(),
        Some(
            Opcode::ReadPatternDone
                | Opcode::DigitalRead
                | Opcode::ReadConfig
                | Opcode::RadioGetLatestReceived
                | Opcode::GetColor
                | Opcode::GetPort
        )
    )
}

fn load_script(path: Option<&PathBuf>) -> Result<Vec<ScriptStep>, String> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?,
        None => DEFAULT_SCRIPT.to_owned(),
    };
    serde_json::from_str(&text).map_err(|e| format!("bad script: {e}"))
}

#[embassy_executor::task]
async fn main_task(spawner: Spawner, opts: Opts) {
    let script = match load_script(opts.script.as_ref()) {
        Ok(script) => script,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let mut config = BoardConfig::default();
    config.ports[0].led_count = opts.led0;
    config.ports[1].led_count = opts.led1;
    if let Some(zones) = opts.zones0 {
        config.ports[0] = config.ports[0].clone().with_zone_count(zones);
    }

    let sink = SmartLedSink::new(
        SerialLedDriver { port: 0 },
        usize::from(opts.led0),
        SerialLedDriver { port: 1 },
        usize::from(opts.led1),
    );
    let ctrl = SystemController::new(&QUEUE, sink, &config)
        .with_tick_period(Duration::from_millis(opts.tick_ms));
    spawner.spawn(engine_task(ctrl)).unwrap();

    let mut digital = DigitalPorts::new(DIGITAL_PORT_GPIOS.map(|gpio| SimPin { gpio, high: false }));
    if let Err(e) = digital.init() {
        warn!("digital init failed: {:?}", e);
    }
    let bus = BusTarget::new(&QUEUE, digital, MemoryConfigStore::new(), NoRadio);

    info!(steps = script.len(), repeat = opts.repeat, "replaying command script");
    spawner.spawn(bus_task(bus, script, opts.repeat)).unwrap();
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let opts = Opts::parse();
    let executor = cx_core::mk_static!(Executor, Executor::new());
    executor.run(|spawner| {
        spawner.spawn(main_task(spawner, opts)).unwrap();
    });
}
