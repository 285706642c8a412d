use std::{cell::RefCell, rc::Rc};

use cx_core::utils::{
    connection::{BusTarget, ConfigStore, MemoryConfigStore, NoRadio, PacketRadio},
    controllers::digital::{DigitalError, DigitalIo, DigitalPorts, PinMode},
    protocol::{Command, Configuration, LedConfiguration, Message},
    queue::{CommandQueue, EngineStatus},
};
use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};

type Bus<'q, R = NoRadio> = BusTarget<'q, DigitalPorts<PinMock>, MemoryConfigStore, R>;

/// Three digital pins expecting `transactions[i]` on port `i`.
fn pins(transactions: [&[PinTransaction]; 3]) -> [PinMock; 3] {
    transactions.map(PinMock::new)
}

fn done(pins: &mut [PinMock; 3]) {
    for pin in pins {
        pin.done();
    }
}

fn bus<'q>(queue: &'q CommandQueue, pins: &[PinMock; 3]) -> Bus<'q> {
    BusTarget::new(
        queue,
        DigitalPorts::new(pins.clone()),
        MemoryConfigStore::new(),
        NoRadio,
    )
}

fn request<D, C, R>(bus: &mut BusTarget<'_, D, C, R>) -> Vec<u8>
where
    D: DigitalIo,
    C: ConfigStore,
    R: PacketRadio,
{
    let mut out = [0u8; 128];
    let len = bus.on_request(&mut out);
    out[..len].to_vec()
}

/// Radio that records what it was asked to send.
#[derive(Default)]
struct RecordingRadio {
    sent: Rc<RefCell<Vec<(bool, Message)>>>,
    received: Option<Message>,
}

impl PacketRadio for RecordingRadio {
    type Error = ();

    fn send(&mut self, message: &Message) -> Result<(), Self::Error> {
        self.sent.borrow_mut().push((false, message.clone()));
        Ok(())
    }

    fn send_to_all(&mut self, message: &Message) -> Result<(), Self::Error> {
        self.sent.borrow_mut().push((true, message.clone()));
        Ok(())
    }

    fn last_received(&self) -> Option<Message> {
        self.received.clone()
    }
}

#[test]
fn test_digital_init_drives_outputs_low() {
    let low = [PinTransaction::set(PinState::Low)];
    let mut expected = pins([&low, &low, &low]);

    let mut ports = DigitalPorts::new(expected.clone());
    ports.init().unwrap();
    assert_eq!(ports.mode(2), Some(PinMode::Output));
    done(&mut expected);
}

#[test]
fn test_digital_write_then_read() {
    let mut expected = pins([
        &[],
        &[
            PinTransaction::set(PinState::High),
            PinTransaction::get(PinState::High),
        ],
        &[],
    ]);
    let queue = CommandQueue::new();
    let mut bus = bus(&queue, &expected);

    bus.on_receive(&[7, 1, 1]);
    bus.on_receive(&[8, 1, 1]);
    assert_eq!(request(&mut bus), [0xFF]);

    bus.on_receive(&[9, 1]);
    assert_eq!(request(&mut bus), [9, 1]);
    assert!(queue.is_empty());
    done(&mut expected);
}

#[test]
fn test_digital_errors_touch_no_pins() {
    let mut expected = pins([&[], &[], &[]]);
    let queue = CommandQueue::new();
    let mut bus = bus(&queue, &expected);

    bus.on_receive(&[8, 3, 1]);
    bus.on_receive(&[7, 3, 1]);
    bus.on_receive(&[7, 0, 9]);
    assert_eq!(bus.digital().mode(0), Some(PinMode::Input));

    assert!(matches!(
        bus.digital_mut().setup(1, 8),
        Err(DigitalError::UnknownMode(8))
    ));
    assert!(matches!(
        bus.digital_mut().read(5),
        Err(DigitalError::UnknownPort(5))
    ));
    bus.on_receive(&[9, 7]);
    assert_eq!(request(&mut bus), [0xFF]);
    done(&mut expected);
}

#[test]
fn test_digital_write_ignores_port_mode() {
    let mut expected = pins([
        &[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ],
        &[],
        &[],
    ]);
    let queue = CommandQueue::new();
    let mut bus = bus(&queue, &expected);

    // port 0 is still an input
    bus.on_receive(&[8, 0, 1]);
    bus.digital_mut().write(0, 0).unwrap();
    assert_eq!(bus.digital().mode(0), Some(PinMode::Input));
    done(&mut expected);
}

#[test]
fn test_engine_commands_are_queued() {
    let mut expected = pins([&[], &[], &[]]);
    let queue = CommandQueue::new();
    let mut bus = bus(&queue, &expected);

    bus.on_receive(&[0]);
    bus.on_receive(&[2, 7, 0, 0xFF, 0xFF]);
    bus.on_receive(&[18, 2, 0, 1]);
    assert_eq!(request(&mut bus), [0xFF]);

    assert_eq!(queue.len(), 3);
    assert_eq!(queue.pop(), Some(Command::On));
    assert_eq!(
        queue.pop(),
        Some(Command::Pattern {
            pattern_id: 7,
            one_shot: false,
            delay: -1
        })
    );
    assert!(matches!(queue.pop(), Some(Command::SyncStates { .. })));
    done(&mut expected);
}

#[test]
fn test_frames_are_clipped_to_the_receive_buffer() {
    let mut expected = pins([&[], &[], &[]]);
    let queue = CommandQueue::new();
    let mut bus = bus(&queue, &expected);

    let mut long = vec![0u8; 300];
    long[0] = 5;
    long[1] = 1;
    bus.on_receive(&long);
    assert_eq!(queue.pop(), Some(Command::SetLedPort { port: 1 }));

    // short frames read zeros past their end
    bus.on_receive(&[3, 9]);
    assert_eq!(queue.pop(), Some(Command::ChangeColor { r: 9, g: 0, b: 0 }));

    bus.on_receive(&[]);
    assert!(queue.is_empty());
    done(&mut expected);
}

#[test]
fn test_malformed_frames_are_dropped() {
    let mut expected = pins([&[], &[], &[]]);
    let queue = CommandQueue::new();
    let mut bus = bus(&queue, &expected);

    bus.on_receive(&[14]);
    bus.on_receive(&[17, 11]);
    assert!(queue.is_empty());
    assert_eq!(request(&mut bus), [0xFF]);

    bus.on_receive(&[42, 1, 2, 3]);
    assert!(queue.is_empty());
    assert_eq!(request(&mut bus), [0xFF]);
    done(&mut expected);
}

#[test]
fn test_status_replies_come_from_the_engine() {
    let mut expected = pins([&[], &[], &[]]);
    let queue = CommandQueue::new();
    let mut bus = bus(&queue, &expected);

    queue.publish_status(EngineStatus {
        system_on: true,
        port: 1,
        color: 0x0012_3456,
        pattern_done: true,
    });

    bus.on_receive(&[14]);
    assert_eq!(request(&mut bus), [14, 0x56, 0x34, 0x12, 0x00]);
    bus.on_receive(&[15]);
    assert_eq!(request(&mut bus), [15, 1]);
    bus.on_receive(&[4]);
    assert_eq!(request(&mut bus), [4, 1]);
    // the reply is repeatable until the next write
    assert_eq!(request(&mut bus), [4, 1]);
    done(&mut expected);
}

#[test]
fn test_config_store_and_read_back() {
    let mut expected = pins([&[], &[], &[]]);
    let queue = CommandQueue::new();
    let mut bus = bus(&queue, &expected);

    bus.on_receive(&[11]);
    let empty = request(&mut bus);
    assert_eq!(empty.len(), 1 + Configuration::WIRE_SIZE);
    assert!(empty[1..].iter().all(|&b| b == 0));

    let config = Configuration {
        valid: 0,
        team_number: 5414,
        initial_teams: [254, 1678],
        led0: LedConfiguration {
            count: 42,
            brightness: 80,
        },
        led1: LedConfiguration {
            count: 64,
            brightness: 40,
        },
    };
    bus.on_receive(&Command::SetConfig { config }.encode());
    assert!(queue.is_empty());

    bus.on_receive(&[11]);
    let reply = request(&mut bus);
    assert_eq!(reply[0], 11);
    let mut wire = [0u8; Configuration::WIRE_SIZE];
    wire.copy_from_slice(&reply[1..]);
    let stored = Configuration::from_wire(&wire);
    assert_eq!(stored, Configuration { valid: 1, ..config });
    done(&mut expected);
}

#[test]
fn test_radio_without_hardware() {
    let mut expected = pins([&[], &[], &[]]);
    let queue = CommandQueue::new();
    let mut bus = bus(&queue, &expected);

    bus.on_receive(
        &Command::RadioSend {
            message: Message::new(254, b"ping"),
        }
        .encode(),
    );
    bus.on_receive(&[13]);
    let reply = request(&mut bus);
    assert_eq!(reply.len(), 1 + Message::WIRE_SIZE);
    assert_eq!(reply[0], 13);
    assert!(reply[1..].iter().all(|&b| b == 0));
    done(&mut expected);
}

#[test]
fn test_radio_routing() {
    let mut expected = pins([&[], &[], &[]]);
    let queue = CommandQueue::new();
    let radio = RecordingRadio {
        received: Some(Message::new(1678, b"pong")),
        ..RecordingRadio::default()
    };
    let sent = radio.sent.clone();
    let mut bus: Bus<'_, RecordingRadio> = BusTarget::new(
        &queue,
        DigitalPorts::new(expected.clone()),
        MemoryConfigStore::new(),
        radio,
    );

    let direct = Message::new(254, b"hi");
    let everyone = Message::new(0xFFFF, b"all");
    bus.on_receive(&Command::RadioSend { message: direct.clone() }.encode());
    bus.on_receive(&Command::RadioSend { message: everyone.clone() }.encode());
    assert_eq!(*sent.borrow(), [(false, direct), (true, everyone)]);

    bus.on_receive(&[13]);
    let reply = request(&mut bus);
    assert_eq!(reply[0], 13);
    assert_eq!(&reply[1..5], b"pong");
    assert_eq!(reply[62], 4);
    assert_eq!(&reply[63..65], &1678u16.to_le_bytes());
    done(&mut expected);
}
