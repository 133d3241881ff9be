//! Integration tests for sppbridge host-testable logic.
//!
//! Stack events and button samples go in at the producer end; writes and
//! screen contents come out at the consumer end.

use core::convert::Infallible;

use embassy_futures::block_on;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use sppbridge::board::{BoardKind, BoardProfile};
use sppbridge::canvas::{Panel, TextCanvas};
use sppbridge::config::{COMMAND_QUEUE_DEPTH, CONGESTION_BLOCK_LEN};
use sppbridge::input::{Button, ButtonAction, Level, TelemetryTicker};
use sppbridge::{
    Command, CommandChannel, ConnHandle, ConnectionState, Consumer, Error, EventProducer, Role,
    SppEvent, SppListener, SppWriter,
};

#[derive(Default)]
struct Wire {
    writes: Vec<(ConnHandle, Vec<u8>)>,
}

impl SppWriter for Wire {
    fn write(&mut self, handle: ConnHandle, data: &[u8]) -> Result<(), Error> {
        self.writes.push((handle, data.to_vec()));
        Ok(())
    }
}

struct Frame {
    size: Size,
    lit: usize,
}

impl Frame {
    fn new(width: u32, height: u32) -> Self {
        Self {
            size: Size::new(width, height),
            lit: 0,
        }
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.lit += pixels.into_iter().filter(|Pixel(_, c)| c.is_on()).count();
        Ok(())
    }
}

impl Panel for Frame {}

type Channel = CommandChannel<NoopRawMutex, COMMAND_QUEUE_DEPTH>;

fn consumer(role: Role, kind: BoardKind) -> Consumer<Wire, TextCanvas<Frame>> {
    let profile = BoardProfile::for_kind(kind);
    let canvas = TextCanvas::new(Frame::new(profile.width, profile.height), profile);
    Consumer::new(role, profile, Wire::default(), canvas)
}

fn drain(channel: &Channel, consumer: &mut Consumer<Wire, TextCanvas<Frame>>) {
    let rx = channel.take_receiver().expect("receiver already taken");
    while !channel.is_empty() {
        let command = block_on(rx.receive());
        consumer.dispatch(command);
    }
}

const H: ConnHandle = ConnHandle(7);

#[test]
fn acceptor_session_acks_and_scrolls() {
    let channel = Channel::new();
    let producer = EventProducer::new(Role::Acceptor, channel.sender());
    let mut c = consumer(Role::Acceptor, BoardKind::Oled128x64);
    c.paint_initial();

    producer.on_spp_event(&SppEvent::Init);
    producer.on_spp_event(&SppEvent::ServerOpen { handle: H });
    for line in ["one", "two", "three", "four\r\n"] {
        producer.on_spp_event(&SppEvent::Data {
            handle: H,
            data: line.as_bytes(),
        });
    }
    drain(&channel, &mut c);

    assert_eq!(c.writer().writes.len(), 4);
    assert!(c.writer().writes.iter().all(|(h, d)| *h == H && d == b"ok"));
    // Three body lines on this board: the oldest scrolled away.
    assert_eq!(c.display().body_text(0), Some("two"));
    assert_eq!(c.display().body_text(1), Some("three"));
    assert_eq!(c.display().body_text(2), Some("four"));
    assert!(c.display().target().lit > 0);
    assert_eq!(c.state().handle(), Some(H));
}

#[test]
fn close_then_data_is_ignored() {
    let channel = Channel::new();
    let producer = EventProducer::new(Role::Acceptor, channel.sender());
    let mut c = consumer(Role::Acceptor, BoardKind::Stack);

    producer.on_spp_event(&SppEvent::ServerOpen { handle: H });
    producer.on_spp_event(&SppEvent::Close { handle: H });
    producer.on_spp_event(&SppEvent::Data {
        handle: H,
        data: b"late",
    });
    drain(&channel, &mut c);

    assert_eq!(c.state(), ConnectionState::Disconnected);
    assert!(c.writer().writes.is_empty());
    assert_eq!(c.ignored(), 1);
}

#[test]
fn initiator_sends_block_when_congestion_clears_while_started() {
    let channel = Channel::new();
    let producer = EventProducer::new(Role::Initiator, channel.sender());
    let mut c = consumer(Role::Initiator, BoardKind::StickC);
    let mut button = Button::new(ButtonAction::StartStop);
    let tx = channel.sender();

    producer.on_spp_event(&SppEvent::ClientOpen { handle: H });
    // Not started yet: this block is dropped by the consumer.
    producer.on_spp_event(&SppEvent::Congestion {
        handle: H,
        congested: false,
    });
    button.poll(Level::Asserted, 0);
    tx.try_send(button.poll(Level::Released, 120).expect("short press"));
    producer.on_spp_event(&SppEvent::Congestion {
        handle: H,
        congested: false,
    });
    drain(&channel, &mut c);

    assert_eq!(c.writer().writes.len(), 1);
    let (handle, block) = &c.writer().writes[0];
    assert_eq!(*handle, H);
    assert_eq!(block.len(), CONGESTION_BLOCK_LEN);
    assert_eq!(block[CONGESTION_BLOCK_LEN - 1], 19);
    assert_eq!(c.ignored(), 1);
}

#[test]
fn telemetry_flows_only_between_start_and_stop() {
    let channel = Channel::new();
    let producer = EventProducer::new(Role::Initiator, channel.sender());
    let mut c = consumer(Role::Initiator, BoardKind::Stick);
    let mut telemetry = TelemetryTicker::new("M5Stick");
    let mut button = Button::new(ButtonAction::StartStop);
    let tx = channel.sender();

    producer.on_spp_event(&SppEvent::ClientOpen { handle: H });
    tx.try_send(telemetry.next_command());
    button.poll(Level::Asserted, 1_000);
    tx.try_send(button.poll(Level::Released, 1_050).expect("start"));
    tx.try_send(telemetry.next_command());
    button.poll(Level::Asserted, 2_000);
    tx.try_send(button.poll(Level::Released, 5_000).expect("stop"));
    tx.try_send(telemetry.next_command());
    drain(&channel, &mut c);

    assert_eq!(c.writer().writes, vec![(H, b"This is M5Stick:1".to_vec())]);
}

#[test]
fn stack_initiator_echoes_button_text_with_page_wrap() {
    let channel = Channel::new();
    let producer = EventProducer::new(Role::Initiator, channel.sender());
    let mut c = consumer(Role::Initiator, BoardKind::Stack);
    let lines = BoardProfile::for_kind(BoardKind::Stack).body_lines();
    let mut button = Button::new(ButtonAction::SendText("abcdefghijk"));

    let rx = channel.take_receiver().expect("receiver");
    producer.on_spp_event(&SppEvent::ClientOpen { handle: H });
    c.dispatch(block_on(rx.receive()));

    for i in 0..=lines as u64 {
        button.poll(Level::Asserted, i * 100);
        let command = button.poll(Level::Released, i * 100 + 10).expect("release");
        assert_eq!(command, Command::send_text("abcdefghijk"));
        channel.try_send(command);
        c.dispatch(block_on(rx.receive()));
    }

    assert_eq!(c.writer().writes.len(), lines as usize + 1);
    // The page filled up, so the last line restarted at the top.
    assert_eq!(c.display().body_text(0), Some("abcdefghijk"));
    assert_eq!(c.display().body_text(1), None);
}

#[test]
fn burst_beyond_queue_depth_drops_newest() {
    let channel = Channel::new();
    let producer = EventProducer::new(Role::Acceptor, channel.sender());
    let mut c = consumer(Role::Acceptor, BoardKind::Stack);

    producer.on_spp_event(&SppEvent::ServerOpen { handle: H });
    for i in 0..12u8 {
        producer.on_spp_event(&SppEvent::Data {
            handle: H,
            data: &[b'a' + i],
        });
    }
    assert_eq!(channel.dropped(), 3);
    drain(&channel, &mut c);

    // Open plus the first nine chunks made it.
    assert_eq!(c.writer().writes.len(), 9);
    assert_eq!(c.display().body_text(8), Some("i"));
    assert_eq!(c.display().body_text(9), None);
}
