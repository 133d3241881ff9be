//! Initiator firmware: find `SPP_ACCEPTOR`, connect and send text from
//! the buttons and the telemetry timer.

#![no_std]
#![no_main]

use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{AnyPin, Pin};
use nrf_softdevice::Softdevice;
use sppbridge::board::BoardProfile;
use sppbridge::config::{BOARD, INITIATOR_DEVICE_NAME};
use sppbridge::consumer::Consumer;
use sppbridge::platform::buttons::{button_task, telemetry_task};
use sppbridge::platform::link::{LinkRegistry, WriteCommandWriter};
use sppbridge::platform::screen::{self, OledCanvas};
use sppbridge::platform::{self, BridgeChannel, BridgeProducer, BridgeReceiver};
use sppbridge::producer::{EventProducer, Role};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

static CHANNEL: BridgeChannel = BridgeChannel::new();
static LINKS: LinkRegistry = LinkRegistry::new();
static PRODUCER: StaticCell<BridgeProducer> = StaticCell::new();

#[embassy_executor::task]
async fn display_task(
    consumer: Consumer<WriteCommandWriter, OledCanvas>,
    rx: BridgeReceiver,
) -> ! {
    consumer.run(rx).await
}

#[embassy_executor::task]
async fn link_task(sd: &'static Softdevice, producer: &'static BridgeProducer) -> ! {
    platform::initiator::run(sd, &LINKS, producer).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("SPP initiator starting");
    let p = embassy_nrf::init(platform::embassy_config());

    let sd: &'static Softdevice = platform::enable_softdevice(INITIATOR_DEVICE_NAME);
    unwrap!(spawner.spawn(platform::softdevice_task(sd)));

    let profile = BoardProfile::for_kind(BOARD);
    let canvas = unwrap!(screen::oled(p.TWISPI0, p.P0_26, p.P0_27, profile));
    let consumer = Consumer::new(
        Role::Initiator,
        profile,
        WriteCommandWriter::new(&LINKS),
        canvas,
    );
    unwrap!(spawner.spawn(display_task(consumer, unwrap!(CHANNEL.take_receiver()))));

    let pins: [AnyPin; 3] = [p.P0_11.degrade(), p.P0_12.degrade(), p.P0_24.degrade()];
    for (pin, action) in pins.into_iter().zip(profile.buttons().iter().copied()) {
        unwrap!(spawner.spawn(button_task(pin, action, CHANNEL.sender())));
    }
    if let Some(label) = profile.telemetry_label {
        unwrap!(spawner.spawn(telemetry_task(label, CHANNEL.sender())));
    }

    let producer = PRODUCER.init(EventProducer::new(Role::Initiator, CHANNEL.sender()));
    unwrap!(spawner.spawn(link_task(sd, producer)));
}
