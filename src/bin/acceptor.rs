//! Acceptor firmware: advertise as `SPP_ACCEPTOR`, acknowledge and show
//! everything the initiator sends.

#![no_std]
#![no_main]

use defmt::{info, unwrap};
use embassy_executor::Spawner;
use nrf_softdevice::Softdevice;
use sppbridge::board::BoardProfile;
use sppbridge::config::{ACCEPTOR_DEVICE_NAME, BOARD};
use sppbridge::consumer::Consumer;
use sppbridge::platform::link::{LinkRegistry, NotifyWriter};
use sppbridge::platform::nus::Server;
use sppbridge::platform::screen::{self, OledCanvas};
use sppbridge::platform::{self, BridgeChannel, BridgeProducer, BridgeReceiver};
use sppbridge::producer::{EventProducer, Role};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

static CHANNEL: BridgeChannel = BridgeChannel::new();
static LINKS: LinkRegistry = LinkRegistry::new();
static SERVER: StaticCell<Server> = StaticCell::new();
static PRODUCER: StaticCell<BridgeProducer> = StaticCell::new();

#[embassy_executor::task]
async fn display_task(consumer: Consumer<NotifyWriter, OledCanvas>, rx: BridgeReceiver) -> ! {
    consumer.run(rx).await
}

#[embassy_executor::task]
async fn link_task(
    sd: &'static Softdevice,
    server: &'static Server,
    producer: &'static BridgeProducer,
) -> ! {
    platform::acceptor::run(sd, server, &LINKS, producer, ACCEPTOR_DEVICE_NAME).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("SPP acceptor starting");
    let p = embassy_nrf::init(platform::embassy_config());

    let sd = platform::enable_softdevice(ACCEPTOR_DEVICE_NAME);
    let server: &'static Server = SERVER.init(unwrap!(Server::new(sd)));
    let sd: &'static Softdevice = sd;
    unwrap!(spawner.spawn(platform::softdevice_task(sd)));

    let profile = BoardProfile::for_kind(BOARD);
    let canvas = unwrap!(screen::oled(p.TWISPI0, p.P0_26, p.P0_27, profile));
    let consumer = Consumer::new(
        Role::Acceptor,
        profile,
        NotifyWriter::new(server, &LINKS),
        canvas,
    );
    unwrap!(spawner.spawn(display_task(consumer, unwrap!(CHANNEL.take_receiver()))));

    let producer = PRODUCER.init(EventProducer::new(Role::Acceptor, CHANNEL.sender()));
    unwrap!(spawner.spawn(link_task(sd, server, producer)));
}
