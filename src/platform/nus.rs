//! Nordic UART Service: the serial-port profile over GATT.
//!
//! RX is written by the central, TX is notified by the peripheral. The
//! acceptor hosts the service; the initiator is its client.

use heapless::Vec;

use crate::config::PAYLOAD_CAPACITY;

#[nrf_softdevice::gatt_service(uuid = "6E400001-B5A3-F393-E0A9-E50E24DCCA9E")]
pub struct Nus {
    #[characteristic(uuid = "6E400002-B5A3-F393-E0A9-E50E24DCCA9E", write, write_without_response)]
    pub rx: Vec<u8, PAYLOAD_CAPACITY>,

    #[characteristic(uuid = "6E400003-B5A3-F393-E0A9-E50E24DCCA9E", notify)]
    pub tx: Vec<u8, PAYLOAD_CAPACITY>,
}

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub nus: Nus,
}

#[nrf_softdevice::gatt_client(uuid = "6E400001-B5A3-F393-E0A9-E50E24DCCA9E")]
pub struct NusClient {
    #[characteristic(uuid = "6E400002-B5A3-F393-E0A9-E50E24DCCA9E", write, write_without_response)]
    pub rx: Vec<u8, PAYLOAD_CAPACITY>,

    #[characteristic(uuid = "6E400003-B5A3-F393-E0A9-E50E24DCCA9E", notify)]
    pub tx: Vec<u8, PAYLOAD_CAPACITY>,
}

/// Service UUID in advertising byte order (little-endian).
pub const NUS_UUID_LE: [u8; 16] = [
    0x9E, 0xCA, 0xDC, 0x24, 0x0E, 0xE5, 0xA9, 0xE0, 0x93, 0xF3, 0xA3, 0xB5, 0x01, 0x00, 0x40, 0x6E,
];
