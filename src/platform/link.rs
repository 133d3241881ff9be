//! The open link, the two `SppWriter`s and the pairing handler.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;
use nrf_softdevice::ble::gatt_client::{self, TryWriteError};
use nrf_softdevice::ble::security::{IoCapabilities, SecurityHandler};
use nrf_softdevice::ble::{Connection, SecurityMode};

use crate::command::ConnHandle;
use crate::config::PAYLOAD_CAPACITY;
use crate::error::{BleError, Error};
use crate::pairing::{self, GapEvent};
use crate::platform::nus::Server;
use crate::spp::SppWriter;

#[derive(Clone)]
struct Link {
    handle: ConnHandle,
    conn: Connection,
    /// Value handle of the peer's RX characteristic (initiator only).
    peer_rx: Option<u16>,
}

/// The single open connection, shared between the link task and the writers.
pub struct LinkRegistry {
    link: Mutex<CriticalSectionRawMutex, RefCell<Option<Link>>>,
    congested: AtomicBool,
}

impl LinkRegistry {
    pub const fn new() -> Self {
        Self {
            link: Mutex::new(RefCell::new(None)),
            congested: AtomicBool::new(false),
        }
    }

    /// Record a new connection. `None` if the SoftDevice already dropped it.
    pub fn open(&self, conn: &Connection, peer_rx: Option<u16>) -> Option<ConnHandle> {
        let handle = ConnHandle(u32::from(conn.handle()?));
        self.link.lock(|link| {
            link.replace(Some(Link {
                handle,
                conn: conn.clone(),
                peer_rx,
            }))
        });
        self.congested.store(false, Ordering::Relaxed);
        Some(handle)
    }

    pub fn close(&self) {
        self.link.lock(|link| link.replace(None));
    }

    /// Clear the congestion flag, returning whether it was set.
    pub fn take_congested(&self) -> bool {
        self.congested.swap(false, Ordering::AcqRel)
    }

    fn with<R>(&self, handle: ConnHandle, f: impl FnOnce(&Link) -> R) -> Result<R, Error> {
        self.link.lock(|link| match link.borrow().as_ref() {
            Some(l) if l.handle == handle => Ok(f(l)),
            _ => Err(Error::NotConnected),
        })
    }
}

impl Default for LinkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Acceptor writer: TX notifications from the NUS server.
pub struct NotifyWriter {
    server: &'static Server,
    links: &'static LinkRegistry,
}

impl NotifyWriter {
    pub fn new(server: &'static Server, links: &'static LinkRegistry) -> Self {
        Self { server, links }
    }
}

impl SppWriter for NotifyWriter {
    fn write(&mut self, handle: ConnHandle, data: &[u8]) -> Result<(), Error> {
        let value: Vec<u8, PAYLOAD_CAPACITY> =
            Vec::from_slice(data).map_err(|_| Error::BufferOverflow)?;
        self.links.with(handle, |link| {
            self.server
                .nus
                .tx_notify(&link.conn, &value)
                .map_err(|_| Error::from(BleError::NotifyFailed))
        })?
    }
}

/// Initiator writer: write-without-response to the peer's RX characteristic.
pub struct WriteCommandWriter {
    links: &'static LinkRegistry,
}

impl WriteCommandWriter {
    pub fn new(links: &'static LinkRegistry) -> Self {
        Self { links }
    }
}

impl SppWriter for WriteCommandWriter {
    fn write(&mut self, handle: ConnHandle, data: &[u8]) -> Result<(), Error> {
        let result = self.links.with(handle, |link| {
            let rx = link.peer_rx.ok_or(Error::NotConnected)?;
            gatt_client::try_write_without_response(&link.conn, rx, data).map_err(|e| match e {
                TryWriteError::BufferFull => Error::Congested,
                _ => Error::Write,
            })
        })?;
        if result == Err(Error::Congested) {
            self.links.congested.store(true, Ordering::Release);
        }
        result
    }
}

/// Pairing without user interaction; nothing is bonded.
pub struct AutoPairing;

impl SecurityHandler for AutoPairing {
    fn io_capabilities(&self) -> IoCapabilities {
        // No display, no keyboard: just-works, i.e. comparisons auto-confirmed.
        IoCapabilities::None
    }

    fn can_bond(&self, _conn: &Connection) -> bool {
        false
    }

    fn display_passkey(&self, passkey: &[u8; 6]) {
        let value = passkey
            .iter()
            .fold(0u32, |acc, d| acc * 10 + u32::from(d.wrapping_sub(b'0')));
        pairing::respond(&GapEvent::PasskeyNotify { passkey: value });
    }

    fn on_security_update(&self, _conn: &Connection, mode: SecurityMode) {
        let success = mode != SecurityMode::NoAccess && mode != SecurityMode::Open;
        pairing::respond(&GapEvent::AuthComplete { success });
    }
}
