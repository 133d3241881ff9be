//! Acceptor link loop: advertise, accept one central, serve NUS until it leaves.

use embassy_time::{Duration, Timer};
use heapless::Vec;
use nrf_softdevice::ble::{gatt_server, peripheral};
use nrf_softdevice::{raw, Softdevice};

use crate::error::BleError;
use crate::platform::link::{AutoPairing, LinkRegistry};
use crate::platform::nus::{NusEvent, Server, ServerEvent, NUS_UUID_LE};
use crate::platform::BridgeProducer;
use crate::spp::{SppEvent, SppListener};

static PAIRING: AutoPairing = AutoPairing;

/// Flags plus the complete local name.
fn advertising_data(name: &str) -> Vec<u8, 31> {
    let mut adv = Vec::new();
    let _ = adv.extend_from_slice(&[
        2,
        raw::BLE_GAP_AD_TYPE_FLAGS as u8,
        raw::BLE_GAP_ADV_FLAGS_LE_ONLY_GENERAL_DISC_MODE as u8,
    ]);
    let room = adv.capacity() - adv.len() - 2;
    let name = &name.as_bytes()[..name.len().min(room)];
    let _ = adv.extend_from_slice(&[
        name.len() as u8 + 1,
        raw::BLE_GAP_AD_TYPE_COMPLETE_LOCAL_NAME as u8,
    ]);
    let _ = adv.extend_from_slice(name);
    adv
}

/// The NUS service UUID, so generic terminal apps recognise us.
fn scan_response() -> Vec<u8, 31> {
    let mut scan = Vec::new();
    let _ = scan.extend_from_slice(&[
        NUS_UUID_LE.len() as u8 + 1,
        raw::BLE_GAP_AD_TYPE_128BIT_SERVICE_UUID_COMPLETE as u8,
    ]);
    let _ = scan.extend_from_slice(&NUS_UUID_LE);
    scan
}

/// Advertise and serve connections forever.
pub async fn run(
    sd: &'static Softdevice,
    server: &'static Server,
    links: &'static LinkRegistry,
    listener: &'static BridgeProducer,
    name: &'static str,
) -> ! {
    let adv_data = advertising_data(name);
    let scan_data = scan_response();
    listener.on_spp_event(&SppEvent::Init);

    loop {
        let config = peripheral::Config::default();
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &adv_data[..],
            scan_data: &scan_data[..],
        };
        listener.on_spp_event(&SppEvent::Started);
        info!("advertising as {=str}", name);

        let conn = match peripheral::advertise_pairable(sd, adv, &config, &PAIRING)
            .await
            .map_err(|_| BleError::AdvertiseFailed)
        {
            Ok(conn) => conn,
            Err(e) => {
                warn!("acceptor idle: {}", e);
                Timer::after(Duration::from_secs(1)).await;
                continue;
            }
        };
        let Some(handle) = links.open(&conn, None) else {
            continue;
        };
        listener.on_spp_event(&SppEvent::ServerOpen { handle });

        gatt_server::run(&conn, server, |event| match event {
            ServerEvent::Nus(NusEvent::RxWrite(data)) => {
                listener.on_spp_event(&SppEvent::Data {
                    handle,
                    data: &data[..],
                });
            }
            ServerEvent::Nus(NusEvent::TxCccdWrite { notifications }) => {
                info!("TX notifications: {}", notifications);
            }
        })
        .await;

        links.close();
        listener.on_spp_event(&SppEvent::Close { handle });
    }
}
