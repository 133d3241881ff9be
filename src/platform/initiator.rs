//! Initiator link loop: find the acceptor by name, connect, subscribe to
//! its NUS TX and stay there until the link drops.

use embassy_time::{Duration, Timer};
use nrf_softdevice::ble::{central, gatt_client, Address, Connection};
use nrf_softdevice::Softdevice;

use crate::config::{ACCEPTOR_DEVICE_NAME, DISCOVERY_WINDOW_SECS};
use crate::discovery::{extract_device_name, peer_matches};
use crate::error::BleError;
use crate::platform::link::{AutoPairing, LinkRegistry};
use crate::platform::nus::{NusClient, NusClientEvent};
use crate::platform::BridgeProducer;
use crate::spp::{SppEvent, SppListener};

static PAIRING: AutoPairing = AutoPairing;

/// Scan for one discovery window. Returns the acceptor's address if seen.
async fn find_acceptor(sd: &Softdevice) -> Result<Address, BleError> {
    info!("discovering {=str} ({} s window)", ACCEPTOR_DEVICE_NAME, DISCOVERY_WINDOW_SECS);
    let config = central::ScanConfig {
        // Active scan so names in scan responses are seen too.
        active: true,
        // 10 ms units.
        timeout: (DISCOVERY_WINDOW_SECS * 100) as u16,
        ..Default::default()
    };

    central::scan(sd, &config, |params| {
        let data =
            unsafe { core::slice::from_raw_parts(params.data.p_data, params.data.len as usize) };
        if peer_matches(data, ACCEPTOR_DEVICE_NAME) {
            info!("found {=str}", extract_device_name(data).as_str());
            Some(Address::from_raw(params.peer_addr))
        } else {
            None
        }
    })
    .await
    .map_err(|_| BleError::ScanFailed)
}

/// Connect to `address` and subscribe to its NUS TX.
async fn connect(
    sd: &Softdevice,
    address: &Address,
) -> Result<(Connection, NusClient), BleError> {
    let whitelist = [address];
    let mut config = central::ConnectConfig::default();
    config.scan_config.whitelist = Some(&whitelist[..]);
    let conn = central::connect_with_security(sd, &config, &PAIRING)
        .await
        .map_err(|_| BleError::ConnectFailed)?;

    let client: NusClient = gatt_client::discover(&conn)
        .await
        .map_err(|_| BleError::DiscoveryFailed)?;
    client
        .tx_cccd_write(true)
        .await
        .map_err(|_| BleError::NotifyFailed)?;
    Ok((conn, client))
}

/// Discover and connect forever.
pub async fn run(
    sd: &'static Softdevice,
    links: &'static LinkRegistry,
    listener: &'static BridgeProducer,
) -> ! {
    listener.on_spp_event(&SppEvent::Init);

    loop {
        let address = match find_acceptor(sd).await {
            Ok(address) => address,
            Err(e) => {
                debug!("discovery window closed: {}", e);
                continue;
            }
        };
        let (conn, client) = match connect(sd, &address).await {
            Ok(link) => link,
            Err(e) => {
                warn!("link setup failed: {}", e);
                Timer::after(Duration::from_secs(1)).await;
                continue;
            }
        };

        let Some(handle) = links.open(&conn, Some(client.rx_value_handle)) else {
            continue;
        };
        listener.on_spp_event(&SppEvent::ClientOpen { handle });

        gatt_client::run(&conn, &client, |event| match event {
            NusClientEvent::TxNotification(data) => {
                listener.on_spp_event(&SppEvent::Data {
                    handle,
                    data: &data[..],
                });
                // An ack means the peer is draining; resume after a full buffer.
                if links.take_congested() {
                    listener.on_spp_event(&SppEvent::Congestion {
                        handle,
                        congested: false,
                    });
                }
            }
        })
        .await;

        links.close();
        listener.on_spp_event(&SppEvent::Close { handle });
    }
}
