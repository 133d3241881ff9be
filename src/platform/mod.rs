//! nRF52840 + SoftDevice S140 glue.
//!
//! Everything here needs the hardware. The modules turn SoftDevice
//! activity into [`SppEvent`](crate::spp::SppEvent)s for the producer,
//! implement [`SppWriter`](crate::spp::SppWriter) over the Nordic UART
//! Service, and drive the buttons and the OLED.
//!
//! ## Components
//!
//! - **nus**: NUS GATT server (acceptor) and client (initiator)
//! - **link**: the open connection, writers and pairing handler
//! - **acceptor** / **initiator**: advertise or scan-and-connect loops
//! - **buttons**: polled buttons and the telemetry timer
//! - **screen**: SSD1306 over TWIM

pub mod acceptor;
pub mod buttons;
pub mod initiator;
pub mod link;
pub mod nus;
pub mod screen;

use embassy_nrf::interrupt::Priority;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use nrf_softdevice::{raw, Softdevice};

use crate::channel::{CommandChannel, CommandReceiver, CommandSender};
use crate::config::{ATT_MTU, COMMAND_QUEUE_DEPTH};
use crate::producer::EventProducer;

/// The firmware's command channel.
pub type BridgeChannel = CommandChannel<CriticalSectionRawMutex, COMMAND_QUEUE_DEPTH>;
pub type BridgeSender = CommandSender<'static, CriticalSectionRawMutex, COMMAND_QUEUE_DEPTH>;
pub type BridgeReceiver = CommandReceiver<'static, CriticalSectionRawMutex, COMMAND_QUEUE_DEPTH>;
pub type BridgeProducer = EventProducer<'static, CriticalSectionRawMutex, COMMAND_QUEUE_DEPTH>;

/// HAL configuration. The application must run below the SoftDevice.
pub fn embassy_config() -> embassy_nrf::config::Config {
    let mut config = embassy_nrf::config::Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    config
}

/// Enable the SoftDevice with one peripheral and one central link.
pub fn enable_softdevice(name: &'static str) -> &'static mut Softdevice {
    let config = nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t {
            att_mtu: ATT_MTU as u16,
        }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 1,
            central_sec_count: 1,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: name.as_ptr() as *const u8 as _,
            current_len: name.len() as u16,
            max_len: name.len() as u16,
            write_perm: unsafe { core::mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    };
    Softdevice::enable(&config)
}

#[embassy_executor::task]
pub async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}
