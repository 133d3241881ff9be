//! Application-wide constants and compile-time configuration.
//!
//! Queue sizing, link constants, timing parameters and the board
//! selection live here so they can be tuned in one place.

use crate::board::BoardKind;

// Command bridge

/// Number of command slots between the producers and the display task.
pub const COMMAND_QUEUE_DEPTH: usize = 10;

/// Capacity of a command payload (bytes).
pub const PAYLOAD_CAPACITY: usize = 64;

/// Acknowledgment the acceptor writes back for every received chunk.
pub const ACK: [u8; 2] = *b"ok";

/// Size of the fixed data block the initiator sends when congestion clears.
pub const CONGESTION_BLOCK_LEN: usize = 20;

// Link

/// Name the acceptor advertises and the initiator looks for.
pub const ACCEPTOR_DEVICE_NAME: &str = "SPP_ACCEPTOR";

/// Name the initiator advertises for itself.
pub const INITIATOR_DEVICE_NAME: &str = "SPP_INITIATOR";

/// Maximum advertised/EIR name length we keep.
pub const DEVICE_NAME_CAPACITY: usize = 32;

/// Duration of one discovery window before the initiator rescans (seconds).
pub const DISCOVERY_WINDOW_SECS: u64 = 30;

/// ATT MTU requested on the link: 3 header bytes + one full payload.
pub const ATT_MTU: usize = 67;

// Input

/// Button polling period (ms), one scheduler tick.
pub const BUTTON_POLL_MS: u64 = 10;

/// Holds longer than this are "stop", shorter or equal are "start" (ms).
/// 200 ticks at 10 ms.
pub const LONG_PRESS_MS: u64 = 2_000;

/// Period of the telemetry sender on start/stop boards (ms).
pub const TELEMETRY_PERIOD_MS: u64 = 5_000;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in the binaries.  Adjust for your custom PCB.
//
//   Button 1 (start/stop, or send "abcdefghijk")  → P0.11
//   Button 2 (send "01234567890")                 → P0.12
//   Button 3 (send "ABCDEFGHIJK")                 → P0.24
//   I²C SDA                                       → P0.26
//   I²C SCL                                       → P0.27

// Board

/// Board profile the firmware binaries render for.
pub const BOARD: BoardKind = BoardKind::Oled128x64;
