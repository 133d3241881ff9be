//! sppbridge - serial-port bridge between a Bluetooth link and a text screen.
//!
//! Two roles share one core: the **acceptor** advertises, accepts a link,
//! acknowledges every chunk it receives and scrolls it on screen; the
//! **initiator** finds the acceptor by name, connects and sends text from
//! buttons or a timer.
//!
//! Every event source (stack callbacks, buttons, timer) is a producer that
//! only enqueues [`Command`]s. A single display task consumes them and owns
//! the link writer, the screen and the connection state.
//!
//! The core is `no_std` and hardware-free so it runs under `cargo test`
//! on the host. The nRF52840 glue lives in [`platform`] behind the
//! `embedded` feature; the binaries in `src/bin/` wire it together.

#![cfg_attr(not(test), no_std)]

// Must come first: the logging macros are used by every module below.
#[macro_use]
mod fmt;

// ═══════════════════════════════════════════════════════════════════════════
// Command bridge
// ═══════════════════════════════════════════════════════════════════════════

pub mod channel;
pub mod command;
pub mod consumer;
pub mod producer;

// ═══════════════════════════════════════════════════════════════════════════
// Collaborator interfaces
// ═══════════════════════════════════════════════════════════════════════════

pub mod display;
pub mod input;
pub mod spp;

// ═══════════════════════════════════════════════════════════════════════════
// Boards, rendering and link policy
// ═══════════════════════════════════════════════════════════════════════════

pub mod board;
pub mod canvas;
pub mod config;
pub mod discovery;
pub mod error;
pub mod pairing;

#[cfg(feature = "embedded")]
pub mod platform;

pub use board::{BoardKind, BoardProfile};
pub use channel::{CommandChannel, CommandReceiver, CommandSender};
pub use command::{Command, CommandTag, ConnHandle, Payload};
pub use consumer::{ConnectionState, Consumer, Outcome, SendMode};
pub use display::{Color, Display, Region};
pub use error::{BleError, Error};
pub use producer::{EventProducer, Role};
pub use spp::{SppEvent, SppListener, SppWriter};
