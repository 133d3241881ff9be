//! Command messages passed from the producers to the display task.
//!
//! A `Command` is an immutable event record. Each variant carries exactly
//! the fields its tag defines, so the consumer cannot read a connection
//! handle or payload from a command that has none.

use core::fmt;

use heapless::Vec;

use crate::config::{CONGESTION_BLOCK_LEN, PAYLOAD_CAPACITY};
use crate::error::Error;

/// Opaque identifier of an open serial link, as reported by the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnHandle(pub u32);

/// Bounded payload buffer (`len() <= PAYLOAD_CAPACITY` always).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Payload {
    bytes: Vec<u8, PAYLOAD_CAPACITY>,
}

impl Payload {
    /// Maximum number of bytes a payload holds.
    pub const CAPACITY: usize = PAYLOAD_CAPACITY;

    /// Create an empty payload.
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Copy `data` into a payload, rejecting anything over capacity.
    pub fn from_slice(data: &[u8]) -> Result<Self, Error> {
        let bytes = Vec::from_slice(data).map_err(|_| Error::BufferOverflow)?;
        Ok(Self { bytes })
    }

    /// Copy at most `CAPACITY` bytes of `data`.
    ///
    /// Returns the payload and whether anything was cut off.
    pub fn truncated(data: &[u8]) -> (Self, bool) {
        let take = data.len().min(Self::CAPACITY);
        let mut bytes = Vec::new();
        // Cannot fail: `take` never exceeds capacity.
        let _ = bytes.extend_from_slice(&data[..take]);
        (Self { bytes }, take < data.len())
    }

    /// Format text into a payload. Output past capacity is cut off.
    pub fn format(args: fmt::Arguments<'_>) -> Self {
        let mut text: heapless::String<PAYLOAD_CAPACITY> = heapless::String::new();
        let _ = fmt::write(&mut Truncating(&mut text), args);
        Self::truncated(text.as_bytes()).0
    }

    /// The fixed data block `[0, 1, .., 19]` sent when congestion clears.
    pub fn congestion_block() -> Self {
        let mut bytes = Vec::new();
        for i in 0..CONGESTION_BLOCK_LEN {
            let _ = bytes.push(i as u8);
        }
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Longest valid UTF-8 prefix, without trailing line breaks.
    pub fn text(&self) -> &str {
        let valid = match core::str::from_utf8(&self.bytes) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&self.bytes[..e.valid_up_to()]).unwrap_or_default(),
        };
        valid.trim_end_matches(|c| c == '\r' || c == '\n')
    }
}

/// `fmt::Write` adapter that keeps whatever fits and drops the rest.
struct Truncating<'a, const N: usize>(&'a mut heapless::String<N>);

impl<const N: usize> fmt::Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Command tags with the numeric codes used in log output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum CommandTag {
    Open = 100,
    Send = 200,
    Start = 220,
    Stop = 240,
    Receive = 300,
    Close = 400,
}

impl CommandTag {
    pub const fn code(self) -> u16 {
        self as u16
    }
}

/// A message from a producer context to the display task.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// A link opened with the given handle.
    Open { handle: ConnHandle },
    /// The link closed.
    Close,
    /// Write the payload on the current link.
    Send(Payload),
    /// Begin periodic sending.
    Start,
    /// Stop periodic sending.
    Stop,
    /// Data arrived on `handle`.
    Receive { handle: ConnHandle, payload: Payload },
}

impl Command {
    pub fn tag(&self) -> CommandTag {
        match self {
            Command::Open { .. } => CommandTag::Open,
            Command::Close => CommandTag::Close,
            Command::Send(_) => CommandTag::Send,
            Command::Start => CommandTag::Start,
            Command::Stop => CommandTag::Stop,
            Command::Receive { .. } => CommandTag::Receive,
        }
    }

    /// Build a `Send` from text, cutting it to payload capacity.
    pub fn send_text(text: &str) -> Self {
        Command::Send(Payload::truncated(text.as_bytes()).0)
    }
}
