//! Interfaces to the Bluetooth serial-port stack.
//!
//! The stack is an external collaborator: it reports link events to a
//! registered [`SppListener`] from its own context, and accepts outbound
//! data through an [`SppWriter`].

use crate::command::ConnHandle;
use crate::error::Error;

/// Link events reported by the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SppEvent<'a> {
    /// Stack initialised; ready to listen or discover.
    Init,
    /// Server is listening for connections.
    Started,
    /// A peer opened a link to our server.
    ServerOpen { handle: ConnHandle },
    /// Our outgoing connection attempt succeeded.
    ClientOpen { handle: ConnHandle },
    /// The link closed (either side).
    Close { handle: ConnHandle },
    /// Bytes arrived on the link.
    Data { handle: ConnHandle, data: &'a [u8] },
    /// Transmit congestion changed. `congested == false` means writes may resume.
    Congestion { handle: ConnHandle, congested: bool },
    /// A previous write finished.
    WriteComplete {
        handle: ConnHandle,
        len: usize,
        congested: bool,
    },
}

/// Callback interface registered with the stack.
///
/// Called from the stack's context, possibly concurrently with the
/// display task. Implementations must not block.
pub trait SppListener {
    fn on_spp_event(&self, event: &SppEvent<'_>);
}

/// Outbound side of an open link.
pub trait SppWriter {
    /// Queue `data` for transmission on `handle`. Fire and forget.
    fn write(&mut self, handle: ConnHandle, data: &[u8]) -> Result<(), Error>;
}

impl<T: SppWriter + ?Sized> SppWriter for &mut T {
    fn write(&mut self, handle: ConnHandle, data: &[u8]) -> Result<(), Error> {
        (**self).write(handle, data)
    }
}
