//! Error types shared by the core and the firmware glue.
//!
//! Fixed-size and `Copy`, so they travel through logs and counters
//! without allocation.

/// Anything a writer, the display or the stack glue can fail with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A link-level failure from the Bluetooth stack.
    Ble(BleError),

    /// No link is open for the requested handle.
    NotConnected,

    /// The link's transmit buffers are full; retry after congestion clears.
    Congested,

    /// The stack rejected an outbound write.
    Write,

    /// Drawing or flushing the display failed.
    Display,

    /// Data does not fit the fixed-capacity buffer it was copied into.
    BufferOverflow,
}

/// Where in the link lifecycle the stack failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BleError {
    /// Advertising could not start.
    AdvertiseFailed,
    /// Discovery was cancelled or could not start.
    ScanFailed,
    /// Connection attempt failed.
    ConnectFailed,
    /// GATT discovery failed.
    DiscoveryFailed,
    /// Characteristic subscribe/notify failed.
    NotifyFailed,
}

impl From<BleError> for Error {
    fn from(e: BleError) -> Self {
        Error::Ble(e)
    }
}
