//! Pairing policy.
//!
//! Both roles pair without user interaction: fixed PINs for legacy
//! pairing, automatic confirmation for numeric comparison.

use heapless::Vec;

/// Length of a 16-digit legacy PIN.
pub const PIN_MAX_LEN: usize = 16;

/// PIN used when the peer does not require 16 digits.
pub const DEFAULT_PIN: &[u8] = b"1234";

/// Security events reported by the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GapEvent {
    /// Authentication finished.
    AuthComplete { success: bool },
    /// Legacy pairing asks for a PIN.
    PinRequest { min_16_digit: bool },
    /// Numeric comparison: confirm that both sides show `passkey`.
    ConfirmRequest { passkey: u32 },
    /// Passkey to show to the user.
    PasskeyNotify { passkey: u32 },
    /// Passkey entry requested.
    PasskeyRequest,
}

/// What to answer to a [`GapEvent`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GapReply {
    Pin(Vec<u8, PIN_MAX_LEN>),
    Confirm(bool),
    None,
}

/// Sixteen `0` digits when the peer requires them, `"1234"` otherwise.
pub fn pin_reply(min_16_digit: bool) -> Vec<u8, PIN_MAX_LEN> {
    let mut pin = Vec::new();
    if min_16_digit {
        // Cannot fail: exactly PIN_MAX_LEN bytes.
        let _ = pin.resize(PIN_MAX_LEN, b'0');
    } else {
        let _ = pin.extend_from_slice(DEFAULT_PIN);
    }
    pin
}

/// Apply the pairing policy to one event.
pub fn respond(event: &GapEvent) -> GapReply {
    match *event {
        GapEvent::AuthComplete { success: true } => {
            info!("authentication success");
            GapReply::None
        }
        GapEvent::AuthComplete { success: false } => {
            error!("authentication failed");
            GapReply::None
        }
        GapEvent::PinRequest { min_16_digit } => {
            info!("PIN request, 16 digits: {}", min_16_digit);
            GapReply::Pin(pin_reply(min_16_digit))
        }
        GapEvent::ConfirmRequest { passkey } => {
            info!("confirm passkey {}", passkey);
            GapReply::Confirm(true)
        }
        GapEvent::PasskeyNotify { passkey } => {
            info!("passkey {}", passkey);
            GapReply::None
        }
        GapEvent::PasskeyRequest => {
            info!("passkey requested, entering nothing");
            GapReply::None
        }
    }
}
