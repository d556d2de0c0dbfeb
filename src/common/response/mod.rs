// src/common/response/mod.rs

mod error;
mod status;
pub mod parse; // Make parse functions public

// Re-export items for external use
pub use error::ReplyParseError;
pub use parse::{decode_reply, strip_msb};
pub use status::StatusCode;

use core::fmt;

use super::timing::REPLY_LEN;

/// Most payload characters a single reply can carry (everything after the status byte).
pub const MAX_PAYLOAD_LEN: usize = REPLY_LEN - 1;

/// Decoded payload text. Fixed capacity so decoding works without `alloc`.
pub type ReplyText = heapless::String<MAX_PAYLOAD_LEN>;

/// Outcome of one command/response exchange that reached the device.
///
/// A device-reported error is an ordinary decode, not a transport failure:
/// it sits inside `Ok(..)` next to real readings and callers tell them apart
/// by variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedReading {
    /// Status `1`: the MSB-corrected payload, e.g. `"7.012"`.
    Reading(ReplyText),
    /// Any other status. Displays as `Error <code>`.
    DeviceError(StatusCode),
    /// The command put the circuit to sleep; nothing was read.
    Asleep,
}

impl DecodedReading {
    /// The payload text of a successful reply.
    pub fn text(&self) -> Option<&str> {
        match self {
            DecodedReading::Reading(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Parses a numeric payload such as a pH reading.
    pub fn value(&self) -> Option<f32> {
        self.text().and_then(|text| text.trim().parse().ok())
    }

    pub fn is_device_error(&self) -> bool {
        matches!(self, DecodedReading::DeviceError(_))
    }
}

impl fmt::Display for DecodedReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedReading::Reading(text) => f.write_str(text),
            DecodedReading::DeviceError(code) => write!(f, "Error {}", code),
            DecodedReading::Asleep => f.write_str("sleep mode"),
        }
    }
}
