// src/common/response/parse.rs

use super::error::ReplyParseError;
use super::status::StatusCode;
use super::{DecodedReading, ReplyText, MAX_PAYLOAD_LEN};

use crate::common::command::NUL;

/// Clears the most-significant bit of a payload byte.
///
/// Some I2C masters (notably the Raspberry Pi's) set bit 7 on bytes read back
/// from the EZO circuits; the payload is 7-bit ASCII, so the bit carries no data.
#[inline]
pub const fn strip_msb(byte: u8) -> u8 {
    byte & !0x80
}

/// Decodes a raw reply buffer.
///
/// Every NUL byte is dropped first, wherever it appears. The first remaining
/// byte is the status; on success the rest is MSB-corrected into text, on any
/// other status the payload is ignored.
pub fn decode_reply(raw: &[u8]) -> Result<DecodedReading, ReplyParseError> {
    let mut significant = raw.iter().copied().filter(|&b| b != NUL);

    let status = significant
        .next()
        .map(StatusCode)
        .ok_or(ReplyParseError::EmptyReply)?;

    if !status.is_success() {
        return Ok(DecodedReading::DeviceError(status));
    }

    let mut text = ReplyText::new();
    for byte in significant {
        text.push(char::from(strip_msb(byte)))
            .map_err(|_| ReplyParseError::PayloadTooLong { max: MAX_PAYLOAD_LEN })?;
    }

    Ok(DecodedReading::Reading(text))
}
