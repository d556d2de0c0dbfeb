// src/common/timing.rs

use core::time::Duration;

// Processing times of the EZO circuit in I2C mode. The circuit does not
// clock-stretch, so the host has to wait this long before reading the reply.

// === Command processing delays ===

/// Wait after a reading (`R`) or calibration (`Cal,...`) command.
pub const LONG_DELAY: Duration = Duration::from_millis(1500);
/// Wait after any other command that produces a reply.
pub const SHORT_DELAY: Duration = Duration::from_millis(500);

// === Reply framing ===

/// Bytes read back for every reply: 1 status byte + up to 30 payload bytes.
pub const REPLY_LEN: usize = 31;

// === Caller-side retry ===

/// Back-off the CLI waits before its single retry.
pub const RETRY_BACKOFF: Duration = Duration::from_secs(3);

/// Converts a delay to whole milliseconds, saturating at `u32::MAX`.
#[inline]
pub fn as_millis_u32(delay: Duration) -> u32 {
    u32::try_from(delay.as_millis()).unwrap_or(u32::MAX)
}
