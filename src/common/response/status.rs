// src/common/response/status.rs

use core::fmt;

/// First byte of every reply.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct StatusCode(pub u8);

impl StatusCode {
    /// Request processed, payload follows.
    pub const SUCCESS: StatusCode = StatusCode(1);
    /// The circuit did not understand the command.
    pub const SYNTAX_ERROR: StatusCode = StatusCode(2);
    /// Read too early; the command is still being processed.
    pub const STILL_PROCESSING: StatusCode = StatusCode(254);
    /// No data to send.
    pub const NO_DATA: StatusCode = StatusCode(255);

    #[inline]
    pub const fn is_success(&self) -> bool {
        self.0 == Self::SUCCESS.0
    }

    #[inline]
    pub const fn code(&self) -> u8 {
        self.0
    }
}

impl From<u8> for StatusCode {
    fn from(value: u8) -> Self {
        StatusCode(value)
    }
}

/// Decimal, as the device documents its codes.
impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
