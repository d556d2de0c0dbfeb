// src/link/config.rs

use core::time::Duration;

use crate::common::{address::DeviceAddress, timing};

/// Per-link settings, fixed at construction.
///
/// No `Default`: the device address is always chosen by the caller.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    /// Address the bus handle is bound to.
    pub address: DeviceAddress,
    /// Wait after `R` and `Cal` commands.
    pub long_delay: Duration,
    /// Wait after every other command that replies.
    pub short_delay: Duration,
    /// Bytes requested for each reply, at most [`timing::REPLY_LEN`].
    pub reply_len: usize,
}

impl LinkConfig {
    pub const fn new(address: DeviceAddress) -> Self {
        LinkConfig {
            address,
            long_delay: timing::LONG_DELAY,
            short_delay: timing::SHORT_DELAY,
            reply_len: timing::REPLY_LEN,
        }
    }

    pub const fn with_delays(mut self, long_delay: Duration, short_delay: Duration) -> Self {
        self.long_delay = long_delay;
        self.short_delay = short_delay;
        self
    }

    pub const fn with_reply_len(mut self, reply_len: usize) -> Self {
        self.reply_len = reply_len;
        self
    }
}
