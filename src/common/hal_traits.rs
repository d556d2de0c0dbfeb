// src/common/hal_traits.rs

use super::address::DeviceAddress;
use core::fmt::Debug;

/// Abstraction for the blocking wait between a command and its reply.
///
/// Note: `HalDelay` (feature `impl-hal`) adapts `embedded_hal::delay::DelayNs`.
pub trait AtlasDelay {
    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// A bus handle bound to one device address.
///
/// Implementations own their channels exclusively. A handle is released
/// exactly once, by value, through [`AtlasBus::release`].
pub trait AtlasBus {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Binds every channel of the handle to `address`.
    ///
    /// On failure the previous binding must be left in place.
    fn set_address(&mut self, address: DeviceAddress) -> Result<(), Self::Error>;

    /// Writes `bytes` to the bound device as one transaction.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if the bus is not ready yet.
    fn write(&mut self, bytes: &[u8]) -> nb::Result<(), Self::Error>;

    /// Reads up to `buffer.len()` bytes from the bound device as one
    /// transaction and returns how many were stored.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if no data is available yet.
    fn read(&mut self, buffer: &mut [u8]) -> nb::Result<usize, Self::Error>;

    /// Closes all channels of the handle.
    fn release(self)
    where
        Self: Sized,
    {
    }
}
