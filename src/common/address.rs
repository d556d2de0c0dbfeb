// src/common/address.rs

use super::error::AtlasError;
use core::fmt;

/// A 7-bit I2C device address (0x00..=0x7F).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct DeviceAddress(u8);

impl DeviceAddress {
    /// Highest address reachable with 7-bit addressing.
    pub const MAX: u8 = 0x7F;

    /// Factory address of the EZO pH circuit.
    pub const EZO_PH: DeviceAddress = DeviceAddress(99);

    /// Creates a new `DeviceAddress` if the value fits in 7 bits.
    /// Returns `Result<Self, AtlasError<()>>` because validation itself
    /// cannot cause an I/O error.
    pub fn new(address: u8) -> Result<Self, AtlasError<()>> {
        if Self::is_valid(address) {
            Ok(DeviceAddress(address))
        } else {
            Err(AtlasError::AddressBind {
                address,
                cause: None,
            })
        }
    }

    #[inline]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_valid(address: u8) -> bool {
        address <= Self::MAX
    }
}

impl TryFrom<u8> for DeviceAddress {
    type Error = AtlasError<()>;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeviceAddress> for u8 {
    fn from(value: DeviceAddress) -> Self {
        value.0
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}
