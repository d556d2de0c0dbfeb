// src/common/hal_adapter.rs

//! Adapters from embedded-hal 1.0 traits to [`AtlasBus`] and [`AtlasDelay`].
//!
//! Any `embedded_hal::i2c::I2c` implementation works, including
//! `linux_embedded_hal::I2cdev` on a host or a microcontroller HAL's I2C
//! peripheral.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::address::DeviceAddress;
use super::hal_traits::{AtlasBus, AtlasDelay};

/// Wraps an embedded-hal I2C bus and remembers the target address.
///
/// embedded-hal addresses every transaction explicitly, so binding only
/// updates the stored address.
#[derive(Debug)]
pub struct HalBus<I> {
    i2c: I,
    address: DeviceAddress,
}

impl<I: I2c> HalBus<I> {
    pub fn new(i2c: I, address: DeviceAddress) -> Self {
        HalBus { i2c, address }
    }

    pub fn address(&self) -> DeviceAddress {
        self.address
    }

    /// Gives the underlying bus back.
    pub fn into_inner(self) -> I {
        self.i2c
    }
}

impl<I: I2c> AtlasBus for HalBus<I> {
    type Error = I::Error;

    fn set_address(&mut self, address: DeviceAddress) -> Result<(), Self::Error> {
        self.address = address;
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> nb::Result<(), Self::Error> {
        self.i2c
            .write(self.address.as_u8(), bytes)
            .map_err(nb::Error::Other)
    }

    fn read(&mut self, buffer: &mut [u8]) -> nb::Result<usize, Self::Error> {
        self.i2c
            .read(self.address.as_u8(), buffer)
            .map_err(nb::Error::Other)?;
        Ok(buffer.len())
    }
}

/// Wraps an embedded-hal delay provider.
#[derive(Debug)]
pub struct HalDelay<D>(pub D);

impl<D: DelayNs> AtlasDelay for HalDelay<D> {
    fn delay_ms(&mut self, ms: u32) {
        self.0.delay_ms(ms);
    }
}
