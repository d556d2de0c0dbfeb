// src/linux/mod.rs

//! Host-side pieces: the i2c-dev bus handle, a thread-sleep delay and the
//! 1-Wire temperature reader.

mod delay;
mod i2c_bus;
pub mod w1_temperature;

pub use delay::StdDelay;
pub use i2c_bus::{device_path, LinuxI2cBus, I2C_SLAVE};
pub use w1_temperature::{read_temperature, TemperatureError, DEFAULT_W1_BUS_PATH};

use std::io;

use crate::common::error::AtlasError;
use crate::link::{LinkConfig, SensorLink};

/// A link over `/dev/i2c-<bus_id>` that sleeps the calling thread between
/// command and reply.
pub type LinuxSensorLink = SensorLink<LinuxI2cBus, StdDelay>;

/// Opens `/dev/i2c-<bus_id>` and binds it to `config.address`.
pub fn open_link(bus_id: u8, config: LinkConfig) -> Result<LinuxSensorLink, AtlasError<io::Error>> {
    let bus = LinuxI2cBus::open(bus_id)?;
    SensorLink::new(bus, StdDelay, config)
}
