// src/link/sensor_link/mod.rs

mod io_helpers;

use crate::common::{
    address::DeviceAddress,
    command::{Command, WaitPolicy},
    error::AtlasError,
    hal_traits::{AtlasBus, AtlasDelay},
    response::DecodedReading,
    timing,
};

use super::config::LinkConfig;

/// Command/response link to one EZO circuit.
///
/// Every exchange is write, wait, read, performed synchronously on the calling
/// thread. Methods take `&mut self`; sharing a link between threads needs one
/// lock held across the whole [`query`](Self::query).
///
/// The link is `Open` from construction until [`close`](Self::close), after
/// which every operation fails with [`AtlasError::ClosedHandle`]. Dropping an
/// open link closes it.
#[derive(Debug)]
pub struct SensorLink<B, D>
where
    B: AtlasBus,
{
    bus: Option<B>,
    delay: D,
    config: LinkConfig,
}

impl<B, D> SensorLink<B, D>
where
    B: AtlasBus,
    D: AtlasDelay,
{
    /// Binds `bus` to `config.address` and takes ownership of it.
    pub fn new(mut bus: B, delay: D, config: LinkConfig) -> Result<Self, AtlasError<B::Error>> {
        let address = config.address;
        bus.set_address(address)
            .map_err(|e| AtlasError::AddressBind {
                address: address.as_u8(),
                cause: Some(e),
            })?;

        #[cfg(feature = "tracing")]
        tracing::debug!(%address, "sensor link open");

        Ok(SensorLink {
            bus: Some(bus),
            delay,
            config,
        })
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Address the bus handle is currently bound to.
    pub fn address(&self) -> DeviceAddress {
        self.config.address
    }

    /// The bus handle, unless the link has been closed.
    pub fn bus(&self) -> Option<&B> {
        self.bus.as_ref()
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    pub fn is_closed(&self) -> bool {
        self.bus.is_none()
    }

    /// Points the existing handle at another device on the same bus.
    ///
    /// Values above 127 are rejected before touching the bus, so the current
    /// binding stays valid.
    pub fn rebind_address(&mut self, address: u8) -> Result<(), AtlasError<B::Error>> {
        let bus = self.bus_mut()?;
        let new_address = DeviceAddress::new(address).map_err(|_| AtlasError::AddressBind {
            address,
            cause: None,
        })?;

        bus.set_address(new_address)
            .map_err(|e| AtlasError::AddressBind {
                address,
                cause: Some(e),
            })?;

        #[cfg(feature = "tracing")]
        tracing::debug!(from = %self.config.address, to = %new_address, "rebound device address");

        self.config.address = new_address;
        Ok(())
    }

    /// Sends `command` followed by a single NUL terminator.
    ///
    /// Nothing is acknowledged at this level: a `WriteFault` means the device
    /// may or may not have received the command.
    pub fn write(&mut self, command: &Command) -> Result<(), AtlasError<B::Error>> {
        let frame = command.frame();

        #[cfg(feature = "tracing")]
        tracing::trace!(command = command.as_str(), bytes = frame.len(), "write");

        self.send_frame(&frame)
    }

    /// Reads and decodes a reply of the configured length.
    pub fn read(&mut self) -> Result<DecodedReading, AtlasError<B::Error>> {
        self.read_bytes(self.config.reply_len)
    }

    /// Reads up to `max_bytes` in one transaction and decodes them.
    pub fn read_bytes(&mut self, max_bytes: usize) -> Result<DecodedReading, AtlasError<B::Error>> {
        if max_bytes > timing::REPLY_LEN {
            return Err(AtlasError::BufferOverflow {
                needed: max_bytes,
                got: timing::REPLY_LEN,
            });
        }

        let mut buffer = [0u8; timing::REPLY_LEN];
        let raw = self.receive_raw(&mut buffer[..max_bytes])?;
        let reading = Self::decode(raw)?;

        #[cfg(feature = "tracing")]
        log_reading(self.config.address, &reading);

        Ok(reading)
    }

    /// Writes `command`, waits as long as the command needs, and reads the reply.
    ///
    /// `Sleep` commands return [`DecodedReading::Asleep`] without reading,
    /// since a sleeping circuit does not answer.
    ///
    /// A failed write does not end the exchange: the circuit may still have
    /// received the command, so the wait and read happen anyway. The reading
    /// is returned if it decodes; otherwise the `WriteFault` is.
    pub fn query(&mut self, command: &Command) -> Result<DecodedReading, AtlasError<B::Error>> {
        let write_fault = match self.write(command) {
            Ok(()) => None,
            Err(AtlasError::WriteFault(e)) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(command = command.as_str(), error = ?e, "write failed, reading anyway");

                Some(e)
            }
            Err(e) => return Err(e),
        };

        let policy = command.wait_policy();

        #[cfg(feature = "tracing")]
        tracing::debug!(command = command.as_str(), ?policy, "query");

        match policy {
            WaitPolicy::NoReply => {
                return match write_fault {
                    Some(e) => Err(AtlasError::WriteFault(e)),
                    None => Ok(DecodedReading::Asleep),
                }
            }
            WaitPolicy::Long => self.pause(self.config.long_delay),
            WaitPolicy::Short => self.pause(self.config.short_delay),
        }

        match (self.read(), write_fault) {
            (Ok(reading), _) => Ok(reading),
            (Err(_), Some(e)) => Err(AtlasError::WriteFault(e)),
            (Err(e), None) => Err(e),
        }
    }

    /// Validates `command` and runs [`query`](Self::query).
    pub fn query_str(&mut self, command: &str) -> Result<DecodedReading, AtlasError<B::Error>> {
        let command = Command::new(command)?;
        self.query(&command)
    }
}

impl<B, D> SensorLink<B, D>
where
    B: AtlasBus,
{
    /// Releases the bus handle. Calling it again does nothing.
    pub fn close(&mut self) {
        if let Some(bus) = self.bus.take() {
            bus.release();

            #[cfg(feature = "tracing")]
            tracing::debug!(address = %self.config.address, "sensor link closed");
        }
    }
}

impl<B, D> Drop for SensorLink<B, D>
where
    B: AtlasBus,
{
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(feature = "tracing")]
fn log_reading(address: DeviceAddress, reading: &DecodedReading) {
    match reading {
        DecodedReading::DeviceError(code) => {
            tracing::warn!(%address, %code, "device reported an error")
        }
        _ => tracing::trace!(%address, %reading, "reply decoded"),
    }
}
