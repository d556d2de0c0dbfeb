// src/linux/i2c_bus.rs

use std::format;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use crate::common::{address::DeviceAddress, error::AtlasError, hal_traits::AtlasBus};

/// `ioctl` request from `<linux/i2c-dev.h>` selecting the target address.
pub const I2C_SLAVE: u16 = 0x0703;

/// Device node of an i2c-dev bus, e.g. bus `1` → `/dev/i2c-1`.
pub fn device_path(bus_id: u8) -> PathBuf {
    PathBuf::from(format!("/dev/i2c-{}", bus_id))
}

/// An i2c-dev bus opened twice, once for reading and once for writing, with
/// both descriptors bound to the same device address.
#[derive(Debug)]
pub struct LinuxI2cBus {
    path: PathBuf,
    reader: File,
    writer: File,
    address: Option<DeviceAddress>,
}

impl LinuxI2cBus {
    /// Opens `/dev/i2c-<bus_id>`. The handle is not bound to any address yet.
    pub fn open(bus_id: u8) -> Result<Self, AtlasError<io::Error>> {
        Self::open_path(device_path(bus_id))
    }

    pub fn open_path(path: impl AsRef<Path>) -> Result<Self, AtlasError<io::Error>> {
        let path = path.as_ref().to_path_buf();
        let reader = OpenOptions::new()
            .read(true)
            .open(&path)
            .map_err(AtlasError::BusOpen)?;
        let writer = OpenOptions::new()
            .write(true)
            .open(&path)
            .map_err(AtlasError::BusOpen)?;

        tracing::debug!(path = %path.display(), "opened i2c bus");

        Ok(LinuxI2cBus {
            path,
            reader,
            writer,
            address: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Address both descriptors are bound to, once bound.
    pub fn address(&self) -> Option<DeviceAddress> {
        self.address
    }
}

fn bind(file: &File, address: DeviceAddress) -> io::Result<()> {
    // SAFETY: I2C_SLAVE takes the address as a plain integer argument and the
    // descriptor stays open for the duration of the call.
    let rc = unsafe {
        libc::ioctl(
            file.as_raw_fd(),
            I2C_SLAVE as _,
            libc::c_ulong::from(address.as_u8()),
        )
    };
    if rc < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Channel {
    Reader,
    Writer,
}

/// Binds the reader, then the writer, to `address`.
///
/// Returns the address both channels agree on afterwards together with the
/// outcome. If the writer refuses, the reader goes back to `previous`; if that
/// fails too the channels are split and no common address is reported.
fn bind_both<F>(
    previous: Option<DeviceAddress>,
    address: DeviceAddress,
    mut bind: F,
) -> (Option<DeviceAddress>, io::Result<()>)
where
    F: FnMut(Channel, DeviceAddress) -> io::Result<()>,
{
    if let Err(e) = bind(Channel::Reader, address) {
        return (previous, Err(e));
    }
    let Err(e) = bind(Channel::Writer, address) else {
        return (Some(address), Ok(()));
    };

    let settled = match previous {
        Some(previous) => match bind(Channel::Reader, previous) {
            Ok(()) => Some(previous),
            Err(rollback) => {
                tracing::warn!(
                    %address,
                    %previous,
                    error = %rollback,
                    "reader could not be restored; channels now address different devices"
                );
                None
            }
        },
        None => None,
    };
    (settled, Err(e))
}

fn into_nb(e: io::Error) -> nb::Error<io::Error> {
    match e.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => nb::Error::WouldBlock,
        _ => nb::Error::Other(e),
    }
}

impl AtlasBus for LinuxI2cBus {
    type Error = io::Error;

    fn set_address(&mut self, address: DeviceAddress) -> Result<(), Self::Error> {
        let (reader, writer) = (&self.reader, &self.writer);
        let (settled, result) = bind_both(self.address, address, |channel, addr| match channel {
            Channel::Reader => bind(reader, addr),
            Channel::Writer => bind(writer, addr),
        });
        self.address = settled;
        result
    }

    fn write(&mut self, bytes: &[u8]) -> nb::Result<(), Self::Error> {
        // One write(2) is one I2C transaction; a partial write is a fault.
        match self.writer.write(bytes) {
            Ok(n) if n == bytes.len() => Ok(()),
            Ok(n) => Err(nb::Error::Other(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short write: {} of {} bytes", n, bytes.len()),
            ))),
            Err(e) => Err(into_nb(e)),
        }
    }

    fn read(&mut self, buffer: &mut [u8]) -> nb::Result<usize, Self::Error> {
        self.reader.read(buffer).map_err(into_nb)
    }

    fn release(self) {
        let LinuxI2cBus {
            path,
            reader,
            writer,
            address,
        } = self;
        drop(writer);
        drop(reader);

        tracing::debug!(path = %path.display(), ?address, "closed i2c bus");
    }
}
