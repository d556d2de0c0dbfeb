// src/link/sensor_link/io_helpers.rs

use super::SensorLink;
use crate::common::{
    error::AtlasError,
    hal_traits::{AtlasBus, AtlasDelay},
    response::{decode_reply, DecodedReading, ReplyParseError},
    timing,
};
use core::time::Duration;

// Implementation block for I/O related helpers
impl<B, D> SensorLink<B, D>
where
    B: AtlasBus,
    D: AtlasDelay,
{
    /// The bus handle, or `ClosedHandle` once the link has been closed.
    pub(super) fn bus_mut(&mut self) -> Result<&mut B, AtlasError<B::Error>> {
        self.bus.as_mut().ok_or(AtlasError::ClosedHandle)
    }

    /// Writes an already framed command in one transaction.
    pub(super) fn send_frame(&mut self, frame: &[u8]) -> Result<(), AtlasError<B::Error>> {
        let bus = self.bus_mut()?;
        nb::block!(bus.write(frame)).map_err(AtlasError::WriteFault)
    }

    /// Reads one reply into `buffer` and returns the filled part.
    ///
    /// Blocks until the bus produces data; there is no timeout.
    pub(super) fn receive_raw<'buf>(
        &mut self,
        buffer: &'buf mut [u8],
    ) -> Result<&'buf [u8], AtlasError<B::Error>> {
        let bus = self.bus_mut()?;
        let received = nb::block!(bus.read(buffer)).map_err(AtlasError::ReadFault)?;
        // A misbehaving bus must not make us index past the buffer.
        let received = received.min(buffer.len());
        Ok(&buffer[..received])
    }

    pub(super) fn decode(raw: &[u8]) -> Result<DecodedReading, AtlasError<B::Error>> {
        decode_reply(raw).map_err(|e| match e {
            ReplyParseError::EmptyReply => AtlasError::EmptyReply,
            ReplyParseError::PayloadTooLong { .. } => AtlasError::BufferOverflow {
                needed: raw.len(),
                got: timing::REPLY_LEN,
            },
        })
    }

    /// Blocks the calling thread for `delay`.
    pub(crate) fn pause(&mut self, delay: Duration) {
        self.delay.delay_ms(timing::as_millis_u32(delay));
    }
}
