// src/common/error.rs

use super::command::CommandError;

/// Transport and setup failures of the protocol layer.
///
/// Device-reported errors are not part of this type: a reply whose status byte
/// is not `1` decodes successfully into [`DecodedReading::DeviceError`].
///
/// [`DecodedReading::DeviceError`]: crate::common::DecodedReading::DeviceError
#[derive(Debug, thiserror::Error)]
pub enum AtlasError<E = ()>
where
    E: core::fmt::Debug,
{
    /// The bus device node could not be opened.
    #[error("failed to open I2C bus: {0:?}")]
    BusOpen(E),

    /// The address is outside the 7-bit range or the platform rejected the bind.
    #[error("failed to bind device address {address:#04x} (cause: {cause:?})")]
    AddressBind { address: u8, cause: Option<E> },

    /// Writing the framed command failed. The device may or may not have seen it.
    #[error("write fault: {0:?}")]
    WriteFault(E),

    /// Reading the reply failed at the transport level.
    #[error("read fault: {0:?}")]
    ReadFault(E),

    /// Nothing but NUL bytes came back, so there is no status byte.
    #[error("empty reply from device")]
    EmptyReply,

    /// The link was closed; it cannot be used again.
    #[error("operation on a closed bus handle")]
    ClosedHandle,

    /// The command cannot be framed for the wire.
    #[error("invalid command: {0}")]
    InvalidCommand(#[from] CommandError),

    /// Requested read length exceeds the reply buffer.
    #[error("buffer overflow: needed {needed}, got {got}")]
    BufferOverflow { needed: usize, got: usize },
}

impl<E: core::fmt::Debug> AtlasError<E> {
    /// Faults a caller may reasonably retry after a back-off.
    ///
    /// Setup failures and misuse (bad address, bad command, closed handle)
    /// will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AtlasError::WriteFault(_) | AtlasError::ReadFault(_) | AtlasError::EmptyReply
        )
    }
}
