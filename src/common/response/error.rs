// src/common/response/error.rs

/// Error type specific to reply decoding.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ReplyParseError {
    /// Nothing left after stripping NUL bytes, so there is no status byte.
    #[error("reply contained no status byte")]
    EmptyReply,

    /// More payload than a single reply can hold.
    #[error("reply payload longer than {max} bytes")]
    PayloadTooLong { max: usize },
}
