// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod address;
pub mod command;
pub mod error;
pub mod hal_traits;
pub mod response;
pub mod timing;
pub mod types;

#[cfg(feature = "impl-hal")]
pub mod hal_adapter;

// --- Re-export key types/traits/functions for easier access ---

// From address.rs
pub use address::DeviceAddress;

// From command.rs
pub use command::{CalibrationPoint, Command, CommandError, WaitPolicy};

// From error.rs
pub use error::AtlasError;

// From hal_traits.rs
pub use hal_traits::{AtlasBus, AtlasDelay};

// From response/mod.rs (and its sub-modules via its own `pub use`)
pub use response::{decode_reply, DecodedReading, ReplyParseError, ReplyText, StatusCode};

// From types.rs
pub use types::Temperature;

// Timing constants stay under common::timing::*

#[cfg(feature = "impl-hal")]
pub use hal_adapter::{HalBus, HalDelay};
