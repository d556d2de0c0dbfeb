// src/lib.rs

#![no_std] // Specify no_std at the crate root

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod common;
pub mod link;

#[cfg(feature = "std")]
pub mod linux;

// Re-export key types for convenience
pub use common::{AtlasError, Command, DecodedReading, DeviceAddress};
pub use link::{LinkConfig, RetryPolicy, SensorLink};
