// src/common/types.rs

use core::fmt;

// --- Temperature used for compensation (`T,<value>`) ---

/// A temperature in thousandths of a degree Celsius.
///
/// This is the native resolution of the 1-Wire driver (`t=23125`) and is kept
/// as an integer so the value can be formatted for the wire without floats.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Temperature(i32);

impl Temperature {
    pub const fn from_millidegrees(millidegrees: i32) -> Self {
        Self(millidegrees)
    }

    pub const fn as_millidegrees(&self) -> i32 {
        self.0
    }

    pub fn as_celsius(&self) -> f32 {
        self.0 as f32 / 1000.0
    }
}

/// Formats as fixed-point degrees, e.g. `23.125` or `-0.500`.
impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.unsigned_abs();
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:03}", sign, magnitude / 1000, magnitude % 1000)
    }
}
