// src/linux/delay.rs

use std::thread;
use std::time::Duration;

use crate::common::hal_traits::AtlasDelay;

/// Blocks the calling thread with [`thread::sleep`].
#[derive(Debug, Default, Copy, Clone)]
pub struct StdDelay;

impl AtlasDelay for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
