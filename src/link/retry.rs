// src/link/retry.rs

//! Caller-side retry around whole queries.
//!
//! The link itself never retries. A policy here re-runs an operation only for
//! faults [`AtlasError::is_retryable`] accepts, waiting a fixed back-off
//! before each new attempt.

use core::time::Duration;

use crate::common::{
    command::Command,
    error::AtlasError,
    hal_traits::{AtlasBus, AtlasDelay},
    response::DecodedReading,
    timing,
};

use super::sensor_link::SensorLink;

/// Bounded retry with a fixed back-off.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub retries: u8,
    /// Wait before every extra attempt.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const fn new(retries: u8, backoff: Duration) -> Self {
        RetryPolicy { retries, backoff }
    }

    /// A single attempt, no retries.
    pub const fn none() -> Self {
        RetryPolicy::new(0, Duration::ZERO)
    }

    /// Runs `op` until it succeeds, fails with a non-retryable error, or the
    /// attempts are used up. The last error is returned.
    pub fn run<T, E, D, F>(&self, delay: &mut D, mut op: F) -> Result<T, AtlasError<E>>
    where
        E: core::fmt::Debug,
        D: AtlasDelay,
        F: FnMut() -> Result<T, AtlasError<E>>,
    {
        let backoff_ms = timing::as_millis_u32(self.backoff);
        self.attempts(|attempt| {
            if attempt > 0 {
                delay.delay_ms(backoff_ms);
            }
            op()
        })
    }

    /// [`SensorLink::query`] under this policy, backing off with the link's
    /// own delay provider.
    pub fn query<B, D>(
        &self,
        link: &mut SensorLink<B, D>,
        command: &Command,
    ) -> Result<DecodedReading, AtlasError<B::Error>>
    where
        B: AtlasBus,
        D: AtlasDelay,
    {
        self.attempts(|attempt| {
            if attempt > 0 {
                link.pause(self.backoff);
            }
            link.query(command)
        })
    }

    /// The retry loop. `attempt` is passed to `op` starting at zero; every
    /// attempt after the first owes the back-off before touching the bus.
    fn attempts<T, E, F>(&self, mut op: F) -> Result<T, AtlasError<E>>
    where
        E: core::fmt::Debug,
        F: FnMut(u8) -> Result<T, AtlasError<E>>,
    {
        let mut attempt: u8 = 0;
        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.retries => {
                    attempt += 1;

                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = ?e, attempt, retries = self.retries, "retrying after back-off");
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// One retry after [`timing::RETRY_BACKOFF`].
impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(1, timing::RETRY_BACKOFF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::address::DeviceAddress;
    use crate::link::LinkConfig;
    use std::collections::VecDeque;
    use std::vec::Vec;

    #[derive(Default)]
    struct MockDelay {
        calls_ms: Vec<u32>,
    }

    impl AtlasDelay for MockDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.calls_ms.push(ms);
        }
    }

    /// Replays scripted read outcomes; `None` is a transport fault.
    #[derive(Default)]
    struct ScriptedBus {
        reads: VecDeque<Option<Vec<u8>>>,
        writes: usize,
    }

    impl AtlasBus for ScriptedBus {
        type Error = ();

        fn set_address(&mut self, _address: DeviceAddress) -> Result<(), Self::Error> {
            Ok(())
        }

        fn write(&mut self, _bytes: &[u8]) -> nb::Result<(), Self::Error> {
            self.writes += 1;
            Ok(())
        }

        fn read(&mut self, buffer: &mut [u8]) -> nb::Result<usize, Self::Error> {
            match self.reads.pop_front().flatten() {
                Some(reply) => {
                    buffer.fill(0);
                    buffer[..reply.len()].copy_from_slice(&reply);
                    Ok(buffer.len())
                }
                None => Err(nb::Error::Other(())),
            }
        }
    }

    fn link_with(reads: Vec<Option<Vec<u8>>>) -> SensorLink<ScriptedBus, MockDelay> {
        let bus = ScriptedBus { reads: reads.into(), writes: 0 };
        SensorLink::new(bus, MockDelay::default(), LinkConfig::new(DeviceAddress::EZO_PH)).unwrap()
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.retries, 1);
        assert_eq!(policy.backoff, Duration::from_secs(3));
    }

    #[test]
    fn test_run_retries_transport_faults() {
        let mut delay = MockDelay::default();
        let mut outcomes = VecDeque::from([Err(AtlasError::ReadFault(())), Ok(7)]);
        let result = RetryPolicy::default().run(&mut delay, || outcomes.pop_front().unwrap());
        assert_eq!(result.unwrap(), 7);
        assert_eq!(delay.calls_ms, [3000]);
    }

    #[test]
    fn test_run_gives_up_after_retries() {
        let mut delay = MockDelay::default();
        let mut calls = 0;
        let result: Result<(), _> = RetryPolicy::new(2, Duration::from_millis(10)).run(&mut delay, || {
            calls += 1;
            Err(AtlasError::<()>::EmptyReply)
        });
        assert!(matches!(result, Err(AtlasError::EmptyReply)));
        assert_eq!(calls, 3);
        assert_eq!(delay.calls_ms, [10, 10]);
    }

    #[test]
    fn test_run_does_not_retry_setup_errors() {
        let mut delay = MockDelay::default();
        let mut calls = 0;
        let result: Result<(), _> = RetryPolicy::default().run(&mut delay, || {
            calls += 1;
            Err(AtlasError::<()>::ClosedHandle)
        });
        assert!(matches!(result, Err(AtlasError::ClosedHandle)));
        assert_eq!(calls, 1);
        assert!(delay.calls_ms.is_empty());
    }

    #[test]
    fn test_query_retries_once_then_succeeds() {
        let mut link = link_with(std::vec![None, Some(b"\x016.98".to_vec())]);
        let reading = RetryPolicy::default().query(&mut link, &Command::reading()).unwrap();

        assert_eq!(reading.text(), Some("6.98"));
        assert_eq!(link.bus().map(|b| b.writes), Some(2));
        // Reading wait, back-off, reading wait.
        assert_eq!(link.delay().calls_ms, [1500, 3000, 1500]);
    }

    #[test]
    fn test_query_device_error_is_not_retried() {
        let mut link = link_with(std::vec![Some(std::vec![0x02])]);
        let reading = RetryPolicy::default().query(&mut link, &Command::reading()).unwrap();
        assert!(reading.is_device_error());
        assert_eq!(link.delay().calls_ms, [1500]);
    }

    #[test]
    fn test_query_setup_error_is_not_retried() {
        let mut link = link_with(std::vec![Some(b"\x017.00".to_vec())]);
        link.close();
        let result = RetryPolicy::new(3, Duration::from_millis(5)).query(&mut link, &Command::reading());
        assert!(matches!(result, Err(AtlasError::ClosedHandle)));
        assert!(link.delay().calls_ms.is_empty());
    }

    #[test]
    fn test_no_retry_policy() {
        let mut link = link_with(std::vec![None, Some(b"\x017.00".to_vec())]);
        let result = RetryPolicy::none().query(&mut link, &Command::reading());
        assert!(matches!(result, Err(AtlasError::ReadFault(()))));
    }
}
