//! Mock transmitter for deterministic testing of the hop loop.
//!
//! [`MockTransmitter`] implements [`Transmitter`] by recording every call
//! instead of touching hardware. `transmit()` returns immediately, so tests
//! run at full speed regardless of the configured dwell time.
//!
//! # Example
//!
//! ```
//! use floodair_test_harness::MockTransmitter;
//!
//! let mut mock = MockTransmitter::new();
//! mock.fail_after(3);
//! assert!(mock.tuned().is_empty());
//! ```

use async_trait::async_trait;
use std::time::Duration;

use floodair_core::error::{Error, Result};
use floodair_core::transmitter::Transmitter;

/// A recording [`Transmitter`] for tests.
#[derive(Debug, Default)]
pub struct MockTransmitter {
    /// Every frequency passed to `tune()`, in order.
    tuned: Vec<f64>,
    /// Every dwell passed to `transmit()`, in order.
    transmitted: Vec<Duration>,
    /// Number of `stop()` calls.
    stops: usize,
    /// Fail `tune()` once this many tunes have succeeded.
    fail_after: Option<usize>,
}

impl MockTransmitter {
    /// Create a mock that accepts every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `tune()` fail with [`Error::Transmit`] after `n` successful tunes.
    pub fn fail_after(&mut self, n: usize) {
        self.fail_after = Some(n);
    }

    /// Frequencies tuned so far, in hertz.
    pub fn tuned(&self) -> &[f64] {
        &self.tuned
    }

    /// Dwell times transmitted so far.
    pub fn transmitted(&self) -> &[Duration] {
        &self.transmitted
    }

    /// Number of times `stop()` was called.
    pub fn stops(&self) -> usize {
        self.stops
    }
}

#[async_trait]
impl Transmitter for MockTransmitter {
    async fn tune(&mut self, freq_hz: f64) -> Result<()> {
        if self.fail_after.is_some_and(|n| self.tuned.len() >= n) {
            return Err(Error::Transmit(format!(
                "mock failure tuning {freq_hz} Hz"
            )));
        }
        self.tuned.push(freq_hz);
        Ok(())
    }

    async fn transmit(&mut self, dwell: Duration) -> Result<()> {
        self.transmitted.push(dwell);
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        self.stops += 1;
        Ok(())
    }

    fn center_freq(&self) -> Option<f64> {
        self.tuned.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_records_tunes_and_dwells() {
        let mut mock = MockTransmitter::new();
        mock.tune(915e6).await.unwrap();
        mock.transmit(Duration::from_millis(10)).await.unwrap();
        mock.tune(916e6).await.unwrap();

        assert_eq!(mock.tuned(), &[915e6, 916e6]);
        assert_eq!(mock.transmitted(), &[Duration::from_millis(10)]);
        assert_eq!(mock.center_freq(), Some(916e6));
    }

    #[tokio::test]
    async fn mock_starts_untuned() {
        let mock = MockTransmitter::new();
        assert_eq!(mock.center_freq(), None);
        assert_eq!(mock.stops(), 0);
    }

    #[tokio::test]
    async fn mock_fails_after_limit() {
        let mut mock = MockTransmitter::new();
        mock.fail_after(1);
        mock.tune(1e6).await.unwrap();

        let result = mock.tune(2e6).await;
        assert!(matches!(result.unwrap_err(), Error::Transmit(_)));
        assert_eq!(mock.tuned(), &[1e6]);
    }

    #[tokio::test]
    async fn mock_counts_stops() {
        let mut mock = MockTransmitter::new();
        mock.stop().await.unwrap();
        mock.stop().await.unwrap();
        assert_eq!(mock.stops(), 2);
    }
}
