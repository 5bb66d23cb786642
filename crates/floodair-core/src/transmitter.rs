//! Transmitter trait -- the seam to the external signal chain.
//!
//! floodair only produces frequencies and timing. Whatever actually
//! radiates (a SoapySDR/osmocom sink, a GNU Radio flow graph, a dry-run
//! logger) implements [`Transmitter`]; gain tables, waveform synthesis, and
//! device argument strings stay on that side of the trait.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Asynchronous control of a transmit chain.
#[async_trait]
pub trait Transmitter: Send {
    /// Retune the chain to `freq_hz`.
    async fn tune(&mut self, freq_hz: f64) -> Result<()>;

    /// Transmit on the current frequency for `dwell`, then go quiet.
    async fn transmit(&mut self, dwell: Duration) -> Result<()>;

    /// Stop transmitting and release the chain.
    ///
    /// Must be safe to call more than once.
    async fn stop(&mut self) -> Result<()>;

    /// The last frequency the chain was tuned to, if any.
    fn center_freq(&self) -> Option<f64>;
}
