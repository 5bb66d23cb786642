//! Hop loop event types.
//!
//! Events are emitted by the hop loop through a `tokio::sync::broadcast`
//! channel. Slow subscribers may miss events; the loop never waits for them.

use std::time::Duration;

/// An event emitted by the hop loop.
#[derive(Debug, Clone, PartialEq)]
pub enum HopEvent {
    /// The transmitter was retuned and keyed.
    Tuned {
        /// New center frequency in hertz.
        freq_hz: f64,
        /// How long it transmitted there.
        dwell: Duration,
    },

    /// A full cycle over every subrange completed.
    CycleComplete {
        /// Number of cycles completed so far (1-based).
        cycle: u64,
    },

    /// The loop stopped the transmitter and returned.
    Stopped,
}
