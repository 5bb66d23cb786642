//! Numeric and formatting helpers shared across floodair crates.

use std::time::Duration;

/// Hertz per megahertz. Descriptor values are conventionally in MHz and
/// are multiplied by this before being handed to a transmitter.
pub const MHZ: f64 = 1_000_000.0;

/// Round to three decimal places (half away from zero).
///
/// # Example
///
/// ```
/// use floodair_core::round3;
///
/// assert_eq!(round3(1.23456), 1.235);
/// assert_eq!(round3(-0.0004), -0.0);
/// ```
pub fn round3(value: f64) -> f64 {
    (value * 1_000.0).round() / 1_000.0
}

/// Format a frequency in hertz as a human-readable MHz string.
///
/// # Example
///
/// ```
/// use floodair_core::format_freq_mhz;
///
/// assert_eq!(format_freq_mhz(915_000_000.0), "915.000000 MHz");
/// ```
pub fn format_freq_mhz(freq_hz: f64) -> String {
    let mhz = freq_hz / MHZ;
    format!("{mhz:.6} MHz")
}

/// Block the current thread for `pause`. Zero pauses return immediately.
pub fn pace(pause: Duration) {
    if !pause.is_zero() {
        std::thread::sleep(pause);
    }
}
