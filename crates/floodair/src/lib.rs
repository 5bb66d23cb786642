//! # floodair -- Scripted Frequency Hopping for SDR Transmitters
//!
//! `floodair` generates frequency sequences from a compact descriptor
//! language and hops a transmit chain across them. It is meant for bench
//! testing receivers, spectrum monitors, and interference detectors against
//! a repeatable hopping pattern.
//!
//! ## Quick Start
//!
//! Walk one cycle of a descriptor:
//!
//! ```
//! use floodair::Ranger;
//!
//! let mut ranger = Ranger::parse("900-901_0.5,915").unwrap();
//! let cycle: Vec<f64> = ranger.values().collect();
//! assert_eq!(cycle, vec![900.0, 900.5, 901.0, 915.0]);
//! ```
//!
//! Hop a transmitter across it:
//!
//! ```no_run
//! use floodair::{HopConfig, HopperBuilder, Transmitter};
//!
//! # async fn example<T: Transmitter>(tx: T) -> floodair::Result<()> {
//! let config = HopConfig::load("config.yaml")?;
//! let mut hopper = HopperBuilder::from_config(&config, tx)?.build()?;
//! let cycles = hopper.run().await?;
//! println!("{cycles} cycles");
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! | Crate                   | Purpose                                          |
//! |-------------------------|--------------------------------------------------|
//! | `floodair-core`         | [`Range`], [`Ranger`], descriptors, [`Transmitter`], errors |
//! | `floodair-hopper`       | Strategies, YAML config, the async hop loop      |
//! | `floodair-test-harness` | `MockTransmitter` for tests                      |
//! | **`floodair`**          | This facade crate -- re-exports everything       |
//!
//! ## Descriptor Language
//!
//! A descriptor is a comma-separated list of tokens:
//!
//! | Token               | Meaning                                            |
//! |---------------------|----------------------------------------------------|
//! | `5`                 | The single value 5, once per cycle                 |
//! | `1-10`              | 1 to 10 in steps of 0.1                            |
//! | `1-10_0.5`          | 1 to 10 in steps of 0.5                            |
//! | `r:1-10_0.5`        | As many random values in 1..=10 as the steps give  |
//! | `1-10_0.5;2`        | Wait 2 seconds after every value of this token     |
//!
//! Values are rounded to three decimals. After the last value of the last
//! token, the generator reports one [`Step::Exhausted`] and starts over.
//!
//! ## Event Subscription
//!
//! The hop loop emits [`HopEvent`]s through a broadcast channel:
//!
//! ```no_run
//! use floodair::{HopEvent, Hopper, Transmitter};
//! # async fn example<T: Transmitter>(hopper: &Hopper<T>) {
//! let mut events = hopper.subscribe();
//! while let Ok(event) = events.recv().await {
//!     if let HopEvent::Tuned { freq_hz, .. } = event {
//!         println!("{}", floodair::format_freq_mhz(freq_hz));
//!     }
//! }
//! # }
//! ```

pub use floodair_core::*;

pub use floodair_hopper::{
    ChannelGrid, ConfigOverrides, Dwell, EntropyBounds, HopConfig, HopOutcome, HopStrategy, Hopper,
    HopperBuilder, ParseStrategyError,
};

/// Hop strategies, configuration, and the hop loop.
pub mod hopper {
    pub use floodair_hopper::*;
}
