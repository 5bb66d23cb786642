//! HopperBuilder -- fluent builder for constructing [`Hopper`] instances.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use floodair_core::Ranger;
//! use floodair_hopper::{Dwell, HopperBuilder};
//! use floodair_test_harness::MockTransmitter;
//!
//! let hopper = HopperBuilder::new(MockTransmitter::new())
//!     .ranger(Ranger::parse("900-935_0.5").unwrap())
//!     .dwell(Dwell::Fixed(Duration::from_millis(10)))
//!     .max_cycles(3)
//!     .build()
//!     .unwrap();
//! assert_eq!(hopper.ranger().length(), 71);
//! ```

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::broadcast;

use floodair_core::Ranger;
use floodair_core::error::{Error, Result};
use floodair_core::helpers::MHZ;
use floodair_core::transmitter::Transmitter;

use crate::config::HopConfig;
use crate::hopper::{ChannelGrid, Dwell, Hopper};

/// Default capacity of the event broadcast channel.
const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Fluent builder for [`Hopper`].
pub struct HopperBuilder<T: Transmitter> {
    transmitter: T,
    ranger: Option<Ranger>,
    dwell: Dwell,
    unit_scale: f64,
    max_cycles: Option<u64>,
    grid: Option<ChannelGrid>,
    seed: Option<u64>,
    event_capacity: usize,
}

impl<T: Transmitter> HopperBuilder<T> {
    /// Create a builder around `transmitter`.
    ///
    /// Defaults: 10 ms fixed dwell, values in MHz, no cycle limit.
    pub fn new(transmitter: T) -> Self {
        HopperBuilder {
            transmitter,
            ranger: None,
            dwell: Dwell::Fixed(Duration::from_millis(10)),
            unit_scale: MHZ,
            max_cycles: None,
            grid: None,
            seed: None,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Configure everything from a validated [`HopConfig`].
    pub fn from_config(config: &HopConfig, transmitter: T) -> Result<Self> {
        let mut builder = HopperBuilder::new(transmitter)
            .ranger(config.ranger()?)
            .dwell(config.dwell()?);
        builder.max_cycles = config.max_cycles;
        builder.grid = config.hopper.channel_grid(config)?;
        builder.seed = config.seed;
        Ok(builder)
    }

    /// Set the frequency generator (required).
    pub fn ranger(mut self, ranger: Ranger) -> Self {
        self.ranger = Some(ranger);
        self
    }

    /// Set the dwell policy.
    pub fn dwell(mut self, dwell: Dwell) -> Self {
        self.dwell = dwell;
        self
    }

    /// Multiplier from generator values to hertz (default: [`MHZ`]).
    pub fn unit_scale(mut self, scale: f64) -> Self {
        self.unit_scale = scale;
        self
    }

    /// Stop [`run`](Hopper::run) after `cycles` full cycles.
    pub fn max_cycles(mut self, cycles: u64) -> Self {
        self.max_cycles = Some(cycles);
        self
    }

    /// Snap every generated value to the nearest channel of `grid`.
    pub fn channel_grid(mut self, grid: ChannelGrid) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Seed the dwell sampler for reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Capacity of the event broadcast channel (default: 64).
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Validate the configuration and construct the [`Hopper`].
    pub fn build(self) -> Result<Hopper<T>> {
        let ranger = self
            .ranger
            .ok_or_else(|| Error::InvalidParameter("ranger is required for build()".into()))?;
        if !(self.unit_scale.is_finite() && self.unit_scale > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "unit_scale must be positive, got {}",
                self.unit_scale
            )));
        }
        if self.event_capacity == 0 {
            return Err(Error::InvalidParameter(
                "event_capacity must be at least 1".into(),
            ));
        }
        if let Dwell::Entropy { min, max } = self.dwell {
            if min > max {
                return Err(Error::InvalidParameter(format!(
                    "entropy dwell min {min:?} exceeds max {max:?}"
                )));
            }
        }

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (events, _) = broadcast::channel(self.event_capacity);

        Ok(Hopper::new(
            ranger,
            self.transmitter,
            self.dwell,
            self.unit_scale,
            self.max_cycles,
            events,
            rng,
        )
        .with_channel_grid(self.grid))
    }
}
