//! Hop configuration, loaded from YAML and overridden from the command line.
//!
//! Frequencies are in MHz, times in seconds, matching the `config.yaml`
//! format the tool has always read:
//!
//! ```yaml
//! freq_center: 900
//! freq_max: 935
//! freq_delta: 0.5
//! hop_time: 0.01
//! hopper: sweep
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use floodair_core::Ranger;
use floodair_core::error::{Error, Result};

use crate::hopper::Dwell;
use crate::strategy::HopStrategy;

/// Inclusive bounds (seconds) for a randomized dwell time.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EntropyBounds {
    pub min: f64,
    pub max: f64,
}

/// Everything needed to build a [`Hopper`](crate::Hopper).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HopConfig {
    /// Lowest (or only) center frequency, MHz.
    pub freq_center: Option<f64>,
    /// Highest center frequency, MHz.
    pub freq_max: Option<f64>,
    /// Channel spacing for sweep and hop strategies, MHz.
    pub freq_delta: f64,
    /// Time spent transmitting on each frequency, seconds.
    pub hop_time: f64,
    /// Which strategy turns the settings above into a descriptor.
    pub hopper: HopStrategy,
    /// Descriptor used by [`HopStrategy::Ranger`].
    pub ranges: Option<String>,
    /// Reshuffle subranges each time one exhausts.
    pub shuffle: bool,
    /// Randomize the dwell time within these bounds instead of `hop_time`.
    pub entropy: Option<EntropyBounds>,
    /// Default pacing delay for descriptor tokens without `;<seconds>`.
    pub pacing_delay: f64,
    /// Stop after this many full cycles (run forever when absent).
    pub max_cycles: Option<u64>,
    /// Seed for every random source, for reproducible runs.
    pub seed: Option<u64>,
    /// Device argument string handed to the transmit chain untouched.
    #[serde(alias = "soapy_sdr")]
    pub device: Option<String>,
}

impl Default for HopConfig {
    fn default() -> Self {
        HopConfig {
            freq_center: None,
            freq_max: None,
            freq_delta: 1.0,
            hop_time: 0.01,
            hopper: HopStrategy::Hop,
            ranges: None,
            shuffle: false,
            entropy: None,
            pacing_delay: 0.0,
            max_cycles: None,
            seed: None,
            device: None,
        }
    }
}

/// Values supplied on the command line. `None` keeps the file's value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub freq_center: Option<f64>,
    pub freq_max: Option<f64>,
    pub freq_delta: Option<f64>,
    pub hop_time: Option<f64>,
    pub hopper: Option<HopStrategy>,
    pub ranges: Option<String>,
    pub max_cycles: Option<u64>,
    pub seed: Option<u64>,
    pub device: Option<String>,
}

impl HopConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<HopConfig> {
        serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read and parse a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<HopConfig> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Apply command-line overrides field by field.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(v) = overrides.freq_center {
            self.freq_center = Some(v);
        }
        if let Some(v) = overrides.freq_max {
            self.freq_max = Some(v);
        }
        if let Some(v) = overrides.freq_delta {
            self.freq_delta = v;
        }
        if let Some(v) = overrides.hop_time {
            self.hop_time = v;
        }
        if let Some(v) = overrides.hopper {
            self.hopper = v;
        }
        if let Some(v) = overrides.ranges {
            self.ranges = Some(v);
        }
        if let Some(v) = overrides.max_cycles {
            self.max_cycles = Some(v);
        }
        if let Some(v) = overrides.seed {
            self.seed = Some(v);
        }
        if let Some(v) = overrides.device {
            self.device = Some(v);
        }
    }

    /// Check the settings for internal consistency.
    pub fn validate(&self) -> Result<()> {
        if let Some(center) = self.freq_center {
            if !center.is_finite() || center < 0.0 {
                return Err(Error::Config(format!(
                    "freq_center must be a non-negative number, got {center}"
                )));
            }
        }
        if let (Some(center), Some(max)) = (self.freq_center, self.freq_max) {
            if !max.is_finite() || max < center {
                return Err(Error::Config(format!(
                    "freq_max ({max}) must not be below freq_center ({center})"
                )));
            }
        }
        if !(self.freq_delta.is_finite() && self.freq_delta > 0.0) {
            return Err(Error::Config(format!(
                "freq_delta must be positive, got {}",
                self.freq_delta
            )));
        }
        if !(self.hop_time.is_finite() && self.hop_time > 0.0) {
            return Err(Error::Config(format!(
                "hop_time must be positive, got {}",
                self.hop_time
            )));
        }
        if !(self.pacing_delay.is_finite() && self.pacing_delay >= 0.0) {
            return Err(Error::Config(format!(
                "pacing_delay must not be negative, got {}",
                self.pacing_delay
            )));
        }
        if let Some(bounds) = self.entropy {
            if !(bounds.min.is_finite() && bounds.max.is_finite())
                || bounds.min < 0.0
                || bounds.min > bounds.max
            {
                return Err(Error::Config(format!(
                    "entropy bounds must satisfy 0 <= min <= max, got {}..{}",
                    bounds.min, bounds.max
                )));
            }
        }
        Ok(())
    }

    /// The dwell policy these settings describe.
    pub fn dwell(&self) -> Result<Dwell> {
        Ok(match self.entropy {
            Some(bounds) => Dwell::Entropy {
                min: seconds("entropy.min", bounds.min)?,
                max: seconds("entropy.max", bounds.max)?,
            },
            None => Dwell::Fixed(seconds("hop_time", self.hop_time)?),
        })
    }

    /// Build the frequency generator these settings describe.
    pub fn ranger(&self) -> Result<Ranger> {
        self.validate()?;
        let descriptor = self.hopper.descriptor(self)?;
        tracing::debug!(hopper = %self.hopper, %descriptor, "building ranger from config");

        let mut builder = Ranger::builder()
            .randomize(self.shuffle)
            .pacing_delay(self.pacing()?);
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        builder.parse(&descriptor)
    }

    /// Default pacing delay as a [`Duration`].
    pub fn pacing(&self) -> Result<Duration> {
        seconds("pacing_delay", self.pacing_delay)
    }
}

fn seconds(name: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|_| Error::Config(format!("{name} is not a valid duration: {secs}")))
}
