//! Hopping strategies.
//!
//! Every strategy is expressed as a descriptor for the shared generator,
//! so constant, sweep, and random hopping all run through the same
//! [`Ranger`](floodair_core::Ranger).

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use floodair_core::error::{Error, Result};

use crate::config::HopConfig;
use crate::hopper::ChannelGrid;

/// How the hop loop walks the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "StrategyRepr")]
pub enum HopStrategy {
    /// Sit on `freq_center`.
    Constant,
    /// Step from `freq_center` to `freq_max` by `freq_delta`, then repeat.
    Sweep,
    /// Jump to random frequencies between `freq_center` and `freq_max`.
    Hop,
    /// Follow the `ranges` descriptor verbatim.
    Ranger,
}

const ALL_STRATEGIES: &[HopStrategy] = &[
    HopStrategy::Constant,
    HopStrategy::Sweep,
    HopStrategy::Hop,
    HopStrategy::Ranger,
];

impl HopStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            HopStrategy::Constant => "constant",
            HopStrategy::Sweep => "sweep",
            HopStrategy::Hop => "hop",
            HopStrategy::Ranger => "ranger",
        }
    }

    /// Numeric code as used by the `hopper:` config key.
    pub fn code(&self) -> u8 {
        match self {
            HopStrategy::Constant => 1,
            HopStrategy::Sweep => 2,
            HopStrategy::Hop => 3,
            HopStrategy::Ranger => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<HopStrategy> {
        ALL_STRATEGIES.iter().copied().find(|s| s.code() == code)
    }

    pub fn all() -> &'static [HopStrategy] {
        ALL_STRATEGIES
    }

    /// Build the generator descriptor for this strategy from `config`.
    ///
    /// Frequencies stay in the config's unit (MHz); the hop loop scales them.
    pub fn descriptor(&self, config: &HopConfig) -> Result<String> {
        match self {
            HopStrategy::Constant => Ok(format!("{}", required_center(config)?)),
            HopStrategy::Sweep => {
                let (center, max) = required_band(config)?;
                Ok(format!("{center}-{max}_{}", config.freq_delta))
            }
            HopStrategy::Hop => {
                let (center, max) = required_band(config)?;
                Ok(format!("r:{center}-{max}_{}", config.freq_delta))
            }
            HopStrategy::Ranger => config
                .ranges
                .clone()
                .ok_or_else(|| Error::Config("ranger strategy requires 'ranges'".into())),
        }
    }

    /// Channel grid that generated values are snapped to.
    ///
    /// Only [`HopStrategy::Hop`] has one: random picks land on
    /// `freq_center + k * freq_delta` channels up to `freq_max`.
    pub fn channel_grid(&self, config: &HopConfig) -> Result<Option<ChannelGrid>> {
        match self {
            HopStrategy::Hop => {
                let (center, max) = required_band(config)?;
                ChannelGrid::new(center, config.freq_delta, max).map(Some)
            }
            _ => Ok(None),
        }
    }
}

fn required_center(config: &HopConfig) -> Result<f64> {
    config
        .freq_center
        .ok_or_else(|| Error::Config("freq_center is required".into()))
}

fn required_band(config: &HopConfig) -> Result<(f64, f64)> {
    let center = required_center(config)?;
    let max = config
        .freq_max
        .ok_or_else(|| Error::Config("freq_max is required".into()))?;
    Ok((center, max))
}

impl fmt::Display for HopStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when a string or code does not name a [`HopStrategy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStrategyError(String);

impl fmt::Display for ParseStrategyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown hopper: '{}'. Expected: 1 constant, 2 sweep, 3 hop, 4 ranger",
            self.0
        )
    }
}

impl std::error::Error for ParseStrategyError {}

impl FromStr for HopStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return HopStrategy::from_code(code).ok_or_else(|| ParseStrategyError(s.to_string()));
        }
        match trimmed.to_lowercase().as_str() {
            "constant" => Ok(HopStrategy::Constant),
            "sweep" | "sweeping" => Ok(HopStrategy::Sweep),
            "hop" | "hopping" => Ok(HopStrategy::Hop),
            "ranger" | "ranges" => Ok(HopStrategy::Ranger),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

/// Config representation: either `hopper: 2` or `hopper: sweep`.
#[derive(Deserialize)]
#[serde(untagged)]
enum StrategyRepr {
    Code(u8),
    Name(String),
}

impl TryFrom<StrategyRepr> for HopStrategy {
    type Error = ParseStrategyError;

    fn try_from(repr: StrategyRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            StrategyRepr::Code(code) => {
                HopStrategy::from_code(code).ok_or_else(|| ParseStrategyError(code.to_string()))
            }
            StrategyRepr::Name(name) => name.parse(),
        }
    }
}
