//! Iteration policy for a bounded sequence.
//!
//! [`IterationMode`] is the discriminant a [`Range`](crate::Range) dispatches
//! on. Each mode has a stable display name and a numeric code, used only for
//! logging and config round-trips.

use std::fmt;
use std::str::FromStr;

/// How a [`Range`](crate::Range) advances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IterationMode {
    /// Yield `start` exactly once per cycle.
    Once,
    /// Yield `start` repeatedly, bounded by an explicit iteration budget.
    Static,
    /// Never yield. A pause layered over the range's resume mode.
    Stopped,
    /// Yield uniformly sampled values inside `[start, end]`.
    Random,
    /// Yield evenly stepped values from `start` to `end`.
    #[default]
    Sequence,
}

/// All modes in code order.
const ALL_MODES: &[IterationMode] = &[
    IterationMode::Once,
    IterationMode::Static,
    IterationMode::Stopped,
    IterationMode::Random,
    IterationMode::Sequence,
];

impl IterationMode {
    /// Returns the canonical lower-case name (e.g. `"sequence"`).
    pub fn name(&self) -> &'static str {
        match self {
            IterationMode::Once => "once",
            IterationMode::Static => "static",
            IterationMode::Stopped => "stopped",
            IterationMode::Random => "random",
            IterationMode::Sequence => "sequence",
        }
    }

    /// Returns the numeric code of this mode.
    pub fn code(&self) -> u8 {
        match self {
            IterationMode::Once => 0,
            IterationMode::Static => 1,
            IterationMode::Stopped => 2,
            IterationMode::Random => 3,
            IterationMode::Sequence => 4,
        }
    }

    /// Look up a mode by its numeric code.
    pub fn from_code(code: u8) -> Option<IterationMode> {
        ALL_MODES.iter().copied().find(|m| m.code() == code)
    }

    /// Returns a slice of all modes in code order.
    pub fn all() -> &'static [IterationMode] {
        ALL_MODES
    }
}

impl fmt::Display for IterationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when a string cannot be parsed into an [`IterationMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError(String);

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown iteration mode: '{}'. Expected: once, static, stopped, random, sequence or 0-4",
            self.0
        )
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for IterationMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return IterationMode::from_code(code).ok_or_else(|| ParseModeError(s.to_string()));
        }
        match trimmed.to_lowercase().as_str() {
            "once" | "one" => Ok(IterationMode::Once),
            "static" => Ok(IterationMode::Static),
            "stopped" | "stop" => Ok(IterationMode::Stopped),
            "random" => Ok(IterationMode::Random),
            "sequence" => Ok(IterationMode::Sequence),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

impl TryFrom<u8> for IterationMode {
    type Error = ParseModeError;

    fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
        IterationMode::from_code(code).ok_or_else(|| ParseModeError(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(IterationMode::Once.code(), 0);
        assert_eq!(IterationMode::Static.code(), 1);
        assert_eq!(IterationMode::Stopped.code(), 2);
        assert_eq!(IterationMode::Random.code(), 3);
        assert_eq!(IterationMode::Sequence.code(), 4);
    }

    #[test]
    fn from_code_unknown() {
        assert_eq!(IterationMode::from_code(5), None);
        assert!(IterationMode::try_from(200u8).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(IterationMode::Sequence.to_string(), "sequence");
        assert_eq!(IterationMode::Stopped.to_string(), "stopped");
    }

    #[test]
    fn from_str_accepts_names_and_codes() {
        assert_eq!("RANDOM".parse::<IterationMode>(), Ok(IterationMode::Random));
        assert_eq!("stop".parse::<IterationMode>(), Ok(IterationMode::Stopped));
        assert_eq!("1".parse::<IterationMode>(), Ok(IterationMode::Static));
        assert!("sideways".parse::<IterationMode>().is_err());
        assert!("9".parse::<IterationMode>().is_err());
    }

    #[test]
    fn name_and_code_round_trip() {
        for &mode in IterationMode::all() {
            assert_eq!(mode.to_string().parse::<IterationMode>(), Ok(mode));
            assert_eq!(IterationMode::from_code(mode.code()), Some(mode));
        }
    }

    #[test]
    fn default_is_sequence() {
        assert_eq!(IterationMode::default(), IterationMode::Sequence);
    }
}
