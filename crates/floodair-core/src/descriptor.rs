//! Descriptor grammar for composed frequency sequences.
//!
//! A descriptor is a comma-separated list of tokens:
//!
//! ```text
//! token        := range_token | single_token
//! range_token  := ["r:"] NUMBER "-" NUMBER ["_" NUMBER] [";" NUMBER]
//! single_token := NUMBER [";" NUMBER]
//! NUMBER       := integer or decimal, e.g. "5", "5.25", ".5"
//! ```
//!
//! - `r:` makes the range random instead of stepped.
//! - `_<step>` sets the step of a range (default [`DEFAULT_STEP`]).
//! - `;<seconds>` sets the pacing delay of that token's subrange.
//!
//! # Example
//!
//! ```
//! use floodair_core::descriptor::{parse, SubrangeKind};
//!
//! let specs = parse("1-10_0.5,5;2").unwrap();
//! assert_eq!(specs.len(), 2);
//! assert_eq!(
//!     specs[0].kind,
//!     SubrangeKind::Span { start: 1.0, end: 10.0, delta: Some(0.5) }
//! );
//! assert_eq!(specs[1].kind, SubrangeKind::Single(5.0));
//! ```

use std::time::Duration;

use crate::error::{Error, Result};

/// Step used for a range token without an `_<step>` clause.
pub const DEFAULT_STEP: f64 = 0.1;

/// What a single token describes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubrangeKind {
    /// `start-end[_delta]`.
    Span {
        start: f64,
        end: f64,
        /// Explicit step, if the token had one.
        delta: Option<f64>,
    },
    /// A single fixed value.
    Single(f64),
}

/// One parsed descriptor token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubrangeSpec {
    pub kind: SubrangeKind,
    /// `true` when the token carried the `r:` prefix.
    pub random: bool,
    /// Pacing delay from a `;<seconds>` clause.
    pub pacing_delay: Option<Duration>,
}

impl SubrangeSpec {
    /// Step for a span token, falling back to [`DEFAULT_STEP`].
    pub fn step(&self) -> Option<f64> {
        match self.kind {
            SubrangeKind::Span { delta, .. } => Some(delta.unwrap_or(DEFAULT_STEP)),
            SubrangeKind::Single(_) => None,
        }
    }
}

/// Parse a whole descriptor.
///
/// A blank descriptor yields no specs. Any malformed token fails the whole
/// parse.
pub fn parse(descriptor: &str) -> Result<Vec<SubrangeSpec>> {
    if descriptor.trim().is_empty() {
        return Ok(Vec::new());
    }
    descriptor.split(',').map(parse_token).collect()
}

/// Parse one token (no commas).
pub fn parse_token(token: &str) -> Result<SubrangeSpec> {
    let raw = token;
    let token = token.trim();
    if token.is_empty() {
        return Err(invalid(raw, "empty token"));
    }

    let (body, pacing_delay) = match token.split_once(';') {
        Some((body, delay)) => {
            let delay = parse_number(delay)
                .ok()
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                .ok_or_else(|| invalid(raw, "bad pacing delay"))?;
            (body, Some(delay))
        }
        None => (token, None),
    };

    let (body, random) = match body.strip_prefix("r:") {
        Some(rest) => (rest, true),
        None => (body, false),
    };

    let (body, delta) = match body.split_once('_') {
        Some((body, step)) => {
            let step = parse_number(step).map_err(|_| invalid(raw, "bad step"))?;
            if step <= 0.0 {
                return Err(invalid(raw, "step must be positive"));
            }
            (body, Some(step))
        }
        None => (body, None),
    };

    let kind = match body.split_once('-') {
        Some((start, end)) => SubrangeKind::Span {
            start: parse_number(start).map_err(|_| invalid(raw, "bad range start"))?,
            end: parse_number(end).map_err(|_| invalid(raw, "bad range end"))?,
            delta,
        },
        None if random || delta.is_some() => {
            return Err(invalid(raw, "single value takes no step or random clause"));
        }
        None => SubrangeKind::Single(parse_number(body).map_err(|_| invalid(raw, "bad value"))?),
    };

    Ok(SubrangeSpec {
        kind,
        random,
        pacing_delay,
    })
}

/// Parse a NUMBER: ASCII digits with at most one decimal point.
///
/// A bare integer such as `"5"` is read as `5.0`.
pub fn parse_number(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let digits = trimmed.chars().filter(char::is_ascii_digit).count();
    let points = trimmed.chars().filter(|&c| c == '.').count();
    if digits == 0 || points > 1 || digits + points != trimmed.len() {
        return Err(Error::InvalidNumber(text.to_string()));
    }

    let normalized = if points == 0 {
        format!("{trimmed}.0")
    } else {
        trimmed.to_string()
    };
    normalized
        .parse::<f64>()
        .map_err(|_| Error::InvalidNumber(text.to_string()))
}

fn invalid(token: &str, reason: &str) -> Error {
    Error::InvalidDescriptor {
        token: token.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_accepts_integers_and_decimals() {
        assert_eq!(parse_number("5").unwrap(), 5.0);
        assert_eq!(parse_number("5.25").unwrap(), 5.25);
        assert_eq!(parse_number(".5").unwrap(), 0.5);
        assert_eq!(parse_number("7.").unwrap(), 7.0);
        assert_eq!(parse_number(" 12 ").unwrap(), 12.0);
    }

    #[test]
    fn parse_number_rejects_everything_else() {
        for bad in ["", ".", "abc", "1.2.3", "-5", "+5", "1e3", "nan", "inf", "5 MHz"] {
            assert!(
                matches!(parse_number(bad), Err(Error::InvalidNumber(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn range_token_with_all_clauses() {
        let spec = parse_token("r:3850-4075_10;1").unwrap();
        assert!(spec.random);
        assert_eq!(
            spec.kind,
            SubrangeKind::Span {
                start: 3850.0,
                end: 4075.0,
                delta: Some(10.0)
            }
        );
        assert_eq!(spec.pacing_delay, Some(Duration::from_secs(1)));
    }

    #[test]
    fn range_token_defaults() {
        let spec = parse_token("900-935").unwrap();
        assert!(!spec.random);
        assert_eq!(spec.pacing_delay, None);
        assert_eq!(spec.step(), Some(DEFAULT_STEP));
    }

    #[test]
    fn single_token() {
        let spec = parse_token("5;2.5").unwrap();
        assert_eq!(spec.kind, SubrangeKind::Single(5.0));
        assert_eq!(spec.pacing_delay, Some(Duration::from_millis(2500)));
        assert_eq!(spec.step(), None);
    }

    #[test]
    fn descriptor_splits_on_commas() {
        let specs = parse("1-10_0.5, 5 ,r:0.1-1.0").unwrap();
        assert_eq!(specs.len(), 3);
        assert!(!specs[0].random);
        assert_eq!(specs[1].kind, SubrangeKind::Single(5.0));
        assert!(specs[2].random);
    }

    #[test]
    fn blank_descriptor_is_empty() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("   ").unwrap().is_empty());
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        for bad in [
            "1,,2", "1-", "-5", "1-x", "r:5", "5_1", "1-10_0", "1-10_x", "1-10;x", "1-2-3", "r:",
        ] {
            assert!(parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn malformed_token_is_named_in_error() {
        let err = parse("1-10,1-10_0").unwrap_err();
        match err {
            Error::InvalidDescriptor { token, reason } => {
                assert_eq!(token, "1-10_0");
                assert_eq!(reason, "step must be positive");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
