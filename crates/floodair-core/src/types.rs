//! Core types shared by [`Range`](crate::Range) and [`Ranger`](crate::Ranger).

use std::fmt;
use std::time::Duration;

/// Outcome of advancing a sequence by one call.
///
/// Exhaustion is ordinary control flow, not an error: a range reports it
/// when its budget for the current cycle is spent, a ranger when a full
/// cycle over all subranges has completed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// A value was produced.
    Produced(f64),
    /// Nothing was produced; the sequence needs a reset (or has just
    /// performed one) before producing again.
    Exhausted,
}

impl Step {
    /// Returns the produced value, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            Step::Produced(v) => Some(*v),
            Step::Exhausted => None,
        }
    }

    /// Returns `true` if this step reports exhaustion.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Step::Exhausted)
    }
}

/// A [`Step`] together with the pacing pause owed for it.
///
/// Returned by the non-blocking `advance()` methods. The blocking `next()`
/// methods sleep for `pause` before handing back `step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paced {
    /// What the call produced.
    pub step: Step,
    /// Total pacing delay accumulated by the call.
    pub pause: Duration,
}

/// Maximum number of values a range produces per cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IterationBudget {
    /// At most this many values per cycle.
    Limited(u64),
    /// Never exhausted by count.
    Unbounded,
}

impl IterationBudget {
    /// Interpret a signed budget: negative values mean unbounded, zero means
    /// "not supplied" and yields `None`.
    pub fn from_signed(budget: i64) -> Option<IterationBudget> {
        match budget {
            n if n < 0 => Some(IterationBudget::Unbounded),
            0 => None,
            n => Some(IterationBudget::Limited(n as u64)),
        }
    }

    /// Returns the limit, or `None` when unbounded.
    pub fn limit(&self) -> Option<u64> {
        match self {
            IterationBudget::Limited(n) => Some(*n),
            IterationBudget::Unbounded => None,
        }
    }

    /// Returns `true` once `count` values have used up the budget.
    pub fn is_spent(&self, count: u64) -> bool {
        match self {
            IterationBudget::Limited(n) => count >= *n,
            IterationBudget::Unbounded => false,
        }
    }
}

impl fmt::Display for IterationBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IterationBudget::Limited(n) => write!(f, "{n}"),
            IterationBudget::Unbounded => write!(f, "unbounded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_value() {
        assert_eq!(Step::Produced(1.5).value(), Some(1.5));
        assert_eq!(Step::Exhausted.value(), None);
        assert!(Step::Exhausted.is_exhausted());
        assert!(!Step::Produced(0.0).is_exhausted());
    }

    #[test]
    fn budget_from_signed() {
        assert_eq!(
            IterationBudget::from_signed(-1),
            Some(IterationBudget::Unbounded)
        );
        assert_eq!(IterationBudget::from_signed(0), None);
        assert_eq!(
            IterationBudget::from_signed(10),
            Some(IterationBudget::Limited(10))
        );
    }

    #[test]
    fn budget_is_spent() {
        let b = IterationBudget::Limited(3);
        assert!(!b.is_spent(2));
        assert!(b.is_spent(3));
        assert!(!IterationBudget::Unbounded.is_spent(u64::MAX));
    }

    #[test]
    fn budget_display() {
        assert_eq!(IterationBudget::Limited(19).to_string(), "19");
        assert_eq!(IterationBudget::Unbounded.to_string(), "unbounded");
    }
}
