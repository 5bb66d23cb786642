//! A single bounded, modal numeric sequence.
//!
//! A [`Range`] owns a cursor, a per-cycle iteration budget, and a pacing
//! delay. It is built once through [`RangeBuilder`] and then reused forever:
//! exhaustion rewinds it, and [`Range::reset`] restarts it explicitly.
//!
//! # Example
//!
//! ```
//! use floodair_core::{IterationMode, Range, Step};
//!
//! let mut range = Range::builder(1.0)
//!     .end(2.0)
//!     .delta(0.5)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(range.mode(), IterationMode::Sequence);
//! assert_eq!(range.next(), Step::Produced(1.0));
//! assert_eq!(range.next(), Step::Produced(1.5));
//! assert_eq!(range.next(), Step::Produced(2.0));
//! assert_eq!(range.next(), Step::Exhausted);
//! ```

use std::fmt;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::error::{Error, Result};
use crate::helpers::{pace, round3};
use crate::mode::IterationMode;
use crate::types::{IterationBudget, Paced, Step};

/// One bounded numeric sequence with its own cursor and budget.
#[derive(Debug, Clone)]
pub struct Range {
    start: f64,
    end: f64,
    delta: f64,
    mode: IterationMode,
    /// Mode restored by [`resume`](Range::resume); never `Stopped`.
    resume_mode: IterationMode,
    budget: IterationBudget,
    cursor: f64,
    count: u64,
    pacing_delay: Duration,
    rng: StdRng,
}

/// Partial update applied by [`Range::reset_with`].
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RangeUpdate {
    /// New lower bound.
    pub start: Option<f64>,
    /// New upper bound.
    pub end: Option<f64>,
    /// New step size.
    pub delta: Option<f64>,
    /// New intrinsic mode.
    pub mode: Option<IterationMode>,
}

impl Range {
    /// Start building a range beginning at `start`.
    pub fn builder(start: f64) -> RangeBuilder {
        RangeBuilder::new(start)
    }

    /// Advance the sequence by one call without sleeping.
    ///
    /// The returned [`Paced`] carries the pacing delay this call owes; it
    /// is owed on exhaustion too.
    pub fn advance(&mut self) -> Paced {
        Paced {
            step: self.step(),
            pause: self.pacing_delay,
        }
    }

    /// Advance the sequence by one call, then block for the pacing delay.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Step {
        let paced = self.advance();
        pace(paced.pause);
        paced.step
    }

    fn step(&mut self) -> Step {
        match self.mode {
            IterationMode::Stopped => return Step::Exhausted,
            IterationMode::Once if self.count > 0 => return Step::Exhausted,
            _ => {}
        }

        if self.budget.is_spent(self.count) {
            trace!(count = self.count, budget = %self.budget, "range budget spent");
            self.rewind();
            return Step::Exhausted;
        }

        let value = match self.mode {
            IterationMode::Once | IterationMode::Static => self.start,
            IterationMode::Random => round3(self.rng.gen_range(self.start..=self.end)),
            IterationMode::Sequence => {
                self.cursor += self.delta;
                if self.cursor >= self.end {
                    self.cursor = self.start - self.delta;
                    self.end
                } else {
                    self.cursor
                }
            }
            IterationMode::Stopped => return Step::Exhausted,
        };

        self.count = self.count.saturating_add(1);
        Step::Produced(value)
    }

    /// Like [`next`](Range::next), but an exhausted range is reset and asked
    /// once more.
    ///
    /// Returns [`Error::Stalled`] if the retry is exhausted as well.
    pub fn spin(&mut self) -> Result<f64> {
        if let Step::Produced(value) = self.next() {
            return Ok(value);
        }
        self.reset();
        self.next().value().ok_or(Error::Stalled)
    }

    /// Pause the range. Every call reports exhaustion until resumed or reset.
    pub fn pause(&mut self) {
        self.mode = IterationMode::Stopped;
    }

    /// Restore the intrinsic mode after a [`pause`](Range::pause).
    pub fn resume(&mut self) {
        self.mode = self.resume_mode;
    }

    /// Rewind the cursor, clear the count, and resume.
    pub fn reset(&mut self) {
        self.rewind();
        self.resume();
    }

    /// Apply `update`, then [`reset`](Range::reset).
    ///
    /// Bounds are re-normalized so that `start <= end`. A `mode` override
    /// replaces the intrinsic mode (`Stopped` resumes as `Static`, as at
    /// construction). The iteration budget is kept as is. On error the
    /// range is left untouched.
    pub fn reset_with(&mut self, update: RangeUpdate) -> Result<()> {
        let start = update.start.unwrap_or(self.start);
        let end = update.end.unwrap_or(self.end);
        let delta = update.delta.unwrap_or(self.delta);
        let resume_mode = update.mode.map_or(self.resume_mode, resume_mode_for);

        check_finite("start", start)?;
        check_finite("end", end)?;
        check_finite("delta", delta)?;
        check_delta(resume_mode, delta)?;

        let (start, end) = if start > end { (end, start) } else { (start, end) };
        self.start = start;
        self.end = end;
        self.delta = delta;
        self.resume_mode = resume_mode;
        self.reset();
        Ok(())
    }

    fn rewind(&mut self) {
        self.cursor = self.start - self.delta;
        self.count = 0;
    }

    /// Values per cycle: the budget when bounded, otherwise the number of
    /// whole steps between the bounds.
    pub fn length(&self) -> u64 {
        match self.budget {
            IterationBudget::Limited(n) => n,
            IterationBudget::Unbounded if self.delta > 0.0 => {
                ((self.end - self.start) / self.delta).floor() as u64
            }
            IterationBudget::Unbounded => 0,
        }
    }

    /// Iterate over the values of one cycle, sleeping for the pacing delay
    /// after each call.
    ///
    /// Never ends for an unbounded `Static` range.
    pub fn values(&mut self) -> Values<'_> {
        Values { range: self }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Current mode, `Stopped` while paused.
    pub fn mode(&self) -> IterationMode {
        self.mode
    }

    pub fn resume_mode(&self) -> IterationMode {
        self.resume_mode
    }

    pub fn iteration_budget(&self) -> IterationBudget {
        self.budget
    }

    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// Values produced in the current cycle.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn pacing_delay(&self) -> Duration {
        self.pacing_delay
    }

    pub fn is_paused(&self) -> bool {
        self.mode == IterationMode::Stopped
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Range(start={}, end={}, delta={}, mode={}, budget={}, delay={:?})",
            self.start, self.end, self.delta, self.mode, self.budget, self.pacing_delay
        )
    }
}

/// One-cycle iterator returned by [`Range::values`].
#[derive(Debug)]
pub struct Values<'a> {
    range: &'a mut Range,
}

impl Iterator for Values<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        self.range.next().value()
    }
}

/// Fluent builder for [`Range`].
///
/// Only `start` is required. `build()` applies the normalization rules in
/// order: swap reversed bounds, derive a missing step from the sign of
/// `start`, collapse to a single point when a `Static`/`Stopped` range has
/// no end, then resolve the iteration budget.
#[derive(Debug, Clone)]
pub struct RangeBuilder {
    start: f64,
    end: Option<f64>,
    delta: Option<f64>,
    mode: IterationMode,
    budget: Option<IterationBudget>,
    pacing_delay: Duration,
    rng: Option<StdRng>,
}

impl RangeBuilder {
    /// Create a builder for a range beginning at `start`.
    pub fn new(start: f64) -> Self {
        RangeBuilder {
            start,
            end: None,
            delta: None,
            mode: IterationMode::default(),
            budget: None,
            pacing_delay: Duration::ZERO,
            rng: None,
        }
    }

    /// Set the upper bound.
    pub fn end(mut self, end: f64) -> Self {
        self.end = Some(end);
        self
    }

    /// Set the step size (default: `1.0` for a non-negative start,
    /// `0.1` otherwise).
    pub fn delta(mut self, delta: f64) -> Self {
        self.delta = Some(delta);
        self
    }

    /// Set the iteration mode (default: [`IterationMode::Sequence`]).
    pub fn mode(mut self, mode: IterationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the iteration budget from a signed count.
    ///
    /// Negative means unbounded; zero leaves the budget to be derived.
    pub fn iteration_budget(mut self, budget: i64) -> Self {
        self.budget = IterationBudget::from_signed(budget);
        self
    }

    /// Set the iteration budget.
    pub fn budget(mut self, budget: IterationBudget) -> Self {
        self.budget = match budget {
            IterationBudget::Limited(0) => None,
            other => Some(other),
        };
        self
    }

    /// Set the pause taken after every call (default: none).
    pub fn pacing_delay(mut self, delay: Duration) -> Self {
        self.pacing_delay = delay;
        self
    }

    /// Seed the random source used by [`IterationMode::Random`].
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = Some(StdRng::seed_from_u64(seed));
        self
    }

    /// Use the given random source.
    pub fn rng(mut self, rng: StdRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Validate the configuration and construct the [`Range`].
    pub fn build(self) -> Result<Range> {
        check_finite("start", self.start)?;
        if let Some(end) = self.end {
            check_finite("end", end)?;
        }
        if let Some(delta) = self.delta {
            check_finite("delta", delta)?;
        }

        let (start, end) = match self.end {
            Some(end) if self.start > end => (end, Some(self.start)),
            end => (self.start, end),
        };

        let delta = self
            .delta
            .unwrap_or(if start >= 0.0 { 1.0 } else { 0.1 });

        let (end, delta) = match end {
            Some(end) => (end, delta),
            None if matches!(self.mode, IterationMode::Static | IterationMode::Stopped) => {
                (start, 0.0)
            }
            None => return Err(Error::MissingEnd),
        };

        check_delta(self.mode, delta)?;

        let budget = match self.budget {
            Some(budget) => budget,
            None => match self.mode {
                IterationMode::Random | IterationMode::Sequence => {
                    derived_budget(start, end, delta)?
                }
                IterationMode::Static => return Err(Error::BudgetRequired(IterationMode::Static)),
                IterationMode::Once => IterationBudget::Limited(1),
                IterationMode::Stopped => IterationBudget::Unbounded,
            },
        };

        Ok(Range {
            start,
            end,
            delta,
            mode: self.mode,
            resume_mode: resume_mode_for(self.mode),
            budget,
            cursor: start - delta,
            count: 0,
            pacing_delay: self.pacing_delay,
            rng: self.rng.unwrap_or_else(StdRng::from_entropy),
        })
    }
}

fn resume_mode_for(mode: IterationMode) -> IterationMode {
    match mode {
        IterationMode::Stopped => IterationMode::Static,
        other => other,
    }
}

/// One value per whole step between the bounds, plus the end itself.
fn derived_budget(start: f64, end: f64, delta: f64) -> Result<IterationBudget> {
    let steps = ((end - start) / delta).floor();
    // `as u64` saturates; at 2^64 steps the `+ 1` would overflow.
    if steps >= u64::MAX as f64 {
        return Err(Error::InvalidParameter(format!(
            "{start}-{end} in steps of {delta} has too many values"
        )));
    }
    Ok(IterationBudget::Limited(steps as u64 + 1))
}

fn check_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!("{name} must be finite, got {value}")))
    }
}

fn check_delta(mode: IterationMode, delta: f64) -> Result<()> {
    if delta < 0.0 {
        return Err(Error::InvalidParameter(format!(
            "delta must not be negative, got {delta}"
        )));
    }
    if delta == 0.0 && matches!(mode, IterationMode::Random | IterationMode::Sequence) {
        return Err(Error::InvalidParameter(format!(
            "delta must be positive for {mode} mode"
        )));
    }
    Ok(())
}
