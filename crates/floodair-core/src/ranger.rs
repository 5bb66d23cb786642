//! Composition of several [`Range`]s into one continuous sequence.
//!
//! A [`Ranger`] is built from a descriptor string (see
//! [`descriptor`](crate::descriptor)) and walks its subranges in order.
//! Exhaustion of one subrange is handled internally: the subrange is reset
//! and the next one is asked within the same call. The caller only sees
//! [`Step::Exhausted`] once a full cycle over every subrange has completed,
//! at which point all subranges have already been reset.
//!
//! # Example
//!
//! ```
//! use floodair_core::{Ranger, Step};
//!
//! let mut ranger = Ranger::parse("1-2_0.5,5").unwrap();
//! assert_eq!(ranger.length(), 4);
//!
//! let cycle: Vec<f64> = ranger.values().collect();
//! assert_eq!(cycle, vec![1.0, 1.5, 2.0, 5.0]);
//! assert_eq!(ranger.current_index(), 0);
//! ```

use std::fmt;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use tracing::{debug, trace};

use crate::descriptor::{self, SubrangeKind, SubrangeSpec};
use crate::error::Result;
use crate::helpers::{pace, round3};
use crate::mode::IterationMode;
use crate::range::Range;
use crate::types::{IterationBudget, Paced, Step};

/// An ordered, composed collection of subranges.
#[derive(Debug, Clone)]
pub struct Ranger {
    subranges: Vec<Range>,
    current_index: usize,
    /// Entropy flag: random default mode and reshuffle on subrange exhaustion.
    randomize: bool,
    default_pacing_delay: Duration,
    rng: StdRng,
}

impl Ranger {
    /// Parse `descriptor` with default settings.
    pub fn parse(descriptor: &str) -> Result<Ranger> {
        RangerBuilder::new().parse(descriptor)
    }

    /// Start configuring a ranger.
    pub fn builder() -> RangerBuilder {
        RangerBuilder::new()
    }

    /// Advance by one logical call without sleeping.
    ///
    /// The returned pause is the sum of the pacing delays of every subrange
    /// call made, including calls that hit exhaustion.
    pub fn advance(&mut self) -> Paced {
        let mut pause = Duration::ZERO;
        loop {
            if self.subranges.is_empty() {
                return Paced {
                    step: Step::Exhausted,
                    pause,
                };
            }

            if self.current_index >= self.subranges.len() {
                for range in &mut self.subranges {
                    range.reset();
                }
                self.current_index = 0;
                debug!(subranges = self.subranges.len(), "full cycle complete");
                return Paced {
                    step: Step::Exhausted,
                    pause,
                };
            }

            let index = self.current_index;
            let paced = self.subranges[index].advance();
            pause += paced.pause;

            match paced.step {
                Step::Produced(value) => {
                    return Paced {
                        step: Step::Produced(round3(value)),
                        pause,
                    };
                }
                Step::Exhausted => {
                    trace!(index, "subrange exhausted");
                    self.subranges[index].reset();
                    if self.randomize {
                        self.subranges.shuffle(&mut self.rng);
                    }
                    self.current_index += 1;
                }
            }
        }
    }

    /// Advance by one logical call, then block for the accumulated pacing.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Step {
        let paced = self.advance();
        pace(paced.pause);
        paced.step
    }

    /// Total values per full cycle, saturating at `u64::MAX`.
    pub fn length(&self) -> u64 {
        self.subranges
            .iter()
            .map(Range::length)
            .fold(0, u64::saturating_add)
    }

    /// Iterate over one full cycle, sleeping for pacing after each call.
    pub fn values(&mut self) -> Values<'_> {
        Values { ranger: self }
    }

    /// Number of subranges.
    pub fn len(&self) -> usize {
        self.subranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subranges.is_empty()
    }

    pub fn subranges(&self) -> &[Range] {
        &self.subranges
    }

    /// Mutable access to the subranges, e.g. to pause one of them.
    pub fn subranges_mut(&mut self) -> &mut [Range] {
        &mut self.subranges
    }

    /// Index of the subrange the next call will ask first.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_randomized(&self) -> bool {
        self.randomize
    }

    pub fn default_pacing_delay(&self) -> Duration {
        self.default_pacing_delay
    }
}

impl fmt::Display for Ranger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, range) in self.subranges.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{range}")?;
        }
        Ok(())
    }
}

/// One-cycle iterator returned by [`Ranger::values`].
#[derive(Debug)]
pub struct Values<'a> {
    ranger: &'a mut Ranger,
}

impl Iterator for Values<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        self.ranger.next().value()
    }
}

/// Fluent builder for [`Ranger`].
///
/// # Example
///
/// ```
/// use floodair_core::{IterationMode, Ranger};
/// use std::time::Duration;
///
/// let ranger = Ranger::builder()
///     .randomize(true)
///     .pacing_delay(Duration::from_millis(10))
///     .seed(1)
///     .parse("900-935_0.1,r:3850-4075_10;1")
///     .unwrap();
/// assert!(ranger.subranges().iter().all(|r| r.mode() == IterationMode::Random));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RangerBuilder {
    randomize: bool,
    budget: Option<IterationBudget>,
    pacing_delay: Duration,
    seed: Option<u64>,
}

impl RangerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every range token random and reshuffle the subranges each time
    /// one of them exhausts.
    pub fn randomize(mut self, enabled: bool) -> Self {
        self.randomize = enabled;
        self
    }

    /// Iteration budget applied to every range token (single values always
    /// use a budget of one). Negative means unbounded, zero derives it.
    pub fn iteration_budget(mut self, budget: i64) -> Self {
        self.budget = IterationBudget::from_signed(budget);
        self
    }

    /// Pacing delay for tokens without a `;<seconds>` clause.
    pub fn pacing_delay(mut self, delay: Duration) -> Self {
        self.pacing_delay = delay;
        self
    }

    /// Seed every random source in the ranger, for reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse `descriptor` and build the ranger. Fails on the first bad
    /// token; no partial ranger is returned.
    pub fn parse(self, descriptor: &str) -> Result<Ranger> {
        let specs = descriptor::parse(descriptor)?;
        self.build(&specs)
    }

    /// Build a ranger from already parsed specs.
    pub fn build(self, specs: &[SubrangeSpec]) -> Result<Ranger> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut subranges = Vec::with_capacity(specs.len());
        for spec in specs {
            let pacing_delay = spec.pacing_delay.unwrap_or(self.pacing_delay);
            let sub_rng = StdRng::seed_from_u64(rng.next_u64());
            let range = match spec.kind {
                SubrangeKind::Span { start, end, .. } => {
                    let mode = if spec.random || self.randomize {
                        IterationMode::Random
                    } else {
                        IterationMode::Sequence
                    };
                    let mut builder = Range::builder(start)
                        .end(end)
                        .delta(spec.step().unwrap_or(descriptor::DEFAULT_STEP))
                        .mode(mode)
                        .pacing_delay(pacing_delay)
                        .rng(sub_rng);
                    if let Some(budget) = self.budget {
                        builder = builder.budget(budget);
                    }
                    builder.build()?
                }
                SubrangeKind::Single(value) => Range::builder(value)
                    .end(value)
                    .mode(IterationMode::Once)
                    .iteration_budget(1)
                    .pacing_delay(pacing_delay)
                    .rng(sub_rng)
                    .build()?,
            };
            debug!(%range, "parsed subrange");
            subranges.push(range);
        }

        Ok(Ranger {
            subranges,
            current_index: 0,
            randomize: self.randomize,
            default_pacing_delay: self.pacing_delay,
            rng,
        })
    }
}
