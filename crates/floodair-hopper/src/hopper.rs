//! The async hop loop.
//!
//! A [`Hopper`] pulls frequencies from a [`Ranger`], retunes its
//! [`Transmitter`], and transmits for one dwell per frequency. Pacing delays
//! owed by the generator are awaited with `tokio::time::sleep`, so the loop
//! never blocks the runtime.

use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use floodair_core::error::{Error, Result};
use floodair_core::events::HopEvent;
use floodair_core::helpers::{format_freq_mhz, round3};
use floodair_core::transmitter::Transmitter;
use floodair_core::{Ranger, Step};

/// How long to stay on each frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dwell {
    /// The same dwell for every hop.
    Fixed(Duration),
    /// A fresh uniform sample in `min..=max` for every hop.
    Entropy { min: Duration, max: Duration },
}

impl Dwell {
    /// The dwell for the next hop.
    pub fn sample(&self, rng: &mut StdRng) -> Duration {
        match *self {
            Dwell::Fixed(dwell) => dwell,
            Dwell::Entropy { min, max } if min >= max => min,
            Dwell::Entropy { min, max } => rng.gen_range(min..=max),
        }
    }
}

/// Evenly spaced channels `origin + k * spacing` for `k` in `0..channels`.
///
/// Generator values are snapped to the nearest channel before tuning, so
/// random hops land on channel centers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelGrid {
    origin: f64,
    spacing: f64,
    channels: u64,
}

impl ChannelGrid {
    /// Channels from `origin` up to and including `top`, `spacing` apart.
    pub fn new(origin: f64, spacing: f64, top: f64) -> Result<ChannelGrid> {
        if !(origin.is_finite() && top.is_finite() && top >= origin) {
            return Err(Error::InvalidParameter(format!(
                "channel grid needs finite bounds with {origin} <= {top}"
            )));
        }
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "channel spacing must be positive, got {spacing}"
            )));
        }
        let steps = ((top - origin) / spacing).floor();
        if steps >= u64::MAX as f64 {
            return Err(Error::InvalidParameter(format!(
                "{origin}-{top} in steps of {spacing} has too many channels"
            )));
        }
        Ok(ChannelGrid {
            origin,
            spacing,
            channels: steps as u64 + 1,
        })
    }

    pub fn channels(&self) -> u64 {
        self.channels
    }

    /// The channel center nearest to `value`, rounded to three decimals.
    pub fn snap(&self, value: f64) -> f64 {
        let last = (self.channels - 1) as f64;
        let k = ((value - self.origin) / self.spacing).round().clamp(0.0, last);
        round3(self.origin + k * self.spacing)
    }
}

/// What a single [`Hopper::hop`] call did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HopOutcome {
    /// Retuned to `freq_hz` and transmitted for `dwell`.
    Tuned { freq_hz: f64, dwell: Duration },
    /// The generator finished a full cycle; nothing was transmitted.
    CycleComplete { cycle: u64 },
}

/// Drives a [`Transmitter`] through the frequencies of a [`Ranger`].
///
/// Construct with [`HopperBuilder`](crate::HopperBuilder).
pub struct Hopper<T: Transmitter> {
    ranger: Ranger,
    transmitter: T,
    dwell: Dwell,
    /// Multiplier from generator units to hertz.
    unit_scale: f64,
    max_cycles: Option<u64>,
    /// Snap generator values to these channels before scaling.
    grid: Option<ChannelGrid>,
    cycles: u64,
    events: broadcast::Sender<HopEvent>,
    rng: StdRng,
}

impl<T: Transmitter> Hopper<T> {
    pub(crate) fn new(
        ranger: Ranger,
        transmitter: T,
        dwell: Dwell,
        unit_scale: f64,
        max_cycles: Option<u64>,
        events: broadcast::Sender<HopEvent>,
        rng: StdRng,
    ) -> Self {
        Hopper {
            ranger,
            transmitter,
            dwell,
            unit_scale,
            max_cycles,
            grid: None,
            cycles: 0,
            events,
            rng,
        }
    }

    pub(crate) fn with_channel_grid(mut self, grid: Option<ChannelGrid>) -> Self {
        self.grid = grid;
        self
    }

    /// Perform one hop.
    ///
    /// Awaits whatever pacing the generator owes, then either retunes and
    /// transmits on the next frequency or reports a completed cycle.
    pub async fn hop(&mut self) -> Result<HopOutcome> {
        if self.ranger.is_empty() {
            return Err(Error::InvalidParameter(
                "hopper has no frequencies to hop over".into(),
            ));
        }

        let paced = self.ranger.advance();
        if !paced.pause.is_zero() {
            tokio::time::sleep(paced.pause).await;
        }

        match paced.step {
            Step::Produced(value) => {
                let value = self.grid.map_or(value, |grid| grid.snap(value));
                let freq_hz = value * self.unit_scale;
                let dwell = self.dwell.sample(&mut self.rng);
                self.transmitter.tune(freq_hz).await?;
                self.transmitter.transmit(dwell).await?;
                info!(freq = %format_freq_mhz(freq_hz), ?dwell, "hopped");
                let _ = self.events.send(HopEvent::Tuned { freq_hz, dwell });
                Ok(HopOutcome::Tuned { freq_hz, dwell })
            }
            Step::Exhausted => {
                self.cycles += 1;
                debug!(cycle = self.cycles, "hop cycle complete");
                let _ = self.events.send(HopEvent::CycleComplete { cycle: self.cycles });
                Ok(HopOutcome::CycleComplete { cycle: self.cycles })
            }
        }
    }

    /// Hop until `max_cycles` full cycles have completed (forever when no
    /// limit is set), then stop the transmitter.
    ///
    /// The transmitter is stopped on error too. Returns the number of
    /// completed cycles.
    pub async fn run(&mut self) -> Result<u64> {
        info!(
            subranges = self.ranger.len(),
            per_cycle = self.ranger.length(),
            max_cycles = ?self.max_cycles,
            "hop loop starting"
        );
        while !self.max_cycles.is_some_and(|max| self.cycles >= max) {
            if let Err(e) = self.hop().await {
                warn!(error = %e, "hop failed, stopping transmitter");
                if let Err(stop_err) = self.transmitter.stop().await {
                    warn!(error = %stop_err, "failed to stop transmitter");
                }
                let _ = self.events.send(HopEvent::Stopped);
                return Err(e);
            }
        }
        self.shutdown().await?;
        Ok(self.cycles)
    }

    /// Stop the transmitter and announce [`HopEvent::Stopped`].
    ///
    /// Use this after abandoning a [`run`](Hopper::run) future, e.g. on
    /// Ctrl-C.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.transmitter.stop().await?;
        info!(cycles = self.cycles, "hop loop stopped");
        let _ = self.events.send(HopEvent::Stopped);
        Ok(())
    }

    /// Receive every event emitted from now on.
    ///
    /// The channel is bounded; a subscriber that falls behind sees
    /// `RecvError::Lagged` and misses the oldest events.
    pub fn subscribe(&self) -> broadcast::Receiver<HopEvent> {
        self.events.subscribe()
    }

    pub fn transmitter(&self) -> &T {
        &self.transmitter
    }

    pub fn transmitter_mut(&mut self) -> &mut T {
        &mut self.transmitter
    }

    pub fn ranger(&self) -> &Ranger {
        &self.ranger
    }

    /// Completed full cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn dwell(&self) -> Dwell {
        self.dwell
    }

    pub fn channel_grid(&self) -> Option<ChannelGrid> {
        self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::HopperBuilder;
    use floodair_test_harness::MockTransmitter;
    use rand::SeedableRng;

    fn sweep_hopper(descriptor: &str) -> Hopper<MockTransmitter> {
        HopperBuilder::new(MockTransmitter::new())
            .ranger(Ranger::parse(descriptor).unwrap())
            .dwell(Dwell::Fixed(Duration::from_millis(10)))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn sweep_tunes_in_order_then_completes_cycle() {
        let mut hopper = sweep_hopper("900-902_1");

        for expected in [900e6, 901e6, 902e6] {
            let outcome = hopper.hop().await.unwrap();
            assert_eq!(
                outcome,
                HopOutcome::Tuned {
                    freq_hz: expected,
                    dwell: Duration::from_millis(10)
                }
            );
        }
        assert_eq!(
            hopper.hop().await.unwrap(),
            HopOutcome::CycleComplete { cycle: 1 }
        );
        assert_eq!(hopper.transmitter().tuned(), &[900e6, 901e6, 902e6]);
        assert_eq!(hopper.transmitter().transmitted().len(), 3);
        assert_eq!(hopper.cycles(), 1);
    }

    #[tokio::test]
    async fn run_stops_after_max_cycles() {
        let mut hopper = HopperBuilder::new(MockTransmitter::new())
            .ranger(Ranger::parse("1-2_1,5").unwrap())
            .max_cycles(2)
            .build()
            .unwrap();

        let cycles = hopper.run().await.unwrap();
        assert_eq!(cycles, 2);
        assert_eq!(
            hopper.transmitter().tuned(),
            &[1e6, 2e6, 5e6, 1e6, 2e6, 5e6]
        );
        assert_eq!(hopper.transmitter().stops(), 1);
    }

    #[tokio::test]
    async fn run_with_zero_cycles_only_stops() {
        let mut hopper = HopperBuilder::new(MockTransmitter::new())
            .ranger(Ranger::parse("1-2_1").unwrap())
            .max_cycles(0)
            .build()
            .unwrap();

        assert_eq!(hopper.run().await.unwrap(), 0);
        assert!(hopper.transmitter().tuned().is_empty());
        assert_eq!(hopper.transmitter().stops(), 1);
    }

    #[tokio::test]
    async fn events_are_broadcast() {
        let mut hopper = HopperBuilder::new(MockTransmitter::new())
            .ranger(Ranger::parse("7").unwrap())
            .dwell(Dwell::Fixed(Duration::from_millis(5)))
            .max_cycles(1)
            .build()
            .unwrap();
        let mut events = hopper.subscribe();

        hopper.run().await.unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            HopEvent::Tuned {
                freq_hz: 7e6,
                dwell: Duration::from_millis(5)
            }
        );
        assert_eq!(
            events.recv().await.unwrap(),
            HopEvent::CycleComplete { cycle: 1 }
        );
        assert_eq!(events.recv().await.unwrap(), HopEvent::Stopped);
    }

    #[tokio::test]
    async fn entropy_dwell_stays_within_bounds() {
        let min = Duration::from_millis(100);
        let max = Duration::from_millis(500);
        let mut hopper = HopperBuilder::new(MockTransmitter::new())
            .ranger(Ranger::parse("1-20_1").unwrap())
            .dwell(Dwell::Entropy { min, max })
            .seed(3)
            .max_cycles(1)
            .build()
            .unwrap();

        hopper.run().await.unwrap();

        let dwells = hopper.transmitter().transmitted();
        assert_eq!(dwells.len(), 20);
        assert!(dwells.iter().all(|d| *d >= min && *d <= max));
    }

    #[test]
    fn degenerate_entropy_is_fixed() {
        let mut rng = StdRng::seed_from_u64(1);
        let d = Duration::from_millis(40);
        assert_eq!(Dwell::Entropy { min: d, max: d }.sample(&mut rng), d);
        assert_eq!(Dwell::Fixed(d).sample(&mut rng), d);
    }

    #[test]
    fn channel_grid_snaps_and_clamps() {
        let grid = ChannelGrid::new(900.0, 0.25, 901.1).unwrap();
        assert_eq!(grid.channels(), 5);
        assert_eq!(grid.snap(900.1), 900.0);
        assert_eq!(grid.snap(900.13), 900.25);
        assert_eq!(grid.snap(900.6), 900.5);
        assert_eq!(grid.snap(901.1), 901.0);
        assert_eq!(grid.snap(899.0), 900.0);

        assert!(ChannelGrid::new(900.0, 0.0, 901.0).is_err());
        assert!(ChannelGrid::new(901.0, 0.5, 900.0).is_err());
        assert!(ChannelGrid::new(0.0, 1e-9, 1e300).is_err());
    }

    #[tokio::test]
    async fn random_hops_land_on_channels() {
        let mut hopper = HopperBuilder::new(MockTransmitter::new())
            .ranger(Ranger::builder().seed(4).parse("r:900-910_0.01").unwrap())
            .channel_grid(ChannelGrid::new(900.0, 2.5, 910.0).unwrap())
            .max_cycles(1)
            .build()
            .unwrap();

        hopper.run().await.unwrap();

        let channels = [900e6, 902.5e6, 905e6, 907.5e6, 910e6];
        let tuned = hopper.transmitter().tuned();
        assert_eq!(tuned.len() as u64, hopper.ranger().length());
        assert!(tuned.iter().all(|f| channels.contains(f)));
    }

    #[tokio::test]
    async fn transmit_failure_stops_transmitter() {
        let mut transmitter = MockTransmitter::new();
        transmitter.fail_after(2);
        let mut hopper = HopperBuilder::new(transmitter)
            .ranger(Ranger::parse("1-10_1").unwrap())
            .build()
            .unwrap();

        let err = hopper.run().await.unwrap_err();
        assert!(matches!(err, Error::Transmit(_)));
        assert_eq!(hopper.transmitter().tuned().len(), 2);
        assert_eq!(hopper.transmitter().stops(), 1);
    }

    #[tokio::test]
    async fn empty_ranger_is_an_error() {
        let mut hopper = sweep_hopper("");
        assert!(matches!(
            hopper.hop().await,
            Err(Error::InvalidParameter(_))
        ));
    }

    #[tokio::test]
    async fn unit_scale_is_applied() {
        let mut hopper = HopperBuilder::new(MockTransmitter::new())
            .ranger(Ranger::parse("433.92").unwrap())
            .unit_scale(1.0)
            .build()
            .unwrap();

        hopper.hop().await.unwrap();
        assert_eq!(hopper.transmitter().tuned(), &[433.92]);
        assert_eq!(hopper.transmitter().center_freq(), Some(433.92));
    }

    #[tokio::test]
    async fn pacing_delay_is_awaited() {
        let mut hopper = sweep_hopper("1;0.02");
        let started = tokio::time::Instant::now();
        hopper.hop().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
