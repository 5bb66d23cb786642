//! floodair-hopper: hopping strategies and the async hop loop.
//!
//! This crate turns a [`HopConfig`] into a [`Hopper`] that walks a
//! [`Ranger`](floodair_core::Ranger) and drives any
//! [`Transmitter`](floodair_core::Transmitter):
//!
//! - [`HopStrategy`] -- constant, sweep, random hop, or a custom descriptor
//! - [`HopConfig`] -- YAML settings plus command-line overrides
//! - [`HopperBuilder`] -- fluent construction, directly or from a config
//! - [`Hopper`] -- tune, transmit, repeat; events over a broadcast channel

pub mod builder;
pub mod config;
pub mod hopper;
pub mod strategy;

pub use builder::HopperBuilder;
pub use config::{ConfigOverrides, EntropyBounds, HopConfig};
pub use hopper::{ChannelGrid, Dwell, HopOutcome, Hopper};
pub use strategy::{HopStrategy, ParseStrategyError};
