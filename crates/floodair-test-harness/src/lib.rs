//! floodair-test-harness: test utilities for floodair.
//!
//! This crate provides [`MockTransmitter`] for deterministic testing of the
//! hop loop without an SDR attached.

pub mod mock_transmitter;

pub use mock_transmitter::MockTransmitter;
