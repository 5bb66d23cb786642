//! floodair-core: frequency-sequence generator, errors, and the transmitter
//! seam for floodair.
//!
//! The generator turns a compact descriptor such as
//! `"900-935_0.1,r:3850-4075_10;1"` into an endless, restartable stream of
//! values. Hop strategies and the transmit loop live in `floodair-hopper`;
//! this crate has no runtime dependency on them.
//!
//! # Key types
//!
//! - [`IterationMode`] -- how a range advances
//! - [`Range`] -- one bounded, modal sequence
//! - [`Ranger`] -- several ranges composed from a descriptor
//! - [`Step`] / [`Paced`] -- the result of advancing a sequence
//! - [`Transmitter`] -- the external transmit chain
//! - [`Error`] / [`Result`] -- error handling

pub mod descriptor;
pub mod error;
pub mod events;
pub mod helpers;
pub mod mode;
pub mod range;
pub mod ranger;
pub mod transmitter;
pub mod types;

pub use descriptor::{SubrangeKind, SubrangeSpec};
pub use error::{Error, Result};
pub use events::HopEvent;
pub use helpers::{MHZ, format_freq_mhz, round3};
pub use mode::{IterationMode, ParseModeError};
pub use range::{Range, RangeBuilder, RangeUpdate};
pub use ranger::{Ranger, RangerBuilder};
pub use transmitter::Transmitter;
pub use types::{IterationBudget, Paced, Step};
