//! What can go wrong while building or driving a hop sequence.
//!
//! A bad descriptor token, a range whose bounds or step make no sense, a
//! config file that does not load, and a transmit chain that refuses a
//! retune all surface as one [`Error`].
//!
//! Exhaustion of a sequence is *not* an error; it is reported as
//! [`Step::Exhausted`](crate::Step::Exhausted).

use crate::mode::IterationMode;

/// The error type for all floodair operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A descriptor token could not be parsed.
    #[error("invalid descriptor token '{token}': {reason}")]
    InvalidDescriptor {
        /// The offending token, as written.
        token: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A numeric field does not follow the integer-or-decimal grammar.
    #[error("invalid number: '{0}'")]
    InvalidNumber(String),

    /// A stepping mode was requested without an end value.
    #[error("missing end value")]
    MissingEnd,

    /// The mode needs an explicit iteration budget and none was given.
    #[error("iteration budget required for {0} mode")]
    BudgetRequired(IterationMode),

    /// An invalid parameter was passed to a builder or reset.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// `spin()` saw exhaustion again right after a reset.
    #[error("sequence exhausted immediately after reset")]
    Stalled,

    /// The external transmit chain reported a failure.
    #[error("transmit error: {0}")]
    Transmit(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("config error: {0}")]
    Config(String),

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_invalid_descriptor() {
        let e = Error::InvalidDescriptor {
            token: "1-".into(),
            reason: "empty end".into(),
        };
        assert_eq!(e.to_string(), "invalid descriptor token '1-': empty end");
    }

    #[test]
    fn error_display_invalid_number() {
        let e = Error::InvalidNumber("abc".into());
        assert_eq!(e.to_string(), "invalid number: 'abc'");
    }

    #[test]
    fn error_display_missing_end() {
        assert_eq!(Error::MissingEnd.to_string(), "missing end value");
    }

    #[test]
    fn error_display_budget_required() {
        let e = Error::BudgetRequired(IterationMode::Static);
        assert_eq!(e.to_string(), "iteration budget required for static mode");
    }

    #[test]
    fn error_display_invalid_parameter() {
        let e = Error::InvalidParameter("delta must be positive".into());
        assert_eq!(e.to_string(), "invalid parameter: delta must be positive");
    }

    #[test]
    fn error_display_stalled() {
        assert_eq!(
            Error::Stalled.to_string(),
            "sequence exhausted immediately after reset"
        );
    }

    #[test]
    fn error_display_transmit() {
        let e = Error::Transmit("sink unavailable".into());
        assert_eq!(e.to_string(), "transmit error: sink unavailable");
    }

    #[test]
    fn error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no config.yaml");
        let e: Error = io_err.into();
        assert!(matches!(e, Error::Io(_)));
        assert!(e.to_string().contains("no config.yaml"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
