//! Error types for the actuator bus protocol.

use thiserror::Error;

/// Errors that can occur when working with the actuator bus protocol.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProtocolError {
    /// More than one terminated line arrived in a single poll.
    ///
    /// The protocol carries no correlation ID, so none of the lines can be
    /// attributed to the command that was just sent.
    #[error("ambiguous response: {lines} lines received in one poll")]
    MultilineResponse {
        /// Number of lines received.
        lines: usize,
    },

    /// A `set` command was given a NaN or infinite argument.
    #[error("non-finite argument {value} for '{verb}'")]
    NonFiniteArgument {
        /// Verb token of the rejected command.
        verb: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A frame could not be split back into its fields.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),
}

/// Result type alias for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
