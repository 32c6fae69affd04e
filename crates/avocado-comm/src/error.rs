//! Error types for the communicator.

use avocado_protocol::ProtocolError;
use thiserror::Error;

/// Errors that can occur while talking to actuators.
#[derive(Debug, Error)]
pub enum CommError {
    /// The serial port could not be opened. Fatal for a communicator.
    #[error("failed to open port '{port}': {source}")]
    TransportOpen {
        /// Port path that was requested.
        port: String,
        /// Underlying serial error.
        #[source]
        source: serialport::Error,
    },

    /// Reading or writing the transport failed.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The protocol layer refused a command or a reply.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}

/// Result type for communicator operations.
pub type Result<T> = std::result::Result<T, CommError>;
