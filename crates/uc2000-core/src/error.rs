//! Error types for UC-2000 control.
//!
//! All fallible operations across the workspace return [`Result<T>`], which
//! uses [`Error`] as the error type. Encoding (vocabulary) errors and
//! transport errors share the one enum so callers can branch on the variant
//! without matching on message text.

/// The error type for all UC-2000 operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The command name is neither a catalog family nor one of the special
    /// commands (`percent`, `status_request`).
    #[error("command not recognised by UC-2000: {0}")]
    UnrecognizedCommand(String),

    /// The data value is not legal for the resolved command.
    ///
    /// Raised for a catalog key that does not exist in the family, or for a
    /// percent value that cannot be turned into a half-percent data byte.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A sequencer or transport configuration value is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A transport-level error: the serial port could not be opened or
    /// configured, or the transport refused a frame (a mock transport
    /// reports an unexpected send this way).
    #[error("transport error: {0}")]
    Transport(String),

    /// Timed out waiting for bytes from the controller.
    #[error("timeout waiting for response")]
    Timeout,

    /// No connection to the controller has been established.
    #[error("not connected")]
    NotConnected,

    /// The connection to the controller was lost unexpectedly.
    #[error("connection lost")]
    ConnectionLost,

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;
