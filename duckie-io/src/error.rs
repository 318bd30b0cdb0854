//! Error types for duckie-io

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// duckie-io error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Message construction or conversion error
    #[error("message error: {0}")]
    Message(#[from] duckie_messages::Error),

    /// Configuration load or parse error
    #[error("configuration error: {0}")]
    Config(String),

    /// Wire serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Oversized wire frame
    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge {
        /// Declared frame size
        size: usize,
        /// Configured maximum
        max: usize,
    },

    /// Component used before `start()`
    #[error("component not started: {0}")]
    NotStarted(&'static str),

    /// Operation not supported by this component
    #[error("operation not supported: {0}")]
    NotSupported(String),

    /// Backend connection lost
    #[error("connection to robot lost")]
    Disconnected,

    /// Invalid parameter
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Config(e.to_string())
    }
}
