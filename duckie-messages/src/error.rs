//! Error types for message construction and conversion

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Message errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A payload of one kind was converted to a message of another
    #[error("unexpected payload kind: expected {expected}, got {actual}")]
    PayloadKind {
        /// Kind the consumer asked for
        expected: &'static str,
        /// Kind actually carried by the payload
        actual: &'static str,
    },

    /// Image buffer length does not match the declared geometry
    #[error("image buffer size mismatch: expected {expected} bytes, got {actual}")]
    ImageGeometry {
        /// width * height * channels
        expected: usize,
        /// Length of the provided buffer
        actual: usize,
    },
}
