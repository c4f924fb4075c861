//! Error types for Cadence.
//!
//! Lookup misses (unknown tokens, empty buckets) are never errors; they come
//! back as empty results. The variants here cover I/O, persisted-format
//! validation, strict tokenization and build cancellation.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T, E = CadenceError> = std::result::Result<T, E>;

/// The error type for all fallible Cadence operations.
#[derive(Debug, Error)]
pub enum CadenceError {
    /// I/O failure from the file storage backend or an ingestion reader.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON failure while reading ingestion records.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Archive (de)serialization failure for a snapshot body.
    #[error(transparent)]
    Rkyv(#[from] rkyv::rancor::Error),

    /// A caller passed an argument that cannot be used.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Persisted or ingested data does not have the expected shape.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Persisted data was written by an incompatible version.
    #[error("unsupported {what} version {found} (expected {expected})")]
    UnsupportedVersion {
        what: &'static str,
        found: u16,
        expected: u16,
    },

    /// The snapshot body does not match the checksum recorded in its header.
    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// Strict tokenization hit a character sequence with no table entry.
    ///
    /// `position` is a character index into the text given to the encoder.
    #[error("unknown IPA symbol {symbol:?} at character {position}")]
    UnknownSymbol { symbol: String, position: usize },

    /// The storage backend rejected an operation.
    #[error("storage error: {0}")]
    Storage(String),

    /// A build was stopped through its cancellation predicate.
    #[error("build cancelled")]
    Cancelled,

    /// A background build task panicked or was aborted.
    #[error("background task failed: {0}")]
    ThreadPanic(String),
}

impl CadenceError {
    /// Create an invalid-argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an invalid-format error.
    pub fn invalid_format<S: Into<String>>(msg: S) -> Self {
        Self::InvalidFormat(msg.into())
    }

    /// Create a storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::Storage(msg.into())
    }
}

impl From<tempfile::PersistError> for CadenceError {
    fn from(error: tempfile::PersistError) -> Self {
        Self::Io(error.error)
    }
}
