//! # Procedural Error Types
//!
//! Failures are local: a bad config never reaches the generator, and a
//! generation fault only ever affects the one chunk that was requested.

use thiserror::Error;

/// Errors raised while loading or validating world configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config {path}: {reason}")]
    Io {
        /// File that failed to load.
        path: String,
        /// Underlying I/O error.
        reason: String,
    },

    /// The configuration is not valid TOML for `WorldConfig`.
    #[error("malformed config: {0}")]
    Parse(String),

    /// A field holds a value the generator cannot work with.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Errors raised while generating a single chunk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Request fields are out of range.
    #[error("invalid generation request: {0}")]
    InvalidRequest(String),

    /// Output buffers could not be reserved.
    #[error("cannot allocate {requested} bytes of chunk output")]
    Allocation {
        /// Bytes requested.
        requested: usize,
    },
}

/// Errors raised while parsing a `"x,z"` chunk key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed chunk key `{0}`")]
pub struct ChunkKeyError(pub String);

/// The operating system could not supply seed entropy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("entropy source unavailable: {0}")]
pub struct EntropyError(pub String);

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;
