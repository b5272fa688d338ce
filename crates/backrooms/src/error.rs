//! Simulation error types.

use backrooms_procedural::{ConfigError, EntropyError};
use backrooms_streaming::StreamError;
use thiserror::Error;

/// Errors that stop the walk simulation before it starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Bad command line.
    #[error("usage error: {0}")]
    Usage(String),

    /// World configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No seed given and none could be created.
    #[error(transparent)]
    Entropy(#[from] EntropyError),

    /// The stream engine could not start.
    #[error(transparent)]
    Stream(#[from] StreamError),
}

/// Result type for the simulation.
pub type SimResult<T> = Result<T, SimError>;
