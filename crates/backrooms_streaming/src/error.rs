//! # Streaming Error Types
//!
//! Only construction and backend plumbing can fail. Generation faults are
//! reported per chunk through `GenerationOutcome`, never as a `StreamError`.

use backrooms_procedural::ConfigError;
use thiserror::Error;

/// Errors raised by the streaming engine and its backends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The world configuration was rejected.
    #[error("invalid stream configuration: {0}")]
    Config(#[from] ConfigError),

    /// A generation worker thread could not be started.
    #[error("failed to spawn generation worker: {0}")]
    WorkerSpawn(String),

    /// Every generation worker has exited.
    #[error("generation backend disconnected")]
    BackendDisconnected,
}

/// Result type for streaming operations.
pub type StreamResult<T> = Result<T, StreamError>;
