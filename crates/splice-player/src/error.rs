//! Error types for player adapters.

use thiserror::Error;

/// Errors that can occur during player operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayerError {
    /// Native player failed to initialize.
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// Operation issued before initialize completed.
    #[error("Player not initialized")]
    NotInitialized,

    /// Operation requires a source.
    #[error("No source set")]
    NoSource,

    /// Source rejected by the player.
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    /// Surface could not be attached or detached.
    #[error("Surface error: {0}")]
    Surface(String),

    /// Pending operation was cancelled by deinitialize.
    #[error("Operation cancelled")]
    Cancelled,

    /// Streaming engine failed to load content.
    #[error("Streaming engine error: {0}")]
    Streaming(String),
}
