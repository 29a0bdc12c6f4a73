//! Error types for the orchestrator.

use thiserror::Error;

use splice_ipc::PlayerRole;
use splice_player::PlayerError;

/// Errors that can occur while orchestrating a session.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// A player failed to initialize or load its content.
    #[error("The {role} player failed to initialize: {source}")]
    InitializationFailure {
        role: PlayerRole,
        #[source]
        source: PlayerError,
    },

    /// No transition table row matches the request.
    #[error("Invalid transition: {event} in state {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },

    /// Hand-off attempted with no surface or a stale one.
    #[error("Surface unavailable")]
    SurfaceUnavailable,

    /// Command issued to a player that is not initialized.
    #[error("The {0} player is not ready")]
    PlayerNotReady(PlayerRole),

    /// A player rejected a command.
    #[error("Player error: {0}")]
    Player(#[from] PlayerError),

    /// The orchestrator inbox is gone.
    #[error("Orchestrator inbox closed")]
    ChannelClosed,
}

/// Result type for orchestrator operations.
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
