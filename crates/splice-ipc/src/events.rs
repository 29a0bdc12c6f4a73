//! Events sent from the orchestrator to the host.

use serde::{Deserialize, Serialize};

use crate::state::{EndReason, PlaybackStatus, PlayerRole};
use crate::types::{SessionStats, SurfaceHandle};

/// Events that the orchestrator can send to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Orchestrator loop is ready to accept commands.
    Ready,

    /// Session status has changed.
    StateChanged {
        /// Previous status.
        previous: PlaybackStatus,

        /// Current status.
        current: PlaybackStatus,
    },

    /// The ad player finished initializing and has its source set.
    AdPrepared,

    /// The video surface was handed to a player.
    SurfaceAssigned {
        /// Player now holding the surface.
        role: PlayerRole,

        /// The surface handle.
        surface: SurfaceHandle,
    },

    /// Current session statistics.
    Stats(SessionStats),

    /// Error occurred.
    Error {
        /// Whether the error is recoverable.
        recoverable: bool,

        /// Error message.
        message: String,
    },

    /// Session teardown completed.
    Finished {
        /// Why the session ended.
        reason: EndReason,

        /// Final statistics.
        stats: SessionStats,
    },

    /// Orchestrator loop has shut down.
    Shutdown,
}
