//! Commands sent from the host to the orchestrator.

use serde::{Deserialize, Serialize};

use crate::types::{PlaybackConfig, SurfaceHandle};

/// Commands that the host can send to the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlaybackCommand {
    /// Start a playback session with the given configuration.
    Start { config: PlaybackConfig },

    /// End the current session.
    End,

    /// The video surface became available.
    SurfaceCreated(SurfaceHandle),

    /// The video surface was destroyed by the platform.
    SurfaceDestroyed(SurfaceHandle),

    /// The caption surface became available.
    CaptionSurfaceCreated(SurfaceHandle),

    /// The caption surface was destroyed by the platform.
    CaptionSurfaceDestroyed(SurfaceHandle),

    /// Request current status and session statistics.
    GetState,

    /// End any session and stop the orchestrator loop.
    Shutdown,
}

impl PlaybackCommand {
    /// Returns a short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start { .. } => "Start",
            Self::End => "End",
            Self::SurfaceCreated(_) => "SurfaceCreated",
            Self::SurfaceDestroyed(_) => "SurfaceDestroyed",
            Self::CaptionSurfaceCreated(_) => "CaptionSurfaceCreated",
            Self::CaptionSurfaceDestroyed(_) => "CaptionSurfaceDestroyed",
            Self::GetState => "GetState",
            Self::Shutdown => "Shutdown",
        }
    }
}
