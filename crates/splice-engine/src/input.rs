//! Inputs processed by the orchestrator loop.

use std::fmt;

use splice_ipc::{EndReason, PlaybackCommand, PlayerRole, SurfaceHandle};
use splice_player::{PlayerEventKind, PlayerResult};

use crate::timer::TimerId;

/// Session generation. Advances when a session starts and when its teardown
/// begins; inputs tagged with an older value are stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    /// The following generation.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Asynchronous lifecycle operation of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOp {
    Initialize,
    Deinitialize,
}

/// Everything that can arrive in the orchestrator inbox.
#[derive(Debug)]
pub enum Input {
    /// Command from the host or surface provider.
    Command(PlaybackCommand),

    /// Event from a subscribed player listener.
    Player {
        role: PlayerRole,
        generation: Generation,
        event: PlayerEventKind,
    },

    /// Completion of an asynchronous lifecycle operation.
    Lifecycle {
        role: PlayerRole,
        generation: Generation,
        op: LifecycleOp,
        result: PlayerResult<()>,
    },

    /// Reconciliation timer tick.
    Tick { timer: TimerId },
}

/// Transition requests, one per row of the state table.
#[derive(Debug, Clone)]
pub(crate) enum Transition {
    /// Main player initialized and content loaded.
    InitComplete { surface_cached: bool },

    /// Surface arrived while idle.
    SurfaceCreated { surface: SurfaceHandle },

    /// Main player paused, marking the ad insertion point.
    MainPaused,

    /// Ad player paused, ending the ad break.
    AdPaused,

    /// Main content reached its end.
    MainEnded,

    /// End requested by the host or forced by a failure.
    ExplicitEnd { reason: EndReason },
}

impl Transition {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::InitComplete { .. } => "InitComplete",
            Self::SurfaceCreated { .. } => "SurfaceCreated",
            Self::MainPaused => "MainPaused",
            Self::AdPaused => "AdPaused",
            Self::MainEnded => "MainEnded",
            Self::ExplicitEnd { .. } => "ExplicitEnd",
        }
    }
}
